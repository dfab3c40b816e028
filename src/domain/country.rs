//! Static reference tables for the ten ASEAN member states

/// iso3 code to display name for every member state
pub const MEMBER_STATES: [(&str, &str); 10] = [
    ("BRN", "Brunei"),
    ("KHM", "Cambodia"),
    ("IDN", "Indonesia"),
    ("LAO", "Laos"),
    ("MYS", "Malaysia"),
    ("MMR", "Myanmar"),
    ("PHL", "Philippines"),
    ("SGP", "Singapore"),
    ("THA", "Thailand"),
    ("VNM", "Vietnam"),
];

/// Resolve an iso3 code (case-insensitive) to a member display name
pub fn member_name(iso3: &str) -> Option<&'static str> {
    MEMBER_STATES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(iso3.trim()))
        .map(|&(_, name)| name)
}

/// Find the canonical display name for user input such as "vietnam"
pub fn canonical_name(input: &str) -> Option<&'static str> {
    let input = input.trim();
    MEMBER_STATES
        .iter()
        .find(|(code, name)| name.eq_ignore_ascii_case(input) || code.eq_ignore_ascii_case(input))
        .map(|&(_, name)| name)
}

/// Typography and offset constants for the large country-name overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorialLabelSpec {
    pub country: &'static str,
    pub headline: &'static str,
    pub official: &'static str,
    /// Chinese name shown under the headline
    pub translated: &'static str,
    /// Letter tracking in em
    pub tracking: f64,
    /// Rule width and vertical offset in px
    pub rule_width: f64,
    pub rule_offset: f64,
    /// Anchor nudges as fractions of the current viewBox size
    pub nudge_x: f64,
    pub nudge_y: f64,
}

#[allow(clippy::too_many_arguments)]
const fn label(
    country: &'static str,
    headline: &'static str,
    official: &'static str,
    translated: &'static str,
    tracking: f64,
    rule_width: f64,
    rule_offset: f64,
    nudge: (f64, f64),
) -> EditorialLabelSpec {
    EditorialLabelSpec {
        country,
        headline,
        official,
        translated,
        tracking,
        rule_width,
        rule_offset,
        nudge_x: nudge.0,
        nudge_y: nudge.1,
    }
}

pub static EDITORIAL_LABELS: [EditorialLabelSpec; 10] = [
    label("Brunei", "BRUNEI", "Brunei Darussalam", "文莱", 0.32, 96.0, 14.0, (0.0, -0.04)),
    label("Cambodia", "CAMBODIA", "Kingdom of Cambodia", "柬埔寨", 0.26, 120.0, 14.0, (0.0, -0.02)),
    label("Indonesia", "INDONESIA", "Republic of Indonesia", "印度尼西亚", 0.22, 148.0, 16.0, (-0.06, -0.08)),
    label("Laos", "LAOS", "Lao People's Democratic Republic", "老挝", 0.36, 88.0, 14.0, (0.02, 0.0)),
    label("Malaysia", "MALAYSIA", "Malaysia", "马来西亚", 0.24, 128.0, 14.0, (0.04, -0.06)),
    label("Myanmar", "MYANMAR", "Republic of the Union of Myanmar", "缅甸", 0.26, 120.0, 14.0, (-0.03, 0.0)),
    label("Philippines", "PHILIPPINES", "Republic of the Philippines", "菲律宾", 0.2, 156.0, 16.0, (0.0, -0.03)),
    label("Singapore", "SINGAPORE", "Republic of Singapore", "新加坡", 0.22, 132.0, 14.0, (0.0, -0.12)),
    label("Thailand", "THAILAND", "Kingdom of Thailand", "泰国", 0.26, 124.0, 14.0, (0.02, -0.02)),
    label("Vietnam", "VIETNAM", "Socialist Republic of Viet Nam", "越南", 0.28, 116.0, 14.0, (0.06, 0.0)),
];

pub fn label_spec(country: &str) -> Option<&'static EditorialLabelSpec> {
    EDITORIAL_LABELS.iter().find(|spec| spec.country == country)
}

/// Per-country zoom constants used when fitting a country into the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomProfile {
    /// Multiplier on the country size before fitting
    pub padding: f64,
    /// Share of the canvas the padded country may fill
    pub fit_ratio: f64,
    /// Lowest zoom scale; 1.0 is the full view
    pub min_scale: f64,
}

impl Default for ZoomProfile {
    fn default() -> Self {
        Self {
            padding: 1.22,
            fit_ratio: 1.0,
            min_scale: 1.0,
        }
    }
}

pub fn zoom_profile(country: &str) -> ZoomProfile {
    match country {
        // Spread over so much sea that the default fit barely zooms
        "Indonesia" => ZoomProfile {
            padding: 0.9,
            min_scale: 1.35,
            ..ZoomProfile::default()
        },
        "Vietnam" => ZoomProfile {
            fit_ratio: 0.9,
            ..ZoomProfile::default()
        },
        _ => ZoomProfile::default(),
    }
}
