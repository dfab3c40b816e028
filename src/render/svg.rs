use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

use crate::geometry::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::map::{MapPath, MapPaths};
use crate::stage::{LabelPhase, LabelSnapshot, Selection, StageSnapshot};

const CONTEXT_FILL: &str = "#e7e9ee";
const MEMBER_FILL: &str = "#9fb4d6";
const SELECTED_FILL: &str = "#1f4e9c";
const STROKE: &str = "#ffffff";

/// Escape text for use in element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn phase_name(phase: LabelPhase) -> &'static str {
    match phase {
        LabelPhase::Entering => "entering",
        LabelPhase::Visible => "visible",
        LabelPhase::Exiting => "exiting",
    }
}

fn push_context(out: &mut String, path: &MapPath) {
    let _ = writeln!(
        out,
        r#"    <path d="{}" fill="{}" stroke="{}" stroke-width="0.6" data-key="{}"/>"#,
        path.data,
        CONTEXT_FILL,
        STROKE,
        escape(&path.key)
    );
}

fn push_member(out: &mut String, path: &MapPath, selection: Selection) {
    let country = path.country.unwrap_or_default();
    let selected = selection == Selection::Country(country);
    let fill = if selected { SELECTED_FILL } else { MEMBER_FILL };
    let _ = writeln!(
        out,
        r#"    <path d="{}" fill="{}" stroke="{}" stroke-width="0.8" role="button" tabindex="0" aria-label="{}" aria-pressed="{}" data-country="{}" data-key="{}"/>"#,
        path.data,
        fill,
        STROKE,
        escape(country),
        selected,
        escape(country),
        escape(&path.key)
    );
}

fn push_label(out: &mut String, label: &LabelSnapshot, snapshot: &StageSnapshot) {
    let view_box = &snapshot.view_box;
    let (x, y) = label.placement.to_canvas(view_box);
    // keep on-screen size constant while zoomed
    let unit = view_box.width / CANVAS_WIDTH;
    let headline = 30.0 * unit;
    let official = 11.0 * unit;
    let translated = 13.0 * unit;
    let spec = label.spec;
    let opacity = match label.phase {
        LabelPhase::Visible => 1.0,
        LabelPhase::Entering | LabelPhase::Exiting => 0.0,
    };

    let _ = writeln!(
        out,
        r#"  <g class="country-label" data-country="{}" data-phase="{}" opacity="{}" text-anchor="middle">"#,
        escape(spec.country),
        phase_name(label.phase),
        opacity
    );
    let _ = writeln!(
        out,
        r#"    <text x="{:.2}" y="{:.2}" font-size="{:.2}" font-weight="700" letter-spacing="{:.3}em">{}</text>"#,
        x,
        y,
        headline,
        spec.tracking,
        escape(spec.headline)
    );
    let rule_y = y + spec.rule_offset * unit;
    let half_rule = spec.rule_width * unit / 2.0;
    let _ = writeln!(
        out,
        r#"    <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.2}"/>"#,
        x - half_rule,
        rule_y,
        x + half_rule,
        rule_y,
        SELECTED_FILL,
        unit
    );
    let _ = writeln!(
        out,
        r#"    <text x="{:.2}" y="{:.2}" font-size="{:.2}">{}</text>"#,
        x,
        rule_y + 14.0 * unit,
        official,
        escape(spec.official)
    );
    let _ = writeln!(
        out,
        r#"    <text x="{:.2}" y="{:.2}" font-size="{:.2}" lang="zh">{}</text>"#,
        x,
        rule_y + 30.0 * unit,
        translated,
        escape(spec.translated)
    );
    out.push_str("  </g>\n");
}

fn push_message(out: &mut String, message: &str) {
    let _ = writeln!(
        out,
        r#"  <text class="map-message" x="{:.2}" y="{:.2}" text-anchor="middle" font-size="16">{}</text>"#,
        CANVAS_WIDTH / 2.0,
        CANVAS_HEIGHT / 2.0,
        escape(message)
    );
}

/// Render one frame of the map as a standalone SVG document
///
/// With an `error`, or with nothing to draw, the shapes are replaced by a
/// single message.
pub fn render_map(map: &MapPaths, snapshot: &StageSnapshot, error: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{}" role="group" aria-label="ASEAN member states">"#,
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
        snapshot.view_box.to_attribute()
    );

    let message = match error {
        Some(message) => Some(message),
        None if map.is_empty() => Some("Map data unavailable"),
        None => None,
    };

    if let Some(message) = message {
        push_message(&mut out, message);
    } else {
        out.push_str("  <g class=\"context\">\n");
        for path in map.context() {
            push_context(&mut out, path);
        }
        out.push_str("  </g>\n  <g class=\"members\">\n");
        for path in map.members() {
            push_member(&mut out, path, snapshot.selection);
        }
        out.push_str("  </g>\n");

        if let Some(label) = &snapshot.label {
            push_label(&mut out, label, snapshot);
        }
    }

    out.push_str("</svg>\n");
    out
}

pub fn write_svg(path: &Path, svg: &str) -> Result<()> {
    std::fs::write(path, svg).with_context(|| format!("Failed to write SVG to {}", path.display()))
}
