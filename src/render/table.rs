use std::fmt::Write as _;

use crate::api::LoadError;
use crate::domain::{CertificationRecord, filter_records};

const HEADERS: [&str; 4] = ["Country", "Standards", "Grid", "Certification"];
/// Shown when the keyword filter leaves nothing
pub const NO_DATA: &str = "No matching data";

fn columns(record: &CertificationRecord) -> [&str; 4] {
    [
        record.country.as_str(),
        record.standards.as_str(),
        record.grid.as_str(),
        record.certification.as_str(),
    ]
}

fn push_row(out: &mut String, cells: &[&str; 4], widths: &[usize; 4]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(" | ");
    let _ = writeln!(out, "| {} |", line);
}

fn push_full_row(out: &mut String, text: &str, inner: usize) {
    let pad = inner.saturating_sub(text.chars().count());
    let _ = writeln!(out, "| {}{} |", text, " ".repeat(pad));
}

/// Render the comparison table as aligned plain text
///
/// A load error is printed as the only row. A keyword that filters out
/// every record leaves the [`NO_DATA`] placeholder row.
pub fn render_table(records: Result<&[CertificationRecord], &LoadError>, keyword: &str) -> String {
    let rows: Vec<&CertificationRecord> = match records {
        Ok(records) => filter_records(records, keyword),
        Err(_) => Vec::new(),
    };

    let mut widths = HEADERS.map(|h| h.chars().count());
    for record in &rows {
        for (width, cell) in widths.iter_mut().zip(columns(record)) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let message = match records {
        Err(e) => Some(format!("Failed to load certification data: {}", e)),
        Ok(_) if rows.is_empty() => Some(NO_DATA.to_string()),
        Ok(_) => None,
    };
    // column contents plus the " | " separators
    let mut inner = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);
    if let Some(message) = &message {
        let len = message.chars().count();
        if len > inner {
            widths[3] += len - inner;
            inner = len;
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS, &widths);
    let rule = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-|-");
    let _ = writeln!(out, "|-{}-|", rule);

    match message {
        Some(message) => push_full_row(&mut out, &message, inner),
        None => {
            for record in rows {
                push_row(&mut out, &columns(record), &widths);
            }
        }
    }
    out
}
