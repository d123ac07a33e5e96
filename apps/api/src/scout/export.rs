//! Tabular exports of a record set: CSV and a Markdown pipe table.

use crate::models::record::ValidationRecord;

pub const COLUMNS: [&str; 5] = [
    "Company",
    "Website",
    "Why It Fits",
    "Evidence",
    "LinkedIn Search Strings",
];

fn row(record: &ValidationRecord) -> [String; 5] {
    [
        record.company.clone(),
        record.website.clone(),
        record.reasons.join("; "),
        record.evidence.join(" | "),
        record.outreach_searches.join(" | "),
    ]
}

/// RFC 4180: fields containing a comma, quote or line break are quoted,
/// with embedded quotes doubled.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn to_csv(records: &[ValidationRecord]) -> String {
    let mut out = COLUMNS.join(",");
    out.push_str("\r\n");
    for record in records {
        let fields: Vec<String> = row(record).iter().map(|f| csv_field(f)).collect();
        out.push_str(&fields.join(","));
        out.push_str("\r\n");
    }
    out
}

fn markdown_cell(cell: &str) -> String {
    cell.replace('|', "\\|")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

pub fn to_markdown(records: &[ValidationRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 2);
    lines.push(format!("| {} |", COLUMNS.join(" | ")));
    lines.push(format!("|{}", ":---|".repeat(COLUMNS.len())));
    for record in records {
        let cells: Vec<String> = row(record).iter().map(|c| markdown_cell(c)).collect();
        lines.push(format!("| {} |", cells.join(" | ")));
    }
    lines.join("\n") + "\n"
}
