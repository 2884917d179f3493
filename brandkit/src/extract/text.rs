//! Keyword mining over recovered file text.
//!
//! Uploaded brand documents are free-form; this module looks for the
//! headings companies actually use ("Our Mission", "Core Values",
//! "Services") and lifts the text under them into candidate attributes.

use crate::profile::{Attribute, FileKind, SourceKind, SourceRecord};
use regex::Regex;
use std::sync::OnceLock;

#[allow(clippy::expect_used)]
fn compiled(cell: &'static OnceLock<Regex>, pattern: &'static str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern is valid"))
}

fn mission_heading() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(
        &RE,
        r"(?im)^\s*(?:#+\s*)?(?:our\s+)?mission(?:\s+statement)?\s*[:\-]*\s*(.*)$",
    )
}

fn values_heading() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(
        &RE,
        r"(?im)^\s*(?:#+\s*)?(?:our\s+|core\s+)?values\s*[:\-]*\s*(.*)$",
    )
}

fn services_heading() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(
        &RE,
        r"(?im)^\s*(?:#+\s*)?(?:our\s+)?(?:services|offerings|what\s+we\s+(?:do|offer))\s*[:\-]*\s*(.*)$",
    )
}

/// Mines candidate attributes out of text recovered from an uploaded file.
///
/// Sections that are absent are simply not added; a document with no
/// recognizable headings yields an empty record.
#[must_use]
pub fn mine_text(label: &str, kind: FileKind, text: &str) -> SourceRecord {
    let mut record = SourceRecord::new(SourceKind::File(kind), label);

    if let Some(lines) = section_lines(text, mission_heading()) {
        record = record.with_text(Attribute::MissionStatement, lines.join(" "));
    }
    if let Some(lines) = section_lines(text, values_heading()) {
        record = record.with_list(Attribute::CoreValues, split_items(&lines));
    }
    if let Some(lines) = section_lines(text, services_heading()) {
        record = record.with_list(Attribute::Services, split_items(&lines));
    }
    record
}

/// The text under a heading: the heading's own trailing text if present,
/// otherwise the lines up to the next blank line or heading.
fn section_lines(text: &str, heading: &Regex) -> Option<Vec<String>> {
    let caps = heading.captures(text)?;
    let inline = caps.get(1).map_or("", |m| m.as_str().trim());
    if !inline.is_empty() {
        return Some(vec![inline.to_string()]);
    }

    let after = &text[caps.get(0)?.end()..];
    let mut lines = Vec::new();
    for line in after.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if lines.is_empty() {
                continue;
            }
            break;
        }
        if looks_like_heading(trimmed) {
            break;
        }
        lines.push(
            trimmed
                .trim_start_matches(['-', '*', '\u{2022}'])
                .trim()
                .to_string(),
        );
        if lines.len() >= 8 {
            break;
        }
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines)
    }
}

fn looks_like_heading(line: &str) -> bool {
    line.starts_with('#') || (line.ends_with(':') && line.len() <= 48)
}

/// Splits mined lines into individual items: bulleted lines are already
/// one item each, a single prose line splits on commas and semicolons.
fn split_items(lines: &[String]) -> Vec<String> {
    if lines.len() > 1 {
        return lines.to_vec();
    }
    lines
        .iter()
        .flat_map(|line| line.split([',', ';']))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::AttributeValue;

    #[test]
    fn test_inline_mission() {
        let record = mine_text(
            "brand.md",
            FileKind::PlainText,
            "Mission: Build tools people trust.\n",
        );
        assert_eq!(
            record.attributes.get(&Attribute::MissionStatement),
            Some(&AttributeValue::Text("Build tools people trust.".to_string()))
        );
    }

    #[test]
    fn test_bulleted_values() {
        let text = "## Core Values\n- Quality\n- Trust\n- Innovation\n\nMore text.";
        let record = mine_text("brand.md", FileKind::PlainText, text);

        assert_eq!(
            record.attributes.get(&Attribute::CoreValues),
            Some(&AttributeValue::List(vec![
                "Quality".to_string(),
                "Trust".to_string(),
                "Innovation".to_string(),
            ]))
        );
    }

    #[test]
    fn test_comma_separated_services() {
        let text = "Services: Consulting, Implementation, Support";
        let record = mine_text("onepager.pdf", FileKind::Pdf, text);

        assert_eq!(
            record.attributes.get(&Attribute::Services),
            Some(&AttributeValue::List(vec![
                "Consulting".to_string(),
                "Implementation".to_string(),
                "Support".to_string(),
            ]))
        );
    }

    #[test]
    fn test_section_stops_at_next_heading() {
        let text = "Our Mission\nServe customers well.\nServices:\nConsulting";
        let record = mine_text("brand.txt", FileKind::PlainText, text);

        assert_eq!(
            record.attributes.get(&Attribute::MissionStatement),
            Some(&AttributeValue::Text("Serve customers well.".to_string()))
        );
        assert!(record.attributes.contains_key(&Attribute::Services));
    }

    #[test]
    fn test_no_headings_yields_empty_record() {
        let record = mine_text(
            "notes.txt",
            FileKind::PlainText,
            "Meeting notes from Tuesday.",
        );
        assert!(record.is_empty());
    }

    #[test]
    fn test_record_carries_file_rank() {
        let record = mine_text("brand.pdf", FileKind::Pdf, "Mission: Do good work.");
        assert_eq!(record.kind, SourceKind::File(FileKind::Pdf));
        assert_eq!(record.label, "brand.pdf");
    }
}
