//! Section parser for `powercfg /requests` style reports.
//!
//! A report is a sequence of sections, each introduced by a `LABEL:` line.
//! Inside a section, every request starts with a `[KIND] path-or-name`
//! header followed by zero or more detail lines:
//!
//! ```text
//! DISPLAY:
//! [PROCESS] \Device\HarddiskVolume3\Program Files\VideoLAN\VLC\vlc.exe
//! Video Wake Lock
//!
//! SYSTEM:
//! [DRIVER] Realtek High Definition Audio
//! An audio stream is currently in use.
//! ```
//!
//! Only the `DISPLAY:` section is read. The section ends at one of the known
//! sibling labels or at end of input; an unrecognized label is reported but
//! does not end the section.

use tracing::{trace, warn};

use super::name::extract_name;
use crate::storage::model::BlockingEntity;

/// Label of the section that is collected.
const TARGET_SECTION: &str = "DISPLAY";

/// Labels that close the target section. Closed set for the report format.
const SIBLING_SECTIONS: &[&str] = &[
    "SYSTEM",
    "AWAYMODE",
    "EXECUTION",
    "PERFBOOST",
    "ACTIVELOCKSCREEN",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Outside,
    Inside,
}

/// Shape of one report line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind<'a> {
    Blank,
    /// `DISPLAY:`
    TargetSection,
    /// One of [`SIBLING_SECTIONS`].
    SiblingSection,
    /// `LABEL:` outside the known vocabulary.
    UnknownSection(&'a str),
    /// `[KIND] rest`; holds the trimmed text after the closing bracket.
    Header(&'a str),
    /// Anything else, trimmed.
    Text(&'a str),
}

fn classify(line: &str) -> LineKind<'_> {
    let line = line.trim();
    if line.is_empty() {
        return LineKind::Blank;
    }

    if let Some(label) = section_label(line) {
        return if label == TARGET_SECTION {
            LineKind::TargetSection
        } else if SIBLING_SECTIONS.contains(&label) {
            LineKind::SiblingSection
        } else {
            LineKind::UnknownSection(label)
        };
    }

    if line.starts_with('[')
        && let Some(close) = line.find(']')
    {
        return LineKind::Header(line[close + 1..].trim());
    }

    LineKind::Text(line)
}

/// Returns the label of a `LABEL:` line.
///
/// Labels are uppercase ASCII (digits and `_` allowed after the first
/// letter) with nothing after the colon.
fn section_label(line: &str) -> Option<&str> {
    let label = line.strip_suffix(':')?;
    let mut chars = label.chars();
    let first = chars.next()?;
    if !first.is_ascii_uppercase() {
        return None;
    }
    chars
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        .then_some(label)
}

/// Returns `true` if any line of `text` is a `LABEL:` section marker.
pub(crate) fn has_section_marker(text: &str) -> bool {
    text.lines().any(|line| section_label(line.trim()).is_some())
}

/// Result of parsing one report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    /// Display-blocking entities in header order.
    pub entities: Vec<BlockingEntity>,
    /// Section labels seen in the report that are not part of the known
    /// vocabulary, in first-seen order without duplicates.
    pub unknown_sections: Vec<String>,
}

/// Parses a report into the display-blocking entities it lists.
///
/// Never fails: lines that fit no known shape are skipped.
pub fn parse(text: &str) -> Vec<BlockingEntity> {
    parse_report(text).entities
}

/// Parses a report, also returning the unrecognized section labels.
pub fn parse_report(text: &str) -> ParseReport {
    let mut report = ParseReport::default();
    let mut scope = Scope::Outside;
    // Index into `report.entities` of the entity that detail lines refine.
    let mut current: Option<usize> = None;

    for line in text.lines() {
        match classify(line) {
            LineKind::Blank => {}
            LineKind::TargetSection => {
                scope = Scope::Inside;
                current = None;
            }
            LineKind::SiblingSection => {
                scope = Scope::Outside;
                current = None;
            }
            LineKind::UnknownSection(label) => {
                if !report.unknown_sections.iter().any(|l| l == label) {
                    warn!("Unrecognized section label in power request report: {label}:");
                    report.unknown_sections.push(label.to_string());
                }
            }
            LineKind::Header(rest) => {
                if scope == Scope::Inside {
                    report.entities.push(BlockingEntity::new(extract_name(rest)));
                    current = Some(report.entities.len() - 1);
                }
            }
            LineKind::Text(text) => {
                if scope == Scope::Inside
                    && let Some(idx) = current
                {
                    report.entities[idx].reason = text.to_string();
                }
            }
        }
    }

    trace!(
        "Parsed {} display request(s), {} unknown section(s)",
        report.entities.len(),
        report.unknown_sections.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::model::{DEFAULT_REASON, UNKNOWN_PROCESS};

    #[test]
    fn test_display_section_only() {
        let text = "\
DISPLAY:
[PROCESS] C:\\Apps\\video.exe
Playing a video file
SYSTEM:
[PROCESS] C:\\Svc\\updater.exe
Checking updates
";
        let entities = parse(text);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].name, "video");
        assert_eq!(entities[0].reason, "Playing a video file");
    }

    #[test]
    fn test_entity_without_reason_keeps_default() {
        let text = "DISPLAY:\n[PROCESS] a.exe\nreason A\n[SERVICE] b.exe\n";
        let entities = parse(text);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].name, "a");
        assert_eq!(entities[0].reason, "reason A");
        assert_eq!(entities[1].name, "b");
        assert_eq!(entities[1].reason, DEFAULT_REASON);
    }

    #[test]
    fn test_no_display_section() {
        let text = "SYSTEM:\n[DRIVER] audio\nStreaming\nAWAYMODE:\nNone.\n";
        assert!(parse(text).is_empty());
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert!(parse("").is_empty());
        assert!(parse("   \r\n\t\n").is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "DISPLAY:\r\n[PROCESS] C:\\x\\chrome.exe\r\nVideo Wake Lock\r\n\r\nSYSTEM:\r\n";
        let entities = parse(text);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].name, "chrome");
        assert_eq!(entities[0].reason, "Video Wake Lock");
    }

    #[test]
    fn test_last_reason_line_wins() {
        let text = "DISPLAY:\n[PROCESS] vlc.exe\nfirst\nsecond\n";
        let entities = parse(text);
        assert_eq!(entities[0].reason, "second");
    }

    #[test]
    fn test_duplicate_names_are_distinct() {
        let text = "DISPLAY:\n[PROCESS] C:\\a\\app.exe\none\n[PROCESS] D:\\b\\app.exe\ntwo\n";
        let entities = parse(text);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].name, "app");
        assert_eq!(entities[1].name, "app");
        assert_eq!(entities[0].reason, "one");
        assert_eq!(entities[1].reason, "two");
    }

    #[test]
    fn test_every_sibling_closes_display() {
        for sibling in SIBLING_SECTIONS {
            let text = format!(
                "DISPLAY:\n[PROCESS] kept.exe\n{sibling}:\n[PROCESS] dropped.exe\nwhy\n"
            );
            let entities = parse(&text);
            assert_eq!(entities.len(), 1, "sibling {sibling}");
            assert_eq!(entities[0].name, "kept");
            assert_eq!(entities[0].reason, DEFAULT_REASON, "sibling {sibling}");
        }
    }

    #[test]
    fn test_display_reopened_after_sibling() {
        let text = "\
DISPLAY:
[PROCESS] one.exe
SYSTEM:
[PROCESS] skipped.exe
DISPLAY:
[PROCESS] two.exe
again
";
        let entities = parse(text);
        let names: Vec<&str> = entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two"]);
        assert_eq!(entities[1].reason, "again");
    }

    #[test]
    fn test_unknown_section_does_not_change_state() {
        let text = "\
DISPLAY:
[PROCESS] first.exe
FUTURESECTION:
[PROCESS] second.exe
still display
";
        let report = parse_report(text);
        assert_eq!(report.entities.len(), 2);
        assert_eq!(report.entities[0].reason, DEFAULT_REASON);
        assert_eq!(report.entities[1].reason, "still display");
        assert_eq!(report.unknown_sections, vec!["FUTURESECTION".to_string()]);
    }

    #[test]
    fn test_unknown_section_outside_stays_outside() {
        let text = "NEWTHING:\n[PROCESS] x.exe\nDISPLAY:\nNone.\n";
        let report = parse_report(text);
        assert!(report.entities.is_empty());
        assert_eq!(report.unknown_sections, vec!["NEWTHING".to_string()]);
    }

    #[test]
    fn test_unknown_sections_deduplicated() {
        let text = "EXTRA:\nEXTRA:\nOTHER_2:\n";
        let report = parse_report(text);
        assert_eq!(
            report.unknown_sections,
            vec!["EXTRA".to_string(), "OTHER_2".to_string()]
        );
    }

    #[test]
    fn test_none_placeholder_ignored() {
        let text = "DISPLAY:\nNone.\n\nSYSTEM:\nNone.\n";
        assert!(parse(text).is_empty());
    }

    #[test]
    fn test_detail_before_any_header_ignored() {
        let text = "DISPLAY:\norphan detail\n[PROCESS] app.exe\n";
        let entities = parse(text);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].reason, DEFAULT_REASON);
    }

    #[test]
    fn test_header_without_name() {
        let text = "DISPLAY:\n[PROCESS]\n[DRIVER]   \n";
        let entities = parse(text);
        assert_eq!(entities.len(), 2);
        assert!(entities.iter().all(|e| e.name == UNKNOWN_PROCESS));
    }

    #[test]
    fn test_unclosed_bracket_is_detail() {
        let text = "DISPLAY:\n[PROCESS] app.exe\n[not a header\n";
        let entities = parse(text);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].reason, "[not a header");
    }

    #[test]
    fn test_section_marker_with_text_is_not_marker() {
        let text = "DISPLAY:\n[PROCESS] app.exe\nSYSTEM: busy\n";
        let entities = parse(text);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].reason, "SYSTEM: busy");
    }

    #[test]
    fn test_section_label_shape() {
        assert_eq!(section_label("DISPLAY:"), Some("DISPLAY"));
        assert_eq!(section_label("PERF_BOOST2:"), Some("PERF_BOOST2"));
        assert_eq!(section_label("Display:"), None);
        assert_eq!(section_label(":"), None);
        assert_eq!(section_label("DISPLAY"), None);
    }

    #[test]
    fn test_has_section_marker() {
        assert!(has_section_marker("\r\n  DISPLAY:\r\nNone.\r\n"));
        assert!(!has_section_marker(
            "This command requires administrator privileges.\r\n"
        ));
        assert!(!has_section_marker(""));
    }
}
