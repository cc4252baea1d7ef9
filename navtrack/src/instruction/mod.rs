//! Instruction translation.
//!
//! Directions services return each step's instruction as an HTML fragment
//! (`Turn <b>left</b> onto <b>Main St</b>`) together with an optional
//! maneuver code. The translator turns that pair into a short localized
//! phrase suitable for display and speech:
//!
//! ```text
//! maneuver ──► phrase table ─────────────┐
//!                                        ├──► "左转，前往Main St"
//! html ──► strip tags ──► decode ──► "toward <road>"
//! ```
//!
//! Translation is best-effort and never fails: missing matches simply drop
//! the road-name suffix.

mod language;
mod maneuver;

pub use language::Language;
pub use maneuver::{icon_for, Maneuver, DEFAULT_ICON};

use regex::Regex;
use std::sync::OnceLock;

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]*>").unwrap())
}

fn whitespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Road-name pattern: lazily capture after "toward " up to a literal
/// "Restricted" marker or the end of the text.
fn toward_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"toward (.+?)(?:Restricted|$)").unwrap())
}

/// Reduces an HTML instruction fragment to plain text.
///
/// Every tag becomes a single space, entities are decoded, whitespace runs
/// collapse to one space, and the ends are trimmed.
pub fn clean_html(raw: &str) -> String {
    let without_tags = tag_pattern().replace_all(raw, " ");
    let decoded = html_escape::decode_html_entities(&without_tags);
    whitespace_pattern()
        .replace_all(&decoded, " ")
        .trim()
        .to_string()
}

/// Extracts the destination road from cleaned instruction text.
///
/// Returns `None` when there is no `toward` clause or it names nothing.
pub fn extract_road_name(text: &str) -> Option<String> {
    let captures = toward_pattern().captures(text)?;
    let road = captures.get(1)?.as_str().trim();
    if road.is_empty() {
        None
    } else {
        Some(road.to_string())
    }
}

/// Maps maneuver codes and raw HTML instructions to localized text.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstructionTranslator {
    language: Language,
}

impl InstructionTranslator {
    /// Creates a translator producing text in `language`.
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// The output language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Localized phrase for a maneuver code; absent or unknown codes fall
    /// back to "continue straight".
    pub fn maneuver_phrase(&self, maneuver: Option<&str>) -> &'static str {
        maneuver
            .and_then(Maneuver::from_code)
            .map(|m| m.phrase(self.language))
            .unwrap_or_else(|| self.language.continue_straight())
    }

    /// Translates one route step.
    ///
    /// The maneuver drives the phrase; the raw text only contributes the
    /// optional "heading toward <road>" suffix.
    pub fn translate(&self, maneuver: Option<&str>, raw_instruction_html: &str) -> String {
        let phrase = self.maneuver_phrase(maneuver);
        let text = clean_html(raw_instruction_html);

        match extract_road_name(&text) {
            Some(road) => self.language.heading_toward(phrase, &road),
            None => phrase.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> InstructionTranslator {
        InstructionTranslator::new(Language::English)
    }

    #[test]
    fn test_clean_html_strips_tags_and_collapses_space() {
        assert_eq!(
            clean_html("Turn <b>right</b> onto <b>Main St</b>"),
            "Turn right onto Main St"
        );
        assert_eq!(
            clean_html("<div style=\"font-size:0.9em\">Destination</div>"),
            "Destination"
        );
        assert_eq!(clean_html("  a\n\t  b  "), "a b");
    }

    #[test]
    fn test_clean_html_decodes_entities() {
        assert_eq!(clean_html("Head &amp; go"), "Head & go");
        assert_eq!(clean_html("Stay on&nbsp;I-280"), "Stay on I-280");
        assert_eq!(clean_html("O&#39;Farrell St"), "O'Farrell St");
    }

    #[test]
    fn test_absent_maneuver_defaults_and_output_has_no_markup() {
        let out = english().translate(None, "<b>Turn</b> right onto Main St");
        assert_eq!(out, "Continue straight");
        assert!(!out.contains('<') && !out.contains('>'));
    }

    #[test]
    fn test_unknown_maneuver_defaults() {
        assert_eq!(
            english().translate(Some("ferry-train"), "Take the ferry"),
            "Continue straight"
        );
    }

    #[test]
    fn test_road_name_suffix() {
        let out = english().translate(
            Some("turn-left"),
            "Turn <b>left</b> onto <b>Market St</b> toward <b>Union Square</b>",
        );
        assert_eq!(out, "Turn left, heading toward Union Square");
    }

    #[test]
    fn test_road_name_stops_at_restricted_marker() {
        let out = english().translate(
            Some("turn-right"),
            "Turn right toward <b>Oak St</b><div>Restricted usage road</div>",
        );
        assert_eq!(out, "Turn right, heading toward Oak St");
    }

    #[test]
    fn test_chinese_output() {
        let translator = InstructionTranslator::new(Language::Chinese);
        assert_eq!(
            translator.translate(Some("turn-left"), "Turn left toward <b>Main St</b>"),
            "左转，前往Main St"
        );
        assert_eq!(translator.translate(None, "Head north"), "直行");
        assert_eq!(translator.translate(Some("roundabout-right"), ""), "环岛右转");
    }

    #[test]
    fn test_extract_road_name_edge_cases() {
        assert_eq!(extract_road_name("Head north"), None);
        assert_eq!(extract_road_name("Turn left toward"), None);
        assert_eq!(
            extract_road_name("Keep left toward I-80 E"),
            Some("I-80 E".to_string())
        );
    }
}
