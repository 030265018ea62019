// =============================================================================
// extractors/fields.rs - THE LABEL HUNTER
// =============================================================================
//
// There is no stable schema for a case status page. Every district, every
// redesign, every intern with access to the CMS produces a new one. So we
// don't parse tables. We look for the words a human would look for and take
// whatever follows them.
//
// One regex per field, case-insensitive, first match in the whole text wins.
// Adding a heuristic means adding a row to FIELD_RULES, nothing else.
// =============================================================================

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::models::CaseFields;

/// The fields this extractor knows how to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseField {
    Petitioner,
    Respondent,
    FilingDate,
    NextHearingDate,
}

impl fmt::Display for CaseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseField::Petitioner => write!(f, "petitioner"),
            CaseField::Respondent => write!(f, "respondent"),
            CaseField::FilingDate => write!(f, "filing_date"),
            CaseField::NextHearingDate => write!(f, "next_hearing_date"),
        }
    }
}

/// How to turn capture group 1 into a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureRule {
    /// Keep only the first line of the capture, trimmed.
    FirstLine,
    /// Keep the whole capture, trimmed.
    Token,
}

impl CaptureRule {
    fn apply(self, captured: &str) -> Option<String> {
        let value = match self {
            CaptureRule::FirstLine => captured.lines().next().unwrap_or("").trim(),
            CaptureRule::Token => captured.trim(),
        };

        // Whitespace-only captures are a non-match, not an empty string.
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

pub struct FieldRule {
    pub field: CaseField,
    pub pattern: Regex,
    pub capture: CaptureRule,
}

/// The rule table. Group 1 of each pattern is the value.
pub static FIELD_RULES: LazyLock<Vec<FieldRule>> = LazyLock::new(|| {
    vec![
        FieldRule {
            field: CaseField::Petitioner,
            pattern: Regex::new(r"(?i)Petitioner[s]?:?\s*(.+)")
                .expect("Failed to compile petitioner pattern"),
            capture: CaptureRule::FirstLine,
        },
        FieldRule {
            field: CaseField::Respondent,
            pattern: Regex::new(r"(?i)Respondent[s]?:?\s*(.+)")
                .expect("Failed to compile respondent pattern"),
            capture: CaptureRule::FirstLine,
        },
        FieldRule {
            field: CaseField::FilingDate,
            pattern: Regex::new(r"(?i)Filing Date:?\s*([A-Za-z0-9 ,\-/]+)")
                .expect("Failed to compile filing date pattern"),
            capture: CaptureRule::Token,
        },
        FieldRule {
            field: CaseField::NextHearingDate,
            pattern: Regex::new(r"(?i)Next Hearing Date:?\s*([A-Za-z0-9 ,\-/]+)")
                .expect("Failed to compile next hearing date pattern"),
            capture: CaptureRule::Token,
        },
    ]
});

/// Apply one rule to the text. First match only.
fn apply_rule(rule: &FieldRule, text: &str) -> Option<String> {
    let captures = rule.pattern.captures(text)?;
    let group = captures.get(1)?;
    rule.capture.apply(group.as_str())
}

/// Pull parties and dates out of normalized page text.
///
/// `text` should have one visual line of the page per line. Missing fields
/// are simply `None`.
pub fn extract(text: &str) -> CaseFields {
    let mut fields = CaseFields::default();

    for rule in FIELD_RULES.iter() {
        let value = apply_rule(rule, text);
        let slot = match rule.field {
            CaseField::Petitioner => &mut fields.petitioner,
            CaseField::Respondent => &mut fields.respondent,
            CaseField::FilingDate => &mut fields.filing_date,
            CaseField::NextHearingDate => &mut fields.next_hearing_date,
        };
        if slot.is_none() {
            *slot = value;
        }
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_labels() {
        let text = "Case Status\nPetitioner: John Doe\nRespondent: Jane Roe\n\
                    Filing Date: 12-01-2020\nNext Hearing Date: 05/03/2021\nStage: Evidence";
        let fields = extract(text);
        assert_eq!(fields.petitioner.as_deref(), Some("John Doe"));
        assert_eq!(fields.respondent.as_deref(), Some("Jane Roe"));
        assert_eq!(fields.filing_date.as_deref(), Some("12-01-2020"));
        assert_eq!(fields.next_hearing_date.as_deref(), Some("05/03/2021"));
    }

    #[test]
    fn test_plural_label_and_no_colon() {
        let fields = extract("Petitioners  Acme Traders and Ors.\nRespondents State of Haryana");
        assert_eq!(fields.petitioner.as_deref(), Some("Acme Traders and Ors."));
        assert_eq!(fields.respondent.as_deref(), Some("State of Haryana"));
    }

    #[test]
    fn test_case_insensitive_labels() {
        let fields = extract("PETITIONER: A\nfiling date: 1st January, 2020");
        assert_eq!(fields.petitioner.as_deref(), Some("A"));
        assert_eq!(fields.filing_date.as_deref(), Some("1st January, 2020"));
    }

    #[test]
    fn test_first_match_wins() {
        let fields = extract("Petitioner: First Person\nPetitioner: Second Person");
        assert_eq!(fields.petitioner.as_deref(), Some("First Person"));
    }

    #[test]
    fn test_value_on_next_line() {
        let fields = extract("Petitioner:\n   Ravi Sharma\nRespondent:\nSunita Devi");
        assert_eq!(fields.petitioner.as_deref(), Some("Ravi Sharma"));
        assert_eq!(fields.respondent.as_deref(), Some("Sunita Devi"));
    }

    #[test]
    fn test_missing_petitioner_is_absent_not_empty() {
        let fields = extract("Respondent: Jane Roe\nFiling Date: 12-01-2020");
        assert_eq!(fields.petitioner, None);
        assert_eq!(fields.next_hearing_date, None);
    }

    #[test]
    fn test_whitespace_only_value_is_absent() {
        let fields = extract("Petitioner:   ");
        assert_eq!(fields.petitioner, None);
    }

    #[test]
    fn test_date_token_stops_at_disallowed_character() {
        let fields = extract("Filing Date: 12-01-2020 (registered)");
        assert_eq!(fields.filing_date.as_deref(), Some("12-01-2020"));
    }

    #[test]
    fn test_extract_is_deterministic() {
        let text = "Petitioner: John Doe\nRespondent: Jane Roe\nNext Hearing Date: 1 Feb 2022";
        assert_eq!(extract(text), extract(text));
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert_eq!(extract(""), CaseFields::default());
    }
}
