// =============================================================================
// models.rs - THE DATA STRUCTURES OF ONE CASE LOOKUP
// =============================================================================
//
// A query goes in, an outcome comes out. Everything in between is created
// fresh per call and thrown away once the caller has it. Nothing here knows
// about HTTP, HTML or regexes; these are just the shapes of the answers.
//
// Every field of a parsed record is optional on purpose. The court pages have
// no stable schema, so "we didn't find it" is a perfectly normal answer and
// never an error.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// The `(case_type, case_number, filing_year)` triple identifying a case.
///
/// Constructed by the caller, who is also responsible for making sure none
/// of the fields are empty. The pipeline does not re-validate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseQuery {
    pub case_type: String,
    pub case_number: String,
    pub filing_year: String,
}

impl CaseQuery {
    pub fn new(
        case_type: impl Into<String>,
        case_number: impl Into<String>,
        filing_year: impl Into<String>,
    ) -> Self {
        Self {
            case_type: case_type.into(),
            case_number: case_number.into(),
            filing_year: filing_year.into(),
        }
    }
}

impl fmt::Display for CaseQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.case_type, self.case_number, self.filing_year)
    }
}

/// A hyperlink believed to point at an order or judgment document.
///
/// `url` is the raw `href` exactly as the page served it and may well be
/// relative. Resolving it is the document retriever's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLink {
    pub label: String,
    pub url: String,
}

/// The four text fields the field extractor knows how to find.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFields {
    pub petitioner: Option<String>,
    pub respondent: Option<String>,
    pub filing_date: Option<String>,
    pub next_hearing_date: Option<String>,
}

/// Everything we managed to pull out of a normal (non-challenge) page.
///
/// A record with every field absent and no links is still a valid record;
/// it usually means the court served a template we have never seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCaseRecord {
    pub petitioner: Option<String>,
    pub respondent: Option<String>,
    pub filing_date: Option<String>,
    pub next_hearing_date: Option<String>,
    /// In source document order. This is a display order, not a set.
    pub document_links: Vec<DocumentLink>,
}

impl ParsedCaseRecord {
    pub fn new(fields: CaseFields, document_links: Vec<DocumentLink>) -> Self {
        Self {
            petitioner: fields.petitioner,
            respondent: fields.respondent,
            filing_date: fields.filing_date,
            next_hearing_date: fields.next_hearing_date,
            document_links,
        }
    }

    /// True when nothing at all matched.
    pub fn is_empty(&self) -> bool {
        self.petitioner.is_none()
            && self.respondent.is_none()
            && self.filing_date.is_none()
            && self.next_hearing_date.is_none()
            && self.document_links.is_empty()
    }
}

/// The tagged result of one attempt to retrieve and interpret a case page.
///
/// Exactly one variant, always. A challenge page never carries a record, and
/// a network failure never carries a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// DNS, connect, timeout, reset, or a body that could not be read.
    /// Retryable by resubmitting the query.
    NetworkFailure { message: String },

    /// The court answered, but with an automation gate instead of data.
    /// Needs a human; retrying automatically is pointless.
    ChallengePresent { raw_body: String },

    /// The court answered with something that looks like real content.
    Success {
        raw_body: String,
        record: ParsedCaseRecord,
    },
}

impl FetchOutcome {
    /// Stable lowercase label for logs and history.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchOutcome::NetworkFailure { .. } => "network_failure",
            FetchOutcome::ChallengePresent { .. } => "challenge_present",
            FetchOutcome::Success { .. } => "success",
        }
    }

    /// The raw response body, when there was a response at all.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            FetchOutcome::NetworkFailure { .. } => None,
            FetchOutcome::ChallengePresent { raw_body } => Some(raw_body),
            FetchOutcome::Success { raw_body, .. } => Some(raw_body),
        }
    }

    /// The first `max_chars` characters of the raw body, for display.
    pub fn raw_excerpt(&self, max_chars: usize) -> Option<String> {
        self.raw_body()
            .map(|body| body.chars().take(max_chars).collect())
    }

    pub fn record(&self) -> Option<&ParsedCaseRecord> {
        match self {
            FetchOutcome::Success { record, .. } => Some(record),
            _ => None,
        }
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchOutcome::NetworkFailure { message } => {
                write!(f, "network failure: {}", message)
            }
            FetchOutcome::ChallengePresent { raw_body } => {
                write!(f, "challenge present ({} bytes of body)", raw_body.len())
            }
            FetchOutcome::Success { record, raw_body } => write!(
                f,
                "success ({} document links, {} bytes of body)",
                record.document_links.len(),
                raw_body.len()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_excerpt_respects_char_boundaries() {
        let outcome = FetchOutcome::ChallengePresent {
            raw_body: "न्यायालय captcha".to_string(),
        };
        let excerpt = outcome.raw_excerpt(3).unwrap();
        assert_eq!(excerpt.chars().count(), 3);
    }

    #[test]
    fn test_network_failure_has_no_body() {
        let outcome = FetchOutcome::NetworkFailure {
            message: "timed out".to_string(),
        };
        assert!(outcome.raw_body().is_none());
        assert!(outcome.raw_excerpt(2000).is_none());
        assert!(outcome.record().is_none());
        assert_eq!(outcome.kind(), "network_failure");
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let outcome = FetchOutcome::Success {
            raw_body: "<html></html>".to_string(),
            record: ParsedCaseRecord::default(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "success");
        assert!(json["record"]["petitioner"].is_null());
    }

    #[test]
    fn test_empty_record() {
        assert!(ParsedCaseRecord::default().is_empty());
        let record = ParsedCaseRecord::new(
            CaseFields {
                petitioner: Some("John Doe".to_string()),
                ..CaseFields::default()
            },
            vec![],
        );
        assert!(!record.is_empty());
    }
}
