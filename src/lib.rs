// =============================================================================
// CASE STATUS ENGINE
// =============================================================================
//
// Fetch a court case status page, notice when the court is asking for a
// captcha instead, and otherwise pull parties, dates and order links out of
// whatever the page looks like today.
//
//   caller -> CaseRecordFetcher::fetch(query)
//          -> one HTTP GET
//          -> challenge_scanner::classify(body)
//          -> challenge?  ChallengePresent, done
//          -> otherwise   extractors (fields + links) -> Success
//
// Around the core: a document retriever for the links it finds and a query
// history for callers that want to keep what came back.
// =============================================================================

pub mod challenge_scanner;
pub mod config;
pub mod documents;
pub mod extractors;
pub mod fetcher;
pub mod history;
pub mod models;

pub use config::Config;
pub use fetcher::{CaseRecordFetcher, FetchError};
pub use models::{CaseQuery, DocumentLink, FetchOutcome, ParsedCaseRecord};
