// =============================================================================
// fetcher.rs - ONE QUERY, ONE REQUEST, ONE ANSWER
// =============================================================================
//
// The orchestrator. Given a case query it:
//
// 1. Sends exactly one GET to the case status service, with a hard timeout
//    and an honest User-Agent.
// 2. If the network lets us down, says so (NetworkFailure) and stops.
// 3. Hands the body to the challenge scanner. If the court wants a human,
//    says so (ChallengePresent) and stops. No extraction happens on a
//    challenge page, ever.
// 4. Otherwise runs the field and link extractors and returns Success.
//
// There is no retry, no cache, no circuit breaker. A query either finishes
// inside the timeout or comes back as a network failure. Nothing is stored
// here either; persistence belongs to whoever called us.
//
// The fetcher holds a reqwest client and some strings, all immutable after
// construction, so one instance can serve any number of concurrent callers.
// =============================================================================

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::challenge_scanner;
use crate::config::Config;
use crate::extractors;
use crate::models::{CaseQuery, FetchOutcome};

/// Everything that can go wrong before we have a body in hand.
///
/// These never escape [`CaseRecordFetcher::fetch`]; they are rendered into
/// [`FetchOutcome::NetworkFailure`]. Only construction can surface one.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("request to {endpoint} timed out after {secs:.1}s")]
    Timeout { endpoint: String, secs: f64 },

    #[error("could not connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("network error while contacting {endpoint}: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("failed to read response body from {endpoint}: {source}")]
    Body {
        endpoint: String,
        source: reqwest::Error,
    },
}

/// Fetches a case status page and turns it into a [`FetchOutcome`].
#[derive(Debug, Clone)]
pub struct CaseRecordFetcher {
    client: reqwest::Client,
    service_url: String,
    service_page: String,
    timeout: Duration,
}

impl CaseRecordFetcher {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(FetchError::ClientBuild)?;

        info!(
            endpoint = %config.service_url,
            timeout_secs = config.request_timeout.as_secs_f64(),
            "Case record fetcher ready"
        );

        Ok(Self {
            client,
            service_url: config.service_url.clone(),
            service_page: config.service_page.clone(),
            timeout: config.request_timeout,
        })
    }

    /// Run the whole pipeline for one query. Never fails: every kind of
    /// trouble is one of the outcome variants.
    pub async fn fetch(&self, query: &CaseQuery) -> FetchOutcome {
        info!(
            case_type = %query.case_type,
            case_number = %query.case_number,
            filing_year = %query.filing_year,
            endpoint = %self.service_url,
            "Fetching case status"
        );

        match self.fetch_body(query).await {
            Ok(raw_body) => interpret(raw_body),
            Err(e) => {
                warn!(error = %e, query = %query, "Case status request failed");
                FetchOutcome::NetworkFailure {
                    message: e.to_string(),
                }
            }
        }
    }

    fn query_params<'a>(&'a self, query: &'a CaseQuery) -> [(&'static str, &'a str); 4] {
        [
            ("p", self.service_page.as_str()),
            ("filling_number", query.case_number.as_str()),
            ("year", query.filing_year.as_str()),
            ("case_type", query.case_type.as_str()),
        ]
    }

    async fn fetch_body(&self, query: &CaseQuery) -> Result<String, FetchError> {
        let response = self
            .client
            .get(&self.service_url)
            .query(&self.query_params(query))
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if status.is_success() {
            debug!(status = %status, "Case status service responded");
        } else {
            // The body still gets classified; error pages are where captchas like to live.
            warn!(status = %status, "Case status service returned a non-success status");
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                self.timeout_error()
            } else {
                FetchError::Body {
                    endpoint: self.service_url.clone(),
                    source: e,
                }
            }
        })
    }

    fn timeout_error(&self) -> FetchError {
        FetchError::Timeout {
            endpoint: self.service_url.clone(),
            secs: self.timeout.as_secs_f64(),
        }
    }

    fn request_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            self.timeout_error()
        } else if e.is_connect() {
            FetchError::Connect {
                endpoint: self.service_url.clone(),
                source: e,
            }
        } else {
            FetchError::Transport {
                endpoint: self.service_url.clone(),
                source: e,
            }
        }
    }
}

/// Classify a body and, only if it is not a challenge, extract from it.
pub fn interpret(raw_body: String) -> FetchOutcome {
    if let Some(rule) = challenge_scanner::detect_challenge(&raw_body) {
        info!(
            rule = rule.name,
            body_len = raw_body.len(),
            "Court answered with an automation challenge; manual action required"
        );
        return FetchOutcome::ChallengePresent { raw_body };
    }

    let record = extractors::extract_record(&raw_body);

    info!(
        petitioner = record.petitioner.is_some(),
        respondent = record.respondent.is_some(),
        filing_date = record.filing_date.is_some(),
        next_hearing_date = record.next_hearing_date.is_some(),
        document_links = record.document_links.len(),
        "Case status page parsed"
    );

    FetchOutcome::Success { raw_body, record }
}
