// =============================================================================
// config.rs - THE SMALL CONFIGURATION CHAPEL
// =============================================================================
//
// The bankruptcy engine had a cathedral. We have a chapel: one endpoint, two
// timeouts, a user agent, a document host, and a place to keep history.
//
// All values can be overridden via environment variables prefixed with
// CASE_STATUS_, and a .env file is honoured if one is lying around.
//
// The endpoint default is a best-effort guess at a third-party surface that
// changes shape whenever it likes. Expect to override it.
// =============================================================================

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Everything tunable about the pipeline and its collaborators.
#[derive(Debug, Clone)]
pub struct Config {
    // =========================================================================
    // CASE STATUS SERVICE
    // =========================================================================

    /// Base URL of the case status service. Query parameters are appended
    /// to this, never path segments.
    pub service_url: String,

    /// Value of the `p` query parameter, which selects the page on the
    /// service side.
    pub service_page: String,

    /// How long one case status request may take before we give up and
    /// report a network failure. Default: 12 seconds.
    pub request_timeout: Duration,

    /// Identifying `User-Agent` header. We say who we are.
    pub user_agent: String,

    // =========================================================================
    // DOCUMENT RETRIEVAL
    // =========================================================================

    /// Host that relative order/judgment links are resolved against.
    pub document_host: String,

    /// Download timeout for order/judgment documents. PDFs are bigger than
    /// status pages, so this gets more slack. Default: 20 seconds.
    pub document_timeout: Duration,

    // =========================================================================
    // CALLER-SIDE CONCERNS
    // =========================================================================

    /// How many characters of the raw body to show when displaying an
    /// outcome. Default: 2000.
    pub excerpt_chars: usize,

    /// Where the query history lives (JSON lines).
    pub history_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            service_page: DEFAULT_SERVICE_PAGE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            document_host: DEFAULT_DOCUMENT_HOST.to_string(),
            document_timeout: Duration::from_secs(DEFAULT_DOCUMENT_TIMEOUT_SECS),
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
            history_path: PathBuf::from(DEFAULT_HISTORY_PATH),
        }
    }
}

const DEFAULT_SERVICE_URL: &str = "https://services.ecourts.gov.in/ecourtindia_v6/";
const DEFAULT_SERVICE_PAGE: &str = "casestatus/index";
const DEFAULT_TIMEOUT_SECS: u64 = 12;
const DEFAULT_USER_AGENT: &str = "Court-Data-Fetcher/1.0 (case-status-engine)";
const DEFAULT_DOCUMENT_HOST: &str = "https://services.ecourts.gov.in";
const DEFAULT_DOCUMENT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_EXCERPT_CHARS: usize = 2000;
const DEFAULT_HISTORY_PATH: &str = "case_status_history.jsonl";

impl Config {
    /// Load configuration from environment variables with defaults.
    ///
    /// Numeric values that fail to parse fall back to their defaults rather
    /// than aborting startup. A zero timeout counts as unparseable.
    pub fn from_env() -> Self {
        // Missing .env is fine.
        let _ = dotenvy::dotenv();

        Config {
            service_url: env_or_default("CASE_STATUS_SERVICE_URL", DEFAULT_SERVICE_URL),
            service_page: env_or_default("CASE_STATUS_SERVICE_PAGE", DEFAULT_SERVICE_PAGE),
            request_timeout: duration_secs_or_default(
                "CASE_STATUS_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            ),
            user_agent: env_or_default("CASE_STATUS_USER_AGENT", DEFAULT_USER_AGENT),
            document_host: env_or_default("CASE_STATUS_DOCUMENT_HOST", DEFAULT_DOCUMENT_HOST),
            document_timeout: duration_secs_or_default(
                "CASE_STATUS_DOCUMENT_TIMEOUT_SECS",
                DEFAULT_DOCUMENT_TIMEOUT_SECS,
            ),
            excerpt_chars: env::var("CASE_STATUS_EXCERPT_CHARS")
                .ok()
                .and_then(|raw| raw.trim().parse().ok())
                .unwrap_or(DEFAULT_EXCERPT_CHARS),
            history_path: PathBuf::from(env_or_default(
                "CASE_STATUS_HISTORY_PATH",
                DEFAULT_HISTORY_PATH,
            )),
        }
    }
}

/// Read an environment variable, falling back to `default` when unset.
fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read a whole-second timeout, falling back to `default` when unset.
fn duration_secs_or_default(key: &str, default: u64) -> Duration {
    parse_timeout_secs(env::var(key).ok().as_deref(), default)
}

/// Zero counts as unparseable.
fn parse_timeout_secs(raw: Option<&str>, default: u64) -> Duration {
    let secs = raw
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(default);
    Duration::from_secs(secs)
}
