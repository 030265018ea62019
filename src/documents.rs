// =============================================================================
// documents.rs - THE ORDER COURIER
// =============================================================================
//
// The link extractor hands back hrefs exactly as the court wrote them, which
// usually means "/orders/2021/abc.pdf" with no host in sight. This module
// turns those into absolute URLs against a configured document host and
// fetches the bytes.
//
// The pipeline never calls this. It is the downstream collaborator that
// consumes DocumentLink values once a human picks one.
// =============================================================================

use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::Config;

const FALLBACK_FILE_NAME: &str = "order.pdf";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("invalid document host {host}: {source}")]
    InvalidHost {
        host: String,
        source: url::ParseError,
    },

    #[error("invalid document url {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("refusing to fetch {url}: unsupported scheme {scheme}")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("failed to download {url}: {source}")]
    Transport { url: Url, source: reqwest::Error },

    #[error("document host returned HTTP {status} for {url}")]
    HttpStatus {
        url: Url,
        status: reqwest::StatusCode,
    },
}

/// A fetched document, ready to be written somewhere.
#[derive(Debug, Clone)]
pub struct DownloadedDocument {
    pub url: Url,
    pub content_type: Option<String>,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct DocumentRetriever {
    client: reqwest::Client,
    document_host: Url,
}

impl DocumentRetriever {
    pub fn new(config: &Config) -> Result<Self, DocumentError> {
        let document_host =
            Url::parse(&config.document_host).map_err(|source| DocumentError::InvalidHost {
                host: config.document_host.clone(),
                source,
            })?;

        let client = reqwest::Client::builder()
            .timeout(config.document_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(DocumentError::ClientBuild)?;

        Ok(Self {
            client,
            document_host,
        })
    }

    /// Absolute http(s) links pass through; everything else is joined onto
    /// the document host.
    pub fn resolve(&self, raw_url: &str) -> Result<Url, DocumentError> {
        let trimmed = raw_url.trim();
        let invalid = |source| DocumentError::InvalidUrl {
            url: raw_url.to_string(),
            source,
        };

        match Url::parse(trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
            Ok(url) => Err(DocumentError::UnsupportedScheme {
                url: raw_url.to_string(),
                scheme: url.scheme().to_string(),
            }),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                self.document_host.join(trimmed).map_err(invalid)
            }
            Err(e) => Err(invalid(e)),
        }
    }

    pub async fn download(&self, raw_url: &str) -> Result<DownloadedDocument, DocumentError> {
        let url = self.resolve(raw_url)?;
        debug!(url = %url, "Downloading document");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| DocumentError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocumentError::HttpStatus { url, status });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|source| DocumentError::Transport {
                url: url.clone(),
                source,
            })?
            .to_vec();

        info!(url = %url, bytes = bytes.len(), "Document downloaded");

        Ok(DownloadedDocument {
            file_name: file_name_for(&url),
            content_type,
            url,
            bytes,
        })
    }
}

/// Last path segment when it names a pdf, otherwise a generic name.
fn file_name_for(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.last())
        .filter(|segment| segment.to_lowercase().ends_with(".pdf"))
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn retriever_for(host: &str) -> DocumentRetriever {
        let config = Config {
            document_host: host.to_string(),
            ..Config::default()
        };
        DocumentRetriever::new(&config).unwrap()
    }

    #[test]
    fn test_relative_link_resolves_against_host() {
        let retriever = retriever_for("https://services.ecourts.gov.in");
        let url = retriever.resolve("/orders/2021/o1.pdf").unwrap();
        assert_eq!(url.as_str(), "https://services.ecourts.gov.in/orders/2021/o1.pdf");
    }

    #[test]
    fn test_absolute_link_passes_through() {
        let retriever = retriever_for("https://services.ecourts.gov.in");
        let url = retriever.resolve("https://other.example/x.pdf").unwrap();
        assert_eq!(url.host_str(), Some("other.example"));
    }

    #[test]
    fn test_non_http_scheme_is_rejected() {
        let retriever = retriever_for("https://services.ecourts.gov.in");
        assert!(matches!(
            retriever.resolve("javascript:void(0)"),
            Err(DocumentError::UnsupportedScheme { .. })
        ));
        assert!(matches!(
            retriever.resolve("file:///etc/passwd"),
            Err(DocumentError::UnsupportedScheme { .. })
        ));
    }

    #[test]
    fn test_protocol_relative_link_takes_host_scheme() {
        let retriever = retriever_for("https://services.ecourts.gov.in");
        let url = retriever.resolve("//cdn.example/o.pdf").unwrap();
        assert_eq!(url.as_str(), "https://cdn.example/o.pdf");
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        let config = Config {
            document_host: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            DocumentRetriever::new(&config),
            Err(DocumentError::InvalidHost { .. })
        ));
    }

    #[test]
    fn test_file_name_for() {
        let url = Url::parse("https://h/orders/Order_1.PDF").unwrap();
        assert_eq!(file_name_for(&url), "Order_1.PDF");
        let url = Url::parse("https://h/viewOrder?id=3").unwrap();
        assert_eq!(file_name_for(&url), "order.pdf");
    }

    #[tokio::test]
    async fn test_download_fetches_bytes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await.unwrap();
            let body = b"%PDF-1.4 fake";
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/pdf\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(body).await.unwrap();
            let _ = socket.shutdown().await;
        });

        let retriever = retriever_for(&format!("http://{}", addr));
        let document = retriever.download("/x/order1.pdf").await.unwrap();
        assert_eq!(document.bytes, b"%PDF-1.4 fake");
        assert_eq!(document.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(document.file_name, "order1.pdf");
    }

    #[tokio::test]
    async fn test_download_error_status() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await.unwrap();
            socket
                .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                .await
                .unwrap();
            let _ = socket.shutdown().await;
        });

        let retriever = retriever_for(&format!("http://{}", addr));
        let result = retriever.download("/missing.pdf").await;
        assert!(matches!(result, Err(DocumentError::HttpStatus { .. })));
    }
}
