use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use futures_util::StreamExt;
use jobcast_core::SourceDescriptor;
use jobcast_logging::jobcast_debug;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT};

use crate::{FailureKind, FetchError, FetchMetadata, FetchOutput};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
    pub user_agent: String,
    pub accept_language: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(15),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

/// Retrieves the raw listing page for a source. Implementations do not retry.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, descriptor: &SourceDescriptor) -> Result<FetchOutput, FetchError>;
}

/// Plain-HTTP fetcher. Each call owns a fresh client that is dropped when the
/// call returns, whatever the outcome.
#[derive(Debug, Clone, Default)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn client(&self, redirects: &Arc<AtomicUsize>) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(redirect_policy(self.settings.redirect_limit, Arc::clone(redirects)))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    async fn fetch_url(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let target = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let redirects = Arc::new(AtomicUsize::new(0));
        let client = self.client(&redirects)?;

        let response = client
            .get(target)
            .header(USER_AGENT, self.settings.user_agent.as_str())
            .header(ACCEPT, ACCEPT_HTML)
            .header(ACCEPT_LANGUAGE, self.settings.accept_language.as_str())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let content_type = self.accept_response(&response)?;
        let final_url = response.url().to_string();
        let bytes = read_capped(response, self.settings.max_bytes).await?;

        Ok(FetchOutput {
            metadata: FetchMetadata {
                original_url: url.to_string(),
                final_url,
                redirect_count: redirects.load(Ordering::Relaxed),
                content_type,
                byte_len: bytes.len() as u64,
            },
            bytes,
        })
    }

    /// Status, declared length and media type checks made before any body
    /// byte is read. Returns the raw Content-Type header, if any.
    fn accept_response(&self, response: &reqwest::Response) -> Result<Option<String>, FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        match response.content_length() {
            Some(declared) if declared > max_bytes => return Err(too_large(max_bytes, declared)),
            _ => {}
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        // A missing header is given the benefit of the doubt; the decoder sniffs.
        if let Some(header) = content_type.as_deref() {
            let essence = media_type(header);
            let allowed = self
                .settings
                .allowed_content_types
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(essence));
            if !allowed {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: header.to_string(),
                    },
                    format!("{essence} is not a listing page"),
                ));
            }
        }
        Ok(content_type)
    }
}

/// Follows up to `limit` redirects, recording how many were taken.
fn redirect_policy(limit: usize, followed: Arc<AtomicUsize>) -> reqwest::redirect::Policy {
    reqwest::redirect::Policy::custom(move |attempt| {
        // `previous` holds every URL requested so far, so its length is the
        // number of this hop.
        let hop = attempt.previous().len();
        if hop > limit {
            attempt.error(format!("more than {limit} redirects"))
        } else {
            followed.store(hop, Ordering::Relaxed);
            attempt.follow()
        }
    })
}

/// `text/html; charset=utf-8` -> `text/html`
fn media_type(header: &str) -> &str {
    header.split_once(';').map_or(header, |(essence, _)| essence).trim()
}

async fn read_capped(response: reqwest::Response, max_bytes: u64) -> Result<Vec<u8>, FetchError> {
    let mut body = Vec::new();
    let mut chunks = response.bytes_stream();
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        let received = (body.len() + chunk.len()) as u64;
        if received > max_bytes {
            return Err(too_large(max_bytes, received));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, descriptor: &SourceDescriptor) -> Result<FetchOutput, FetchError> {
        let url = descriptor.endpoint_url();
        jobcast_debug!("fetching source={} url={}", descriptor.name, url);
        let result = self.fetch_url(&url).await;
        if let Ok(output) = &result {
            jobcast_debug!(
                "fetched source={} bytes={} redirects={}",
                descriptor.name,
                output.metadata.byte_len,
                output.metadata.redirect_count
            );
        }
        result
    }
}

fn too_large(max_bytes: u64, actual: u64) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        format!("{actual} bytes exceeds the {max_bytes} byte cap"),
    )
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_redirect() {
        FailureKind::RedirectLimitExceeded
    } else {
        FailureKind::Network
    };
    FetchError::new(kind, err.to_string())
}
