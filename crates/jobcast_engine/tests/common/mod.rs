#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use jobcast_core::{Category, PipelineStage, SourceDescriptor};
use jobcast_engine::{
    FailureKind, FetchError, FetchMetadata, FetchOutput, Fetcher, PipelineEvent, ProgressSink,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(jobcast_logging::initialize_for_tests);
}

/// RemoteOK-shaped board: job rows in a table, link on the row itself.
pub const BOARD_HTML: &str = r##"
<html><head><title>Remote Frontend Jobs</title></head>
<body>
<table id="jobsboard">
  <tr class="job" data-href="/remote-jobs/101-frontend-engineer">
    <td><a class="preventLink" href="/remote-jobs/101"><h2> Frontend
        Engineer </h2></a>
      <span class="companyLink"><h3>Acme</h3></span>
      <div class="location">Berlin</div></td>
  </tr>
  <tr class="job" data-href="/remote-jobs/102-react-developer">
    <td><h2>React Developer</h2><span class="companyLink"><h3>Globex</h3></span></td>
  </tr>
  <tr class="job" data-href="/remote-jobs/101-frontend-engineer/">
    <td><h2>Frontend Engineer (repost)</h2></td>
  </tr>
  <tr class="job" data-href="#">
    <td><h2>Ghost Listing</h2></td>
  </tr>
</table>
</body></html>
"##;

/// Same jobs in a card layout the board later migrated to.
pub const CARD_HTML: &str = r#"
<html><body>
<div class="srp-jobtuple-wrapper">
  <a class="title" href="https://cards.example.com/job/1">Backend Engineer</a>
  <a class="comp-name">Initech</a>
  <span class="locWdth">Pune</span>
</div>
<div class="srp-jobtuple-wrapper">
  <a class="title" href="https://cards.example.com/job/2">Go Developer</a>
</div>
</body></html>
"#;

pub fn descriptor(category: Category, endpoint: impl Into<String>) -> SourceDescriptor {
    let mut descriptor = SourceDescriptor::remote_board(category);
    descriptor.endpoint = endpoint.into();
    descriptor.base_url = Some("https://remoteok.com".to_string());
    descriptor
}

pub fn html_output(html: &str, url: &str) -> FetchOutput {
    FetchOutput {
        bytes: html.as_bytes().to_vec(),
        metadata: FetchMetadata {
            original_url: url.to_string(),
            final_url: url.to_string(),
            redirect_count: 0,
            content_type: Some("text/html; charset=utf-8".to_string()),
            byte_len: html.len() as u64,
        },
    }
}

/// Serves a fixed page (or failure) and counts calls.
pub struct StubFetcher {
    response: Result<String, FailureKind>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn serving(html: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(html.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(kind: FailureKind) -> Arc<Self> {
        Arc::new(Self {
            response: Err(kind),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, descriptor: &SourceDescriptor) -> Result<FetchOutput, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(html) => Ok(html_output(html, &descriptor.endpoint_url())),
            Err(kind) => Err(FetchError::new(kind.clone(), "stubbed failure")),
        }
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingSink {
    pub fn stages(&self) -> Vec<PipelineStage> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|event| match event {
                PipelineEvent::StageEntered { stage, .. } => *stage,
            })
            .collect()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: PipelineEvent) {
        self.events.lock().unwrap().push(event);
    }
}
