use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use jobcast_core::{
    validate, Category, JobListing, Message, MessageComposer, PipelineStage, SourceDescriptor,
    SourceRegistry, UnknownCategory,
};
use jobcast_logging::{jobcast_debug, jobcast_info, jobcast_warn};

use crate::decode::decode_document;
use crate::extract::{ParsedDocument, StrategyExtractor};
use crate::{EmptyReason, Fetcher, PipelineEvent, RawDocument, RunId};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: PipelineEvent);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn emit(&self, _event: PipelineEvent) {}
}

/// Result of one run. `stage` is always [`PipelineStage::Done`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub run_id: RunId,
    pub category: Category,
    pub stage: PipelineStage,
    pub jobs: Vec<JobListing>,
    /// Present only for composing runs that found at least one job.
    pub message: Option<Message>,
    pub empty_reason: Option<EmptyReason>,
}

impl PipelineOutcome {
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Category -> fetch -> extract -> validate -> compose.
///
/// Only an unknown category is reported as an error, and it is reported before
/// any network access. Every other failure ends the run with zero jobs.
/// Shares nothing mutable between runs, so one pipeline can serve concurrent callers.
pub struct JobPipeline {
    registry: Arc<SourceRegistry>,
    fetcher: Arc<dyn Fetcher>,
    extractor: StrategyExtractor,
    composer: MessageComposer,
    next_run_id: AtomicU64,
}

impl JobPipeline {
    pub fn new(
        registry: Arc<SourceRegistry>,
        fetcher: Arc<dyn Fetcher>,
        composer: MessageComposer,
    ) -> Self {
        Self {
            registry,
            fetcher,
            extractor: StrategyExtractor,
            composer,
            next_run_id: AtomicU64::new(1),
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn composer(&self) -> &MessageComposer {
        &self.composer
    }

    /// Ordered, validated jobs for `token` (at most the global cap).
    pub async fn collect(
        &self,
        token: &str,
        sink: &dyn ProgressSink,
    ) -> Result<PipelineOutcome, UnknownCategory> {
        self.execute(token, None, sink).await
    }

    /// Like [`collect`](Self::collect), then composes a message for `recipient_name`
    /// when at least one job was found.
    pub async fn run(
        &self,
        token: &str,
        recipient_name: &str,
        sink: &dyn ProgressSink,
    ) -> Result<PipelineOutcome, UnknownCategory> {
        self.execute(token, Some(recipient_name), sink).await
    }

    async fn execute(
        &self,
        token: &str,
        recipient_name: Option<&str>,
        sink: &dyn ProgressSink,
    ) -> Result<PipelineOutcome, UnknownCategory> {
        let descriptor = self.registry.resolve(token).inspect_err(|err| {
            jobcast_debug!("rejecting run: {}", err);
        })?;
        let run_id = self.next_run_id.fetch_add(1, Ordering::Relaxed);
        let mut run = RunTracker::new(run_id, descriptor.category, sink);

        run.enter(PipelineStage::Fetching);
        let output = match self.fetcher.fetch(descriptor).await {
            Ok(output) => output,
            Err(err) => {
                jobcast_warn!("run={} source={} fetch failed: {}", run_id, descriptor.name, err);
                return Ok(run.finish(Vec::new(), None, Some(EmptyReason::FetchFailed(err.kind))));
            }
        };

        run.enter(PipelineStage::Extracting);
        let raw = decode_document(&output);
        jobcast_debug!(
            "run={} decoded {} bytes as {}",
            run_id,
            output.metadata.byte_len,
            raw.encoding_label
        );
        let jobs = match self.scrape(&raw, descriptor, &mut run) {
            Ok(jobs) => jobs,
            Err(reason) => {
                jobcast_warn!(
                    "run={} source={} produced no jobs: {}",
                    run_id,
                    descriptor.name,
                    reason
                );
                return Ok(run.finish(Vec::new(), None, Some(reason)));
            }
        };

        let message = recipient_name.map(|name| {
            run.enter(PipelineStage::Composing);
            self.composer.compose(name, descriptor.category, &jobs)
        });
        Ok(run.finish(jobs, message, None))
    }

    /// Extraction and validation over an already fetched document. Synchronous:
    /// the parsed tree never lives across an await.
    fn scrape(
        &self,
        raw: &RawDocument,
        descriptor: &SourceDescriptor,
        run: &mut RunTracker<'_>,
    ) -> Result<Vec<JobListing>, EmptyReason> {
        let doc = ParsedDocument::parse(raw);
        let candidates = self.extractor.extract(&doc, descriptor);
        let found = candidates.container_count();
        if found == 0 {
            return Err(EmptyReason::NoContainers);
        }

        run.enter(PipelineStage::Validating);
        let jobs = validate(candidates, descriptor);
        jobcast_debug!("run={} containers={} valid={}", run.run_id, found, jobs.len());
        if jobs.is_empty() {
            return Err(EmptyReason::NoValidCandidates);
        }
        Ok(jobs)
    }
}

struct RunTracker<'s> {
    run_id: RunId,
    category: Category,
    stage: PipelineStage,
    sink: &'s dyn ProgressSink,
}

impl<'s> RunTracker<'s> {
    fn new(run_id: RunId, category: Category, sink: &'s dyn ProgressSink) -> Self {
        Self {
            run_id,
            category,
            stage: PipelineStage::Idle,
            sink,
        }
    }

    fn enter(&mut self, next: PipelineStage) {
        debug_assert!(
            self.stage.can_advance_to(next),
            "illegal transition {} -> {}",
            self.stage,
            next
        );
        self.stage = next;
        jobcast_debug!("run={} category={} stage={}", self.run_id, self.category, next);
        self.sink.emit(PipelineEvent::StageEntered {
            run_id: self.run_id,
            stage: next,
        });
    }

    fn finish(
        mut self,
        jobs: Vec<JobListing>,
        message: Option<Message>,
        empty_reason: Option<EmptyReason>,
    ) -> PipelineOutcome {
        self.enter(PipelineStage::Done);
        jobcast_info!(
            "run={} category={} finished with {} job(s)",
            self.run_id,
            self.category,
            jobs.len()
        );
        PipelineOutcome {
            run_id: self.run_id,
            category: self.category,
            stage: self.stage,
            jobs,
            message,
            empty_reason,
        }
    }
}
