//! Boundary to the collaborators the pipeline does not own: the recipient
//! directory (registration/verification) and the outbound message channel.
use std::fmt;
use std::sync::Arc;

use jobcast_core::UnknownCategory;
use jobcast_logging::{jobcast_info, jobcast_warn};

use crate::{JobPipeline, ProgressSink, RunId};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeliveryId(pub String);

impl fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("channel rejected message: {0}")]
    Rejected(String),
    #[error("delivery channel unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub name: String,
    pub address: String,
    /// Preferred category token, validated by the pipeline.
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("no recipient for identity {0:?}")]
    NotFound(String),
    #[error("recipient directory unavailable: {0}")]
    Unavailable(String),
}

#[async_trait::async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, address: &str, body: &str) -> Result<DeliveryId, DeliveryError>;
}

#[async_trait::async_trait]
pub trait RecipientDirectory: Send + Sync {
    async fn lookup(&self, identity: &str) -> Result<Recipient, DirectoryError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered {
        run_id: RunId,
        delivery_id: DeliveryId,
        jobs_found: usize,
        jobs_sent: usize,
    },
    /// Nothing was sent; upstream failures all read as "try again later".
    NoJobsAvailable { run_id: RunId },
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Look up a recipient, run the pipeline for their category, send the result.
/// A message that would carry no job entries is never sent.
pub struct JobAlertDispatcher {
    pipeline: Arc<JobPipeline>,
    directory: Arc<dyn RecipientDirectory>,
    sender: Arc<dyn MessageSender>,
}

impl JobAlertDispatcher {
    pub fn new(
        pipeline: Arc<JobPipeline>,
        directory: Arc<dyn RecipientDirectory>,
        sender: Arc<dyn MessageSender>,
    ) -> Self {
        Self {
            pipeline,
            directory,
            sender,
        }
    }

    pub async fn dispatch(
        &self,
        identity: &str,
        sink: &dyn ProgressSink,
    ) -> Result<DispatchOutcome, DispatchError> {
        let recipient = self.directory.lookup(identity).await?;
        let outcome = self
            .pipeline
            .run(&recipient.category, &recipient.name, sink)
            .await?;

        let message = match outcome.message.as_ref() {
            Some(message) if message.entry_count() > 0 => message,
            Some(_) => {
                jobcast_warn!(
                    "run={} {} job(s) found but none fit the {} unit budget",
                    outcome.run_id,
                    outcome.jobs.len(),
                    self.pipeline.composer().limit
                );
                return Ok(DispatchOutcome::NoJobsAvailable {
                    run_id: outcome.run_id,
                });
            }
            None => {
                jobcast_info!(
                    "run={} no jobs available for {} ({})",
                    outcome.run_id,
                    identity,
                    outcome.category
                );
                return Ok(DispatchOutcome::NoJobsAvailable {
                    run_id: outcome.run_id,
                });
            }
        };

        let body = message.to_string();
        let delivery_id = self
            .sender
            .send(&recipient.address, &body)
            .await
            .inspect_err(|err| {
                jobcast_warn!("run={} delivery to {} failed: {}", outcome.run_id, identity, err);
            })?;
        jobcast_info!(
            "run={} delivered {} of {} job(s) to {} as {}",
            outcome.run_id,
            message.entry_count(),
            outcome.jobs.len(),
            identity,
            delivery_id
        );

        Ok(DispatchOutcome::Delivered {
            run_id: outcome.run_id,
            delivery_id,
            jobs_found: outcome.jobs.len(),
            jobs_sent: message.entry_count(),
        })
    }
}
