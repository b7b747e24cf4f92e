//! JobCast engine: fetching, extraction, pipeline orchestration and delivery dispatch.
mod decode;
mod delivery;
mod extract;
mod fetch;
mod pipeline;
mod types;

pub use decode::{decode_document, decode_html, RawDocument};
pub use delivery::{
    DeliveryError, DeliveryId, DirectoryError, DispatchError, DispatchOutcome,
    JobAlertDispatcher, MessageSender, Recipient, RecipientDirectory,
};
pub use extract::{Candidates, ParsedDocument, StrategyExtractor};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_USER_AGENT};
pub use pipeline::{JobPipeline, NoopProgressSink, PipelineOutcome, ProgressSink};
pub use types::{
    EmptyReason, FailureKind, FetchError, FetchMetadata, FetchOutput, PipelineEvent, RunId,
};
