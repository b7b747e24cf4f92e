//! JobCast core: pure domain model, source registry, validation and message composition.
mod canonical;
mod category;
mod compose;
mod listing;
mod registry;
mod source;
mod stage;
mod validate;

pub use canonical::{canonical_link, is_placeholder_link, resolve_link};
pub use category::{Category, UnknownCategory};
pub use compose::{
    pack_entries, render_entry, render_header, Message, MessageComposer, DEFAULT_FOOTER,
    DEFAULT_MESSAGE_LIMIT,
};
pub use listing::{JobListing, RawCandidate};
pub use registry::SourceRegistry;
pub use source::{Field, FieldStrategy, SourceDescriptor, Target, GLOBAL_CAP};
pub use stage::PipelineStage;
pub use validate::validate;

pub use url::Url;
