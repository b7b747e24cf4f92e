use std::fmt;

/// Pipeline progress. Runs only move forward; any failure jumps straight to `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PipelineStage {
    #[default]
    Idle,
    Fetching,
    Extracting,
    Validating,
    Composing,
    Done,
}

impl PipelineStage {
    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(self, next: PipelineStage) -> bool {
        use PipelineStage::*;
        match (self, next) {
            (Done, _) => false,
            (_, Done) => true,
            (Idle, Fetching)
            | (Fetching, Extracting)
            | (Extracting, Validating)
            | (Validating, Composing) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Fetching => "fetching",
            PipelineStage::Extracting => "extracting",
            PipelineStage::Validating => "validating",
            PipelineStage::Composing => "composing",
            PipelineStage::Done => "done",
        };
        f.write_str(name)
    }
}
