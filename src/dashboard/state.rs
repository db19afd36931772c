use super::models::DatasetRecord;

/// Identifies one retrieval attempt within a dashboard workspace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttemptId(u64);

impl AttemptId {
    pub(crate) fn next(self) -> Self {
        AttemptId(self.0 + 1)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Phase of the dataset fetch as seen by the presentation layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RetrievalState {
    #[default]
    Idle,
    Loading,
    Success(Vec<DatasetRecord>),
    Error(String),
}

impl RetrievalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalState::Idle => "idle",
            RetrievalState::Loading => "loading",
            RetrievalState::Success(_) => "success",
            RetrievalState::Error(_) => "error",
        }
    }

    /// Records currently on display; empty outside `Success`.
    pub fn records(&self) -> &[DatasetRecord] {
        match self {
            RetrievalState::Success(records) => records,
            _ => &[],
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            RetrievalState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RetrievalState::Loading)
    }
}
