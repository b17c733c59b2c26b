use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Error type returned by [`crate::source::AttendanceSource`] implementations.
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOperation {
    IdentityLookup,
    SubjectCatalog,
    Attendance { subject_id: Uuid },
}

impl fmt::Display for FetchOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchOperation::IdentityLookup => f.write_str("student lookup"),
            FetchOperation::SubjectCatalog => f.write_str("subject catalog fetch"),
            FetchOperation::Attendance { subject_id } => {
                write!(f, "attendance fetch for subject {subject_id}")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("{operation} failed")]
    Fetch {
        operation: FetchOperation,
        #[source]
        source: SourceError,
    },
    #[error("attendance fetch task did not complete")]
    Task(#[from] tokio::task::JoinError),
}

impl AttendanceError {
    pub fn fetch(operation: FetchOperation, source: SourceError) -> Self {
        AttendanceError::Fetch { operation, source }
    }

    pub fn operation(&self) -> Option<FetchOperation> {
        match self {
            AttendanceError::Fetch { operation, .. } => Some(*operation),
            AttendanceError::Task(_) => None,
        }
    }
}
