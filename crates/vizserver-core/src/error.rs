use thiserror::Error;

use crate::backoff::BackoffError;
use crate::model::Job;

/// Error payload returned by the server for a non-success response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("server returned {status} ({code}): {summary}: {detail}")]
pub struct ServerError {
    pub status: u16,
    pub code: String,
    pub summary: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("job {} failed", .0.id)]
    Failed(Box<Job>),
    #[error("job {} was cancelled", .0.id)]
    Cancelled(Box<Job>),
    #[error("job {} completed with unexpected finish code {:?}", .0.id, .0.finish_code)]
    UnexpectedFinishCode(Box<Job>),
}

impl JobError {
    pub fn job(&self) -> &Job {
        match self {
            JobError::Failed(job)
            | JobError::Cancelled(job)
            | JobError::UnexpectedFinishCode(job) => job,
        }
    }
}

fn server_status(err: &anyhow::Error) -> Option<u16> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ServerError>())
        .map(|server| server.status)
}

pub fn is_not_found(err: &anyhow::Error) -> bool {
    server_status(err) == Some(404)
}

pub fn is_unauthorized(err: &anyhow::Error) -> bool {
    server_status(err) == Some(401)
}

pub fn is_timeout(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| cause.downcast_ref::<BackoffError>().is_some())
}
