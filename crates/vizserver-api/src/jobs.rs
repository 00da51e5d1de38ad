use anyhow::Context;
use reqwest::Method;
use std::time::Duration;
use tracing::{debug, info, warn};
use vizserver_core::backoff::{BackoffTimer, Clock};
use vizserver_core::error::JobError;
use vizserver_core::model::{BackgroundJob, FinishCode, Job, Pagination};
use vizserver_core::request_options::RequestOptions;

use crate::job_models::{BackgroundJobItem, BackgroundJobsResponse, JobResponse};
use crate::paging::{PagedEndpoint, Pager};
use crate::server::Server;
use crate::session_models::pagination_or_single;

pub struct Jobs<'a> {
    server: &'a Server,
}

impl<'a> Jobs<'a> {
    pub(crate) fn new(server: &'a Server) -> Self {
        Self { server }
    }

    /// Lists background jobs on the current site.
    pub fn list(
        &self,
        options: &RequestOptions,
    ) -> anyhow::Result<(Vec<BackgroundJob>, Pagination)> {
        let url = self.server.site_url(&["jobs"], Some(options))?;
        info!(page = options.page_number, "listing background jobs");
        let payload: BackgroundJobsResponse =
            self.server.get_xml(url).context("list background jobs")?;
        let items: Vec<BackgroundJob> = payload
            .background_jobs
            .items
            .into_iter()
            .map(BackgroundJobItem::into_model)
            .collect();
        let pagination = pagination_or_single(payload.pagination, options, items.len());
        Ok((items, pagination))
    }

    pub fn all(&self) -> anyhow::Result<Vec<BackgroundJob>> {
        Pager::new(self, self.server.default_options()).collect_all()
    }

    pub fn get_by_id(&self, job_id: &str) -> anyhow::Result<Job> {
        let url = self.server.site_url(&["jobs", job_id], None)?;
        let payload: JobResponse = self
            .server
            .get_xml(url)
            .with_context(|| format!("get job {job_id}"))?;
        Ok(payload.job.into_model())
    }

    pub fn cancel(&self, job_id: &str) -> anyhow::Result<()> {
        let url = self.server.site_url(&["jobs", job_id], None)?;
        self.server
            .send_empty(Method::PUT, url, None)
            .with_context(|| format!("cancel job {job_id}"))?;
        info!(id = job_id, "requested job cancellation");
        Ok(())
    }

    /// Polls the job with exponential backoff until it completes. `None`
    /// waits without a deadline.
    pub fn wait_for_job(&self, job_id: &str, timeout: Option<Duration>) -> anyhow::Result<Job> {
        let mut timer = BackoffTimer::new(timeout);
        poll_until_complete(|| self.get_by_id(job_id), &mut timer)
    }
}

impl PagedEndpoint for Jobs<'_> {
    type Item = BackgroundJob;

    fn page(
        &self,
        options: &RequestOptions,
    ) -> anyhow::Result<(Vec<BackgroundJob>, Pagination)> {
        self.list(options)
    }
}

/// Fetches a job until it reports completion, waiting on `timer` between
/// fetches, and maps the finish code to a result.
pub fn poll_until_complete<C, F>(mut fetch: F, timer: &mut BackoffTimer<C>) -> anyhow::Result<Job>
where
    C: Clock,
    F: FnMut() -> anyhow::Result<Job>,
{
    let mut job = fetch()?;
    while !job.is_complete() {
        let slept = timer
            .wait_once()
            .with_context(|| format!("wait for job {}", job.id))?;
        debug!(
            id = job.id.as_str(),
            progress = job.progress,
            slept_ms = slept.as_millis() as u64,
            "job still running"
        );
        job = fetch()?;
    }
    finish(job)
}

fn finish(job: Job) -> anyhow::Result<Job> {
    match job.finish_code {
        Some(FinishCode::Success) => {
            info!(id = job.id.as_str(), "job succeeded");
            Ok(job)
        }
        Some(FinishCode::Failed) => {
            warn!(id = job.id.as_str(), notes = ?job.notes, "job failed");
            Err(JobError::Failed(Box::new(job)).into())
        }
        Some(FinishCode::Cancelled) => {
            warn!(id = job.id.as_str(), "job was cancelled");
            Err(JobError::Cancelled(Box::new(job)).into())
        }
        _ => Err(JobError::UnexpectedFinishCode(Box::new(job)).into()),
    }
}
