use anyhow::Context;
use reqwest::Method;
use tracing::info;
use vizserver_core::model::{Job, Pagination, View, Workbook};
use vizserver_core::request_options::RequestOptions;

use crate::content_models::{
    IdRef, ViewsResponse, WorkbookItem, WorkbookRequest, WorkbookRequestItem, WorkbookResponse,
    WorkbooksResponse,
};
use crate::job_models::JobResponse;
use crate::paging::{PagedEndpoint, Pager};
use crate::server::Server;
use crate::session_models::pagination_or_single;
use crate::tags::{self, Taggable};
use crate::xml::{EMPTY_REQUEST, build_request};

/// Fields to change on a workbook; `None` leaves the value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkbookUpdate {
    pub name: Option<String>,
    pub show_tabs: Option<bool>,
    pub project_id: Option<String>,
    pub owner_id: Option<String>,
}

pub struct Workbooks<'a> {
    server: &'a Server,
}

impl<'a> Workbooks<'a> {
    pub(crate) fn new(server: &'a Server) -> Self {
        Self { server }
    }

    pub fn list(&self, options: &RequestOptions) -> anyhow::Result<(Vec<Workbook>, Pagination)> {
        let url = self.server.site_url(&["workbooks"], Some(options))?;
        info!(page = options.page_number, "listing workbooks");
        let payload: WorkbooksResponse = self.server.get_xml(url).context("list workbooks")?;
        let items: Vec<Workbook> = payload
            .workbooks
            .items
            .into_iter()
            .map(WorkbookItem::into_model)
            .collect();
        let pagination = pagination_or_single(payload.pagination, options, items.len());
        Ok((items, pagination))
    }

    pub fn all(&self) -> anyhow::Result<Vec<Workbook>> {
        Pager::new(self, self.server.default_options()).collect_all()
    }

    pub fn get_by_id(&self, workbook_id: &str) -> anyhow::Result<Workbook> {
        let url = self.server.site_url(&["workbooks", workbook_id], None)?;
        let payload: WorkbookResponse = self
            .server
            .get_xml(url)
            .with_context(|| format!("get workbook {workbook_id}"))?;
        Ok(payload.workbook.into_model())
    }

    pub fn update(&self, workbook_id: &str, update: &WorkbookUpdate) -> anyhow::Result<Workbook> {
        let url = self.server.site_url(&["workbooks", workbook_id], None)?;
        let body = build_request(&WorkbookRequest {
            workbook: WorkbookRequestItem {
                name: update.name.clone(),
                show_tabs: update.show_tabs,
                project: update.project_id.as_deref().map(IdRef::new),
                owner: update.owner_id.as_deref().map(IdRef::new),
            },
        })?;
        let payload: WorkbookResponse = self
            .server
            .send_xml(Method::PUT, url, body)
            .with_context(|| format!("update workbook {workbook_id}"))?;
        Ok(payload.workbook.into_model())
    }

    pub fn delete(&self, workbook_id: &str) -> anyhow::Result<()> {
        let url = self.server.site_url(&["workbooks", workbook_id], None)?;
        self.server
            .send_empty(Method::DELETE, url, None)
            .with_context(|| format!("delete workbook {workbook_id}"))?;
        info!(id = workbook_id, "deleted workbook");
        Ok(())
    }

    pub fn views(&self, workbook_id: &str) -> anyhow::Result<Vec<View>> {
        let url = self
            .server
            .site_url(&["workbooks", workbook_id, "views"], None)?;
        let payload: ViewsResponse = self
            .server
            .get_xml(url)
            .with_context(|| format!("list views of workbook {workbook_id}"))?;
        Ok(payload
            .views
            .items
            .into_iter()
            .map(|view| view.into_model(Some(workbook_id)))
            .collect())
    }

    /// Queues an extract refresh; the returned job can be passed to
    /// [`crate::jobs::Jobs::wait_for_job`].
    pub fn refresh(&self, workbook_id: &str) -> anyhow::Result<Job> {
        let url = self
            .server
            .site_url(&["workbooks", workbook_id, "refresh"], None)?;
        let payload: JobResponse = self
            .server
            .send_xml(Method::POST, url, EMPTY_REQUEST.to_string())
            .with_context(|| format!("refresh workbook {workbook_id}"))?;
        let job = payload.job.into_model();
        info!(workbook = workbook_id, job = job.id.as_str(), "queued workbook refresh");
        Ok(job)
    }

    pub fn add_tags(&self, workbook_id: &str, labels: &[String]) -> anyhow::Result<Vec<String>> {
        tags::add_tags(self.server, Taggable::Workbooks, workbook_id, labels)
    }

    pub fn delete_tag(&self, workbook_id: &str, label: &str) -> anyhow::Result<()> {
        tags::delete_tag(self.server, Taggable::Workbooks, workbook_id, label)
    }
}

impl PagedEndpoint for Workbooks<'_> {
    type Item = Workbook;

    fn page(&self, options: &RequestOptions) -> anyhow::Result<(Vec<Workbook>, Pagination)> {
        self.list(options)
    }
}
