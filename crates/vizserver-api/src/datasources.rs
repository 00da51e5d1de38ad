use anyhow::Context;
use reqwest::Method;
use tracing::info;
use vizserver_core::model::{Datasource, Job, Pagination};
use vizserver_core::request_options::RequestOptions;

use crate::content_models::{DatasourceItem, DatasourceResponse, DatasourcesResponse};
use crate::job_models::JobResponse;
use crate::paging::{PagedEndpoint, Pager};
use crate::server::Server;
use crate::session_models::pagination_or_single;
use crate::tags::{self, Taggable};
use crate::xml::EMPTY_REQUEST;

pub struct Datasources<'a> {
    server: &'a Server,
}

impl<'a> Datasources<'a> {
    pub(crate) fn new(server: &'a Server) -> Self {
        Self { server }
    }

    pub fn list(
        &self,
        options: &RequestOptions,
    ) -> anyhow::Result<(Vec<Datasource>, Pagination)> {
        let url = self.server.site_url(&["datasources"], Some(options))?;
        info!(page = options.page_number, "listing datasources");
        let payload: DatasourcesResponse = self.server.get_xml(url).context("list datasources")?;
        let items: Vec<Datasource> = payload
            .datasources
            .items
            .into_iter()
            .map(DatasourceItem::into_model)
            .collect();
        let pagination = pagination_or_single(payload.pagination, options, items.len());
        Ok((items, pagination))
    }

    pub fn all(&self) -> anyhow::Result<Vec<Datasource>> {
        Pager::new(self, self.server.default_options()).collect_all()
    }

    pub fn get_by_id(&self, datasource_id: &str) -> anyhow::Result<Datasource> {
        let url = self.server.site_url(&["datasources", datasource_id], None)?;
        let payload: DatasourceResponse = self
            .server
            .get_xml(url)
            .with_context(|| format!("get datasource {datasource_id}"))?;
        Ok(payload.datasource.into_model())
    }

    pub fn delete(&self, datasource_id: &str) -> anyhow::Result<()> {
        let url = self.server.site_url(&["datasources", datasource_id], None)?;
        self.server
            .send_empty(Method::DELETE, url, None)
            .with_context(|| format!("delete datasource {datasource_id}"))?;
        info!(id = datasource_id, "deleted datasource");
        Ok(())
    }

    pub fn refresh(&self, datasource_id: &str) -> anyhow::Result<Job> {
        let url = self
            .server
            .site_url(&["datasources", datasource_id, "refresh"], None)?;
        let payload: JobResponse = self
            .server
            .send_xml(Method::POST, url, EMPTY_REQUEST.to_string())
            .with_context(|| format!("refresh datasource {datasource_id}"))?;
        let job = payload.job.into_model();
        info!(
            datasource = datasource_id,
            job = job.id.as_str(),
            "queued datasource refresh"
        );
        Ok(job)
    }

    pub fn add_tags(
        &self,
        datasource_id: &str,
        labels: &[String],
    ) -> anyhow::Result<Vec<String>> {
        tags::add_tags(self.server, Taggable::Datasources, datasource_id, labels)
    }

    pub fn delete_tag(&self, datasource_id: &str, label: &str) -> anyhow::Result<()> {
        tags::delete_tag(self.server, Taggable::Datasources, datasource_id, label)
    }
}

impl PagedEndpoint for Datasources<'_> {
    type Item = Datasource;

    fn page(&self, options: &RequestOptions) -> anyhow::Result<(Vec<Datasource>, Pagination)> {
        self.list(options)
    }
}
