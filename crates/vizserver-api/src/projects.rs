use anyhow::Context;
use reqwest::Method;
use tracing::info;
use vizserver_core::model::{Pagination, Project};
use vizserver_core::request_options::RequestOptions;

use crate::content_models::{
    ProjectItem, ProjectRequest, ProjectRequestItem, ProjectResponse, ProjectsResponse,
};
use crate::paging::{PagedEndpoint, Pager};
use crate::server::Server;
use crate::session_models::pagination_or_single;
use crate::xml::build_request;

pub struct Projects<'a> {
    server: &'a Server,
}

impl<'a> Projects<'a> {
    pub(crate) fn new(server: &'a Server) -> Self {
        Self { server }
    }

    pub fn list(&self, options: &RequestOptions) -> anyhow::Result<(Vec<Project>, Pagination)> {
        let url = self.server.site_url(&["projects"], Some(options))?;
        info!(page = options.page_number, "listing projects");
        let payload: ProjectsResponse = self.server.get_xml(url).context("list projects")?;
        let items: Vec<Project> = payload
            .projects
            .items
            .into_iter()
            .map(ProjectItem::into_model)
            .collect();
        let pagination = pagination_or_single(payload.pagination, options, items.len());
        Ok((items, pagination))
    }

    pub fn all(&self) -> anyhow::Result<Vec<Project>> {
        Pager::new(self, self.server.default_options()).collect_all()
    }

    /// The projects endpoint has no single-item GET, so this filters the list
    /// by id.
    pub fn get_by_id(&self, project_id: &str) -> anyhow::Result<Option<Project>> {
        for project in Pager::new(self, self.server.default_options()) {
            let project = project?;
            if project.id == project_id {
                return Ok(Some(project));
            }
        }
        Ok(None)
    }

    pub fn create(&self, project: &Project) -> anyhow::Result<Project> {
        let url = self.server.site_url(&["projects"], None)?;
        let body = build_request(&ProjectRequest {
            project: ProjectRequestItem::from(project),
        })?;
        let payload: ProjectResponse = self
            .server
            .send_xml(Method::POST, url, body)
            .with_context(|| format!("create project {}", project.name))?;
        let created = payload.project.into_model();
        info!(id = created.id.as_str(), name = created.name.as_str(), "created project");
        Ok(created)
    }

    pub fn update(&self, project: &Project) -> anyhow::Result<Project> {
        if project.id.is_empty() {
            anyhow::bail!("project id is required for update");
        }
        let url = self.server.site_url(&["projects", &project.id], None)?;
        let body = build_request(&ProjectRequest {
            project: ProjectRequestItem::from(project),
        })?;
        let payload: ProjectResponse = self
            .server
            .send_xml(Method::PUT, url, body)
            .with_context(|| format!("update project {}", project.id))?;
        Ok(payload.project.into_model())
    }

    pub fn delete(&self, project_id: &str) -> anyhow::Result<()> {
        let url = self.server.site_url(&["projects", project_id], None)?;
        self.server
            .send_empty(Method::DELETE, url, None)
            .with_context(|| format!("delete project {project_id}"))?;
        info!(id = project_id, "deleted project");
        Ok(())
    }
}

impl PagedEndpoint for Projects<'_> {
    type Item = Project;

    fn page(&self, options: &RequestOptions) -> anyhow::Result<(Vec<Project>, Pagination)> {
        self.list(options)
    }
}
