use serde::{Deserialize, Serialize};
use vizserver_core::model::{
    ContentPermissions, ContentRef, Datasource, Project, View, Workbook, parse_timestamp,
};

use crate::session_models::PaginationItem;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub(crate) struct IdRef {
    #[serde(rename = "@id")]
    pub(crate) id: String,
}

impl IdRef {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NamedRef {
    #[serde(rename = "@id")]
    pub(crate) id: String,
    #[serde(rename = "@name", default)]
    pub(crate) name: Option<String>,
}

impl From<NamedRef> for ContentRef {
    fn from(value: NamedRef) -> Self {
        ContentRef {
            id: value.id,
            name: value.name,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct TagList {
    #[serde(rename = "tag", default)]
    pub(crate) items: Vec<TagItem>,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct TagItem {
    #[serde(rename = "@label")]
    pub(crate) label: String,
}

impl TagList {
    pub(crate) fn from_labels(labels: &[String]) -> Self {
        Self {
            items: labels
                .iter()
                .map(|label| TagItem {
                    label: label.clone(),
                })
                .collect(),
        }
    }

    pub(crate) fn labels(self) -> Vec<String> {
        self.items.into_iter().map(|tag| tag.label).collect()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TagsRequest {
    pub(crate) tags: TagList,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagsResponse {
    #[serde(default)]
    pub(crate) tags: TagList,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectsResponse {
    #[serde(default)]
    pub(crate) pagination: Option<PaginationItem>,
    #[serde(default)]
    pub(crate) projects: ProjectList,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProjectList {
    #[serde(rename = "project", default)]
    pub(crate) items: Vec<ProjectItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectResponse {
    pub(crate) project: ProjectItem,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectItem {
    #[serde(rename = "@id")]
    pub(crate) id: String,
    #[serde(rename = "@name")]
    pub(crate) name: String,
    #[serde(rename = "@description", default)]
    pub(crate) description: Option<String>,
    #[serde(rename = "@contentPermissions", default)]
    pub(crate) content_permissions: Option<String>,
    #[serde(rename = "@parentProjectId", default)]
    pub(crate) parent_project_id: Option<String>,
    #[serde(default)]
    pub(crate) owner: Option<NamedRef>,
}

impl ProjectItem {
    pub(crate) fn into_model(self) -> Project {
        Project {
            id: self.id,
            name: self.name,
            description: self.description.filter(|value| !value.is_empty()),
            content_permissions: self
                .content_permissions
                .as_deref()
                .and_then(ContentPermissions::from_wire),
            parent_id: self.parent_project_id.filter(|value| !value.is_empty()),
            owner_id: self.owner.map(|owner| owner.id),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ProjectRequest {
    pub(crate) project: ProjectRequestItem,
}

#[derive(Debug, Default, Serialize)]
pub(crate) struct ProjectRequestItem {
    #[serde(rename = "@name", skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
    #[serde(rename = "@description", skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    #[serde(rename = "@contentPermissions", skip_serializing_if = "Option::is_none")]
    pub(crate) content_permissions: Option<String>,
    #[serde(rename = "@parentProjectId", skip_serializing_if = "Option::is_none")]
    pub(crate) parent_project_id: Option<String>,
}

impl From<&Project> for ProjectRequestItem {
    fn from(project: &Project) -> Self {
        Self {
            name: Some(project.name.clone()),
            description: project.description.clone(),
            content_permissions: project
                .content_permissions
                .map(|value| value.as_wire().to_string()),
            parent_project_id: project.parent_id.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkbooksResponse {
    #[serde(default)]
    pub(crate) pagination: Option<PaginationItem>,
    #[serde(default)]
    pub(crate) workbooks: WorkbookList,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WorkbookList {
    #[serde(rename = "workbook", default)]
    pub(crate) items: Vec<WorkbookItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkbookResponse {
    pub(crate) workbook: WorkbookItem,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkbookItem {
    #[serde(rename = "@id")]
    pub(crate) id: String,
    #[serde(rename = "@name")]
    pub(crate) name: String,
    #[serde(rename = "@contentUrl", default)]
    pub(crate) content_url: Option<String>,
    #[serde(rename = "@webpageUrl", default)]
    pub(crate) webpage_url: Option<String>,
    #[serde(rename = "@showTabs", default)]
    pub(crate) show_tabs: Option<bool>,
    #[serde(rename = "@size", default)]
    pub(crate) size: Option<u64>,
    #[serde(rename = "@createdAt", default)]
    pub(crate) created_at: Option<String>,
    #[serde(rename = "@updatedAt", default)]
    pub(crate) updated_at: Option<String>,
    #[serde(default)]
    pub(crate) project: Option<NamedRef>,
    #[serde(default)]
    pub(crate) owner: Option<NamedRef>,
    #[serde(default)]
    pub(crate) tags: TagList,
}

impl WorkbookItem {
    pub(crate) fn into_model(self) -> Workbook {
        Workbook {
            id: self.id,
            name: self.name,
            content_url: self.content_url,
            webpage_url: self.webpage_url,
            show_tabs: self.show_tabs.unwrap_or(false),
            size_mb: self.size,
            created_at: parse_timestamp(self.created_at.as_deref()),
            updated_at: parse_timestamp(self.updated_at.as_deref()),
            project: self.project.map(ContentRef::from),
            owner_id: self.owner.map(|owner| owner.id),
            tags: self.tags.labels(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct WorkbookRequest {
    pub(crate) workbook: WorkbookRequestItem,
}

#[derive(Debug, Default, Serialize)]
pub(crate) struct WorkbookRequestItem {
    #[serde(rename = "@name", skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
    #[serde(rename = "@showTabs", skip_serializing_if = "Option::is_none")]
    pub(crate) show_tabs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) project: Option<IdRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) owner: Option<IdRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ViewsResponse {
    #[serde(default)]
    pub(crate) pagination: Option<PaginationItem>,
    #[serde(default)]
    pub(crate) views: ViewList,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ViewList {
    #[serde(rename = "view", default)]
    pub(crate) items: Vec<ViewItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ViewItem {
    #[serde(rename = "@id")]
    pub(crate) id: String,
    #[serde(rename = "@name")]
    pub(crate) name: String,
    #[serde(rename = "@contentUrl", default)]
    pub(crate) content_url: Option<String>,
    #[serde(default)]
    pub(crate) workbook: Option<NamedRef>,
    #[serde(default)]
    pub(crate) owner: Option<NamedRef>,
}

impl ViewItem {
    /// Views listed under a workbook omit the workbook element.
    pub(crate) fn into_model(self, workbook_id: Option<&str>) -> View {
        View {
            id: self.id,
            name: self.name,
            content_url: self.content_url,
            workbook_id: self
                .workbook
                .map(|workbook| workbook.id)
                .or_else(|| workbook_id.map(ToString::to_string)),
            owner_id: self.owner.map(|owner| owner.id),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DatasourcesResponse {
    #[serde(default)]
    pub(crate) pagination: Option<PaginationItem>,
    #[serde(default)]
    pub(crate) datasources: DatasourceList,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DatasourceList {
    #[serde(rename = "datasource", default)]
    pub(crate) items: Vec<DatasourceItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DatasourceResponse {
    pub(crate) datasource: DatasourceItem,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DatasourceItem {
    #[serde(rename = "@id")]
    pub(crate) id: String,
    #[serde(rename = "@name")]
    pub(crate) name: String,
    #[serde(rename = "@contentUrl", default)]
    pub(crate) content_url: Option<String>,
    #[serde(rename = "@type", default)]
    pub(crate) datasource_type: Option<String>,
    #[serde(rename = "@isCertified", default)]
    pub(crate) is_certified: Option<bool>,
    #[serde(rename = "@hasExtracts", default)]
    pub(crate) has_extracts: Option<bool>,
    #[serde(rename = "@createdAt", default)]
    pub(crate) created_at: Option<String>,
    #[serde(rename = "@updatedAt", default)]
    pub(crate) updated_at: Option<String>,
    #[serde(default)]
    pub(crate) project: Option<NamedRef>,
    #[serde(default)]
    pub(crate) owner: Option<NamedRef>,
    #[serde(default)]
    pub(crate) tags: TagList,
}

impl DatasourceItem {
    pub(crate) fn into_model(self) -> Datasource {
        Datasource {
            id: self.id,
            name: self.name,
            content_url: self.content_url,
            datasource_type: self.datasource_type,
            certified: self.is_certified.unwrap_or(false),
            has_extracts: self.has_extracts.unwrap_or(false),
            created_at: parse_timestamp(self.created_at.as_deref()),
            updated_at: parse_timestamp(self.updated_at.as_deref()),
            project: self.project.map(ContentRef::from),
            owner_id: self.owner.map(|owner| owner.id),
            tags: self.tags.labels(),
        }
    }
}
