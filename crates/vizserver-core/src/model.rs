use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: Option<String>,
    pub content_url: String,
}

#[derive(Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub token: String,
    pub site_id: String,
    pub site_content_url: String,
    pub user_id: String,
}

impl fmt::Debug for SessionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionInfo")
            .field("token", &"<redacted>")
            .field("site_id", &self.site_id)
            .field("site_content_url", &self.site_content_url)
            .field("user_id", &self.user_id)
            .finish()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub product_version: Option<String>,
    pub build: Option<String>,
    pub rest_api_version: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub page_number: u32,
    pub page_size: u32,
    pub total_available: u64,
}

impl Pagination {
    pub fn has_more(&self) -> bool {
        u64::from(self.page_number) * u64::from(self.page_size) < self.total_available
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ContentRef {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ContentPermissions {
    LockedToProject,
    ManagedByOwner,
    LockedToProjectWithoutNested,
}

impl ContentPermissions {
    pub fn as_wire(&self) -> &'static str {
        match self {
            ContentPermissions::LockedToProject => "LockedToProject",
            ContentPermissions::ManagedByOwner => "ManagedByOwner",
            ContentPermissions::LockedToProjectWithoutNested => "LockedToProjectWithoutNested",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "LockedToProject" => Some(ContentPermissions::LockedToProject),
            "ManagedByOwner" => Some(ContentPermissions::ManagedByOwner),
            "LockedToProjectWithoutNested" => {
                Some(ContentPermissions::LockedToProjectWithoutNested)
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub content_permissions: Option<ContentPermissions>,
    pub parent_id: Option<String>,
    pub owner_id: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub id: String,
    pub name: String,
    pub content_url: Option<String>,
    pub webpage_url: Option<String>,
    pub show_tabs: bool,
    pub size_mb: Option<u64>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    pub project: Option<ContentRef>,
    pub owner_id: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub id: String,
    pub name: String,
    pub content_url: Option<String>,
    pub workbook_id: Option<String>,
    pub owner_id: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Datasource {
    pub id: String,
    pub name: String,
    pub content_url: Option<String>,
    pub datasource_type: Option<String>,
    pub certified: bool,
    pub has_extracts: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    pub project: Option<ContentRef>,
    pub owner_id: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SiteRole {
    Creator,
    Explorer,
    ExplorerCanPublish,
    SiteAdministrator,
    SiteAdministratorCreator,
    SiteAdministratorExplorer,
    ServerAdministrator,
    Viewer,
    Unlicensed,
    Other(String),
}

impl SiteRole {
    pub fn as_wire(&self) -> &str {
        match self {
            SiteRole::Creator => "Creator",
            SiteRole::Explorer => "Explorer",
            SiteRole::ExplorerCanPublish => "ExplorerCanPublish",
            SiteRole::SiteAdministrator => "SiteAdministrator",
            SiteRole::SiteAdministratorCreator => "SiteAdministratorCreator",
            SiteRole::SiteAdministratorExplorer => "SiteAdministratorExplorer",
            SiteRole::ServerAdministrator => "ServerAdministrator",
            SiteRole::Viewer => "Viewer",
            SiteRole::Unlicensed => "Unlicensed",
            SiteRole::Other(value) => value.as_str(),
        }
    }

    pub fn from_wire(value: &str) -> Self {
        match value {
            "Creator" => SiteRole::Creator,
            "Explorer" => SiteRole::Explorer,
            "ExplorerCanPublish" => SiteRole::ExplorerCanPublish,
            "SiteAdministrator" => SiteRole::SiteAdministrator,
            "SiteAdministratorCreator" => SiteRole::SiteAdministratorCreator,
            "SiteAdministratorExplorer" => SiteRole::SiteAdministratorExplorer,
            "ServerAdministrator" => SiteRole::ServerAdministrator,
            "Viewer" => SiteRole::Viewer,
            "Unlicensed" => SiteRole::Unlicensed,
            other => SiteRole::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SiteRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub site_role: SiteRole,
    pub auth_setting: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login: Option<OffsetDateTime>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub domain_name: Option<String>,
    pub minimum_site_role: Option<SiteRole>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum FinishCode {
    Success,
    Failed,
    Cancelled,
    Unknown(i32),
}

impl FinishCode {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => FinishCode::Success,
            1 => FinishCode::Failed,
            2 => FinishCode::Cancelled,
            other => FinishCode::Unknown(other),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub job_type: Option<String>,
    pub mode: Option<String>,
    pub progress: Option<u32>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    pub finish_code: Option<FinishCode>,
    pub notes: Vec<String>,
}

impl Job {
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BackgroundJob {
    pub id: String,
    pub status: Option<String>,
    pub job_type: Option<String>,
    pub priority: Option<u32>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub ended_at: Option<OffsetDateTime>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub name: String,
    pub state: Option<String>,
    pub priority: Option<u32>,
    pub schedule_type: Option<String>,
    pub frequency: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub next_run_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum FavoriteTarget {
    Workbook(String),
    View(String),
    Datasource(String),
    Project(String),
}

impl FavoriteTarget {
    pub fn id(&self) -> &str {
        match self {
            FavoriteTarget::Workbook(id)
            | FavoriteTarget::View(id)
            | FavoriteTarget::Datasource(id)
            | FavoriteTarget::Project(id) => id,
        }
    }

    /// Element name of the target on the wire; the plural forms the URL
    /// segment used when deleting a favorite.
    pub fn element(&self) -> &'static str {
        match self {
            FavoriteTarget::Workbook(_) => "workbook",
            FavoriteTarget::View(_) => "view",
            FavoriteTarget::Datasource(_) => "datasource",
            FavoriteTarget::Project(_) => "project",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub label: String,
    pub target: FavoriteTarget,
}

/// Parses a server timestamp; values that are not RFC 3339 are dropped.
pub fn parse_timestamp(value: Option<&str>) -> Option<OffsetDateTime> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    OffsetDateTime::parse(value, &Rfc3339).ok()
}
