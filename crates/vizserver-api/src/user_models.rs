use serde::{Deserialize, Serialize};
use vizserver_core::model::{Favorite, FavoriteTarget, Group, SiteRole, User, parse_timestamp};

use crate::content_models::IdRef;
use crate::session_models::PaginationItem;

#[derive(Debug, Deserialize)]
pub(crate) struct UsersResponse {
    #[serde(default)]
    pub(crate) pagination: Option<PaginationItem>,
    #[serde(default)]
    pub(crate) users: UserList,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UserList {
    #[serde(rename = "user", default)]
    pub(crate) items: Vec<UserItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserResponse {
    pub(crate) user: UserItem,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserItem {
    #[serde(rename = "@id", default)]
    pub(crate) id: String,
    #[serde(rename = "@name")]
    pub(crate) name: String,
    #[serde(rename = "@fullName", default)]
    pub(crate) full_name: Option<String>,
    #[serde(rename = "@email", default)]
    pub(crate) email: Option<String>,
    #[serde(rename = "@siteRole", default)]
    pub(crate) site_role: Option<String>,
    #[serde(rename = "@authSetting", default)]
    pub(crate) auth_setting: Option<String>,
    #[serde(rename = "@lastLogin", default)]
    pub(crate) last_login: Option<String>,
}

impl UserItem {
    pub(crate) fn into_model(self) -> User {
        User {
            id: self.id,
            name: self.name,
            full_name: self.full_name,
            email: self.email,
            site_role: self
                .site_role
                .as_deref()
                .map(SiteRole::from_wire)
                .unwrap_or(SiteRole::Unlicensed),
            auth_setting: self.auth_setting,
            last_login: parse_timestamp(self.last_login.as_deref()),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UserRequest {
    pub(crate) user: UserRequestItem,
}

#[derive(Debug, Default, Serialize)]
pub(crate) struct UserRequestItem {
    #[serde(rename = "@name", skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
    #[serde(rename = "@siteRole", skip_serializing_if = "Option::is_none")]
    pub(crate) site_role: Option<String>,
    #[serde(rename = "@authSetting", skip_serializing_if = "Option::is_none")]
    pub(crate) auth_setting: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserIdRequest {
    pub(crate) user: IdRef,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroupsResponse {
    #[serde(default)]
    pub(crate) pagination: Option<PaginationItem>,
    #[serde(default)]
    pub(crate) groups: GroupList,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GroupList {
    #[serde(rename = "group", default)]
    pub(crate) items: Vec<GroupItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroupResponse {
    pub(crate) group: GroupItem,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroupItem {
    #[serde(rename = "@id")]
    pub(crate) id: String,
    #[serde(rename = "@name")]
    pub(crate) name: String,
    #[serde(rename = "@minimumSiteRole", default)]
    pub(crate) minimum_site_role: Option<String>,
    #[serde(default)]
    pub(crate) domain: Option<DomainItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DomainItem {
    #[serde(rename = "@name")]
    pub(crate) name: String,
}

impl GroupItem {
    pub(crate) fn into_model(self) -> Group {
        Group {
            id: self.id,
            name: self.name,
            domain_name: self.domain.map(|domain| domain.name),
            minimum_site_role: self.minimum_site_role.as_deref().map(SiteRole::from_wire),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GroupRequest {
    pub(crate) group: GroupRequestItem,
}

#[derive(Debug, Serialize)]
pub(crate) struct GroupRequestItem {
    #[serde(rename = "@name")]
    pub(crate) name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FavoritesResponse {
    #[serde(default)]
    pub(crate) favorites: FavoriteList,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FavoriteList {
    #[serde(rename = "favorite", default)]
    pub(crate) items: Vec<FavoriteItem>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct FavoriteItem {
    #[serde(rename = "@label")]
    pub(crate) label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) workbook: Option<IdRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) view: Option<IdRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) datasource: Option<IdRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) project: Option<IdRef>,
}

impl FavoriteItem {
    pub(crate) fn new(label: &str, target: &FavoriteTarget) -> Self {
        let id = Some(IdRef::new(target.id()));
        let mut item = FavoriteItem {
            label: label.to_string(),
            ..FavoriteItem::default()
        };
        match target {
            FavoriteTarget::Workbook(_) => item.workbook = id,
            FavoriteTarget::View(_) => item.view = id,
            FavoriteTarget::Datasource(_) => item.datasource = id,
            FavoriteTarget::Project(_) => item.project = id,
        }
        item
    }

    /// Favorites whose target kind this client does not model are skipped.
    pub(crate) fn into_model(self) -> Option<Favorite> {
        let target = if let Some(workbook) = self.workbook {
            FavoriteTarget::Workbook(workbook.id)
        } else if let Some(view) = self.view {
            FavoriteTarget::View(view.id)
        } else if let Some(datasource) = self.datasource {
            FavoriteTarget::Datasource(datasource.id)
        } else if let Some(project) = self.project {
            FavoriteTarget::Project(project.id)
        } else {
            return None;
        };
        Some(Favorite {
            label: self.label,
            target,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct FavoriteRequest {
    pub(crate) favorite: FavoriteItem,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::{build_request, parse_response};

    #[test]
    fn users_response_decodes_roles() {
        let body = r#"<tsResponse>
            <pagination pageNumber="1" pageSize="100" totalAvailable="2"/>
            <users>
                <user id="u1" name="ana" fullName="Ana Lima" email="ana@example.com" siteRole="SiteAdministratorCreator" lastLogin="2024-01-02T03:04:05Z" authSetting="ServerDefault"/>
                <user id="u2" name="bot" siteRole="SupportUser"/>
            </users>
        </tsResponse>"#;
        let parsed: UsersResponse = parse_response(body).unwrap();
        let users: Vec<User> = parsed
            .users
            .items
            .into_iter()
            .map(UserItem::into_model)
            .collect();
        assert_eq!(users[0].site_role, SiteRole::SiteAdministratorCreator);
        assert_eq!(users[0].full_name.as_deref(), Some("Ana Lima"));
        assert!(users[0].last_login.is_some());
        assert_eq!(users[1].site_role, SiteRole::Other("SupportUser".to_string()));
        assert!(users[1].last_login.is_none());
    }

    #[test]
    fn add_user_request_carries_role() {
        let request = UserRequest {
            user: UserRequestItem {
                name: Some("new.user".to_string()),
                site_role: Some(SiteRole::Viewer.as_wire().to_string()),
                auth_setting: None,
            },
        };
        let body = build_request(&request).unwrap();
        assert!(body.contains(r#"name="new.user""#));
        assert!(body.contains(r#"siteRole="Viewer""#));
        assert!(!body.contains("authSetting"));
    }

    #[test]
    fn groups_response_reads_domain() {
        let body = r#"<tsResponse><groups><group id="g1" name="All Users"><domain name="local"/></group><group id="g2" name="Analysts" minimumSiteRole="Explorer"/></groups></tsResponse>"#;
        let parsed: GroupsResponse = parse_response(body).unwrap();
        let groups: Vec<Group> = parsed
            .groups
            .items
            .into_iter()
            .map(GroupItem::into_model)
            .collect();
        assert_eq!(groups[0].domain_name.as_deref(), Some("local"));
        assert_eq!(groups[1].minimum_site_role, Some(SiteRole::Explorer));
    }

    #[test]
    fn favorites_map_to_targets() {
        let body = r#"<tsResponse><favorites>
            <favorite label="Sales overview"><view id="v1" name="Overview"/></favorite>
            <favorite label="Orders"><datasource id="d1"/></favorite>
            <favorite label="Metric"><metric id="m1"/></favorite>
        </favorites></tsResponse>"#;
        let parsed: FavoritesResponse = parse_response(body).unwrap();
        let favorites: Vec<Favorite> = parsed
            .favorites
            .items
            .into_iter()
            .filter_map(FavoriteItem::into_model)
            .collect();
        assert_eq!(favorites.len(), 2);
        assert_eq!(favorites[0].target, FavoriteTarget::View("v1".to_string()));
        assert_eq!(favorites[1].label, "Orders");
    }

    #[test]
    fn favorite_request_nests_target() {
        let request = FavoriteRequest {
            favorite: FavoriteItem::new("Mine", &FavoriteTarget::Workbook("w1".to_string())),
        };
        let body = build_request(&request).unwrap();
        assert!(body.contains(r#"<favorite label="Mine">"#));
        assert!(body.contains(r#"<workbook id="w1""#));
        assert!(!body.contains("<view"));
    }
}
