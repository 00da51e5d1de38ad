use anyhow::Context;
use reqwest::Method;
use tracing::info;
use vizserver_core::model::{Group, Pagination, SiteRole, User};
use vizserver_core::request_options::RequestOptions;

use crate::paging::{PagedEndpoint, Pager};
use crate::server::Server;
use crate::session_models::pagination_or_single;
use crate::user_models::{
    GroupItem, GroupsResponse, UserItem, UserRequest, UserRequestItem, UserResponse,
    UsersResponse,
};
use crate::xml::build_request;

pub struct Users<'a> {
    server: &'a Server,
}

impl<'a> Users<'a> {
    pub(crate) fn new(server: &'a Server) -> Self {
        Self { server }
    }

    pub fn list(&self, options: &RequestOptions) -> anyhow::Result<(Vec<User>, Pagination)> {
        let url = self.server.site_url(&["users"], Some(options))?;
        info!(page = options.page_number, "listing users");
        let payload: UsersResponse = self.server.get_xml(url).context("list users")?;
        let items: Vec<User> = payload
            .users
            .items
            .into_iter()
            .map(UserItem::into_model)
            .collect();
        let pagination = pagination_or_single(payload.pagination, options, items.len());
        Ok((items, pagination))
    }

    pub fn all(&self) -> anyhow::Result<Vec<User>> {
        Pager::new(self, self.server.default_options()).collect_all()
    }

    pub fn get_by_id(&self, user_id: &str) -> anyhow::Result<User> {
        let url = self.server.site_url(&["users", user_id], None)?;
        let payload: UserResponse = self
            .server
            .get_xml(url)
            .with_context(|| format!("get user {user_id}"))?;
        Ok(payload.user.into_model())
    }

    /// Adds a user to the current site. `auth_setting` is left to the site
    /// default when `None`.
    pub fn add(
        &self,
        name: &str,
        site_role: &SiteRole,
        auth_setting: Option<&str>,
    ) -> anyhow::Result<User> {
        let url = self.server.site_url(&["users"], None)?;
        let body = build_request(&UserRequest {
            user: UserRequestItem {
                name: Some(name.to_string()),
                site_role: Some(site_role.as_wire().to_string()),
                auth_setting: auth_setting.map(str::to_string),
            },
        })?;
        let payload: UserResponse = self
            .server
            .send_xml(Method::POST, url, body)
            .with_context(|| format!("add user {name}"))?;
        let user = payload.user.into_model();
        info!(id = user.id.as_str(), name, role = %site_role, "added user");
        Ok(user)
    }

    pub fn update_site_role(&self, user_id: &str, site_role: &SiteRole) -> anyhow::Result<User> {
        let url = self.server.site_url(&["users", user_id], None)?;
        let body = build_request(&UserRequest {
            user: UserRequestItem {
                site_role: Some(site_role.as_wire().to_string()),
                ..UserRequestItem::default()
            },
        })?;
        let payload: UserResponse = self
            .server
            .send_xml(Method::PUT, url, body)
            .with_context(|| format!("update site role of user {user_id}"))?;
        let mut user = payload.user.into_model();
        // The update response omits the id.
        if user.id.is_empty() {
            user.id = user_id.to_string();
        }
        Ok(user)
    }

    pub fn remove(&self, user_id: &str) -> anyhow::Result<()> {
        let url = self.server.site_url(&["users", user_id], None)?;
        self.server
            .send_empty(Method::DELETE, url, None)
            .with_context(|| format!("remove user {user_id}"))?;
        info!(id = user_id, "removed user from site");
        Ok(())
    }

    pub fn groups_for_user(&self, user_id: &str) -> anyhow::Result<Vec<Group>> {
        let endpoint = UserGroups {
            server: self.server,
            user_id,
        };
        Pager::new(&endpoint, self.server.default_options()).collect_all()
    }
}

impl PagedEndpoint for Users<'_> {
    type Item = User;

    fn page(&self, options: &RequestOptions) -> anyhow::Result<(Vec<User>, Pagination)> {
        self.list(options)
    }
}

struct UserGroups<'a> {
    server: &'a Server,
    user_id: &'a str,
}

impl PagedEndpoint for UserGroups<'_> {
    type Item = Group;

    fn page(&self, options: &RequestOptions) -> anyhow::Result<(Vec<Group>, Pagination)> {
        let url = self
            .server
            .site_url(&["users", self.user_id, "groups"], Some(options))?;
        let payload: GroupsResponse = self
            .server
            .get_xml(url)
            .with_context(|| format!("list groups of user {}", self.user_id))?;
        let items: Vec<Group> = payload
            .groups
            .items
            .into_iter()
            .map(GroupItem::into_model)
            .collect();
        let pagination = pagination_or_single(payload.pagination, options, items.len());
        Ok((items, pagination))
    }
}
