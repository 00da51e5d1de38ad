use anyhow::Context;
use reqwest::Method;
use tracing::info;
use vizserver_core::model::{Group, Pagination, User};
use vizserver_core::request_options::RequestOptions;

use crate::content_models::IdRef;
use crate::paging::{PagedEndpoint, Pager};
use crate::server::Server;
use crate::session_models::pagination_or_single;
use crate::user_models::{
    GroupItem, GroupRequest, GroupRequestItem, GroupResponse, GroupsResponse, UserIdRequest,
    UserItem, UserResponse, UsersResponse,
};
use crate::xml::build_request;

pub struct Groups<'a> {
    server: &'a Server,
}

impl<'a> Groups<'a> {
    pub(crate) fn new(server: &'a Server) -> Self {
        Self { server }
    }

    pub fn list(&self, options: &RequestOptions) -> anyhow::Result<(Vec<Group>, Pagination)> {
        let url = self.server.site_url(&["groups"], Some(options))?;
        info!(page = options.page_number, "listing groups");
        let payload: GroupsResponse = self.server.get_xml(url).context("list groups")?;
        let items: Vec<Group> = payload
            .groups
            .items
            .into_iter()
            .map(GroupItem::into_model)
            .collect();
        let pagination = pagination_or_single(payload.pagination, options, items.len());
        Ok((items, pagination))
    }

    pub fn all(&self) -> anyhow::Result<Vec<Group>> {
        Pager::new(self, self.server.default_options()).collect_all()
    }

    /// Creates a local group.
    pub fn create(&self, name: &str) -> anyhow::Result<Group> {
        let url = self.server.site_url(&["groups"], None)?;
        let body = build_request(&GroupRequest {
            group: GroupRequestItem {
                name: name.to_string(),
            },
        })?;
        let payload: GroupResponse = self
            .server
            .send_xml(Method::POST, url, body)
            .with_context(|| format!("create group {name}"))?;
        let group = payload.group.into_model();
        info!(id = group.id.as_str(), name, "created group");
        Ok(group)
    }

    pub fn delete(&self, group_id: &str) -> anyhow::Result<()> {
        let url = self.server.site_url(&["groups", group_id], None)?;
        self.server
            .send_empty(Method::DELETE, url, None)
            .with_context(|| format!("delete group {group_id}"))?;
        info!(id = group_id, "deleted group");
        Ok(())
    }

    pub fn members(&self, group_id: &str) -> anyhow::Result<Vec<User>> {
        let endpoint = GroupMembers {
            server: self.server,
            group_id,
        };
        Pager::new(&endpoint, self.server.default_options()).collect_all()
    }

    pub fn add_user(&self, group_id: &str, user_id: &str) -> anyhow::Result<User> {
        let url = self.server.site_url(&["groups", group_id, "users"], None)?;
        let body = build_request(&UserIdRequest {
            user: IdRef::new(user_id),
        })?;
        let payload: UserResponse = self
            .server
            .send_xml(Method::POST, url, body)
            .with_context(|| format!("add user {user_id} to group {group_id}"))?;
        info!(group = group_id, user = user_id, "added user to group");
        Ok(payload.user.into_model())
    }

    pub fn remove_user(&self, group_id: &str, user_id: &str) -> anyhow::Result<()> {
        let url = self
            .server
            .site_url(&["groups", group_id, "users", user_id], None)?;
        self.server
            .send_empty(Method::DELETE, url, None)
            .with_context(|| format!("remove user {user_id} from group {group_id}"))?;
        info!(group = group_id, user = user_id, "removed user from group");
        Ok(())
    }
}

impl PagedEndpoint for Groups<'_> {
    type Item = Group;

    fn page(&self, options: &RequestOptions) -> anyhow::Result<(Vec<Group>, Pagination)> {
        self.list(options)
    }
}

struct GroupMembers<'a> {
    server: &'a Server,
    group_id: &'a str,
}

impl PagedEndpoint for GroupMembers<'_> {
    type Item = User;

    fn page(&self, options: &RequestOptions) -> anyhow::Result<(Vec<User>, Pagination)> {
        let url = self
            .server
            .site_url(&["groups", self.group_id, "users"], Some(options))?;
        let payload: UsersResponse = self
            .server
            .get_xml(url)
            .with_context(|| format!("list members of group {}", self.group_id))?;
        let items: Vec<User> = payload
            .users
            .items
            .into_iter()
            .map(UserItem::into_model)
            .collect();
        let pagination = pagination_or_single(payload.pagination, options, items.len());
        Ok((items, pagination))
    }
}
