use anyhow::Context;
use reqwest::Method;
use tracing::info;
use vizserver_core::model::{Favorite, FavoriteTarget};

use crate::server::Server;
use crate::user_models::{FavoriteItem, FavoriteRequest, FavoritesResponse};
use crate::xml::build_request;

pub struct Favorites<'a> {
    server: &'a Server,
}

impl<'a> Favorites<'a> {
    pub(crate) fn new(server: &'a Server) -> Self {
        Self { server }
    }

    pub fn list_for_user(&self, user_id: &str) -> anyhow::Result<Vec<Favorite>> {
        let url = self.server.site_url(&["favorites", user_id], None)?;
        let payload: FavoritesResponse = self
            .server
            .get_xml(url)
            .with_context(|| format!("list favorites of user {user_id}"))?;
        Ok(payload
            .favorites
            .items
            .into_iter()
            .filter_map(FavoriteItem::into_model)
            .collect())
    }

    /// Adds a favorite and returns the user's full favorites list.
    pub fn add(
        &self,
        user_id: &str,
        label: &str,
        target: &FavoriteTarget,
    ) -> anyhow::Result<Vec<Favorite>> {
        let url = self.server.site_url(&["favorites", user_id], None)?;
        let body = build_request(&FavoriteRequest {
            favorite: FavoriteItem::new(label, target),
        })?;
        let payload: FavoritesResponse = self
            .server
            .send_xml(Method::PUT, url, body)
            .with_context(|| format!("add favorite {label} for user {user_id}"))?;
        info!(user = user_id, kind = target.element(), id = target.id(), "added favorite");
        Ok(payload
            .favorites
            .items
            .into_iter()
            .filter_map(FavoriteItem::into_model)
            .collect())
    }

    pub fn delete(&self, user_id: &str, target: &FavoriteTarget) -> anyhow::Result<()> {
        let collection = format!("{}s", target.element());
        let url = self
            .server
            .site_url(&["favorites", user_id, &collection, target.id()], None)?;
        self.server
            .send_empty(Method::DELETE, url, None)
            .with_context(|| format!("delete favorite {} for user {user_id}", target.id()))?;
        info!(user = user_id, kind = target.element(), id = target.id(), "deleted favorite");
        Ok(())
    }
}
