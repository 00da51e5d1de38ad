use anyhow::Context;
use tracing::info;
use vizserver_core::model::{Pagination, View};
use vizserver_core::request_options::RequestOptions;

use crate::content_models::ViewsResponse;
use crate::paging::{PagedEndpoint, Pager};
use crate::server::Server;
use crate::session_models::pagination_or_single;

pub struct Views<'a> {
    server: &'a Server,
}

impl<'a> Views<'a> {
    pub(crate) fn new(server: &'a Server) -> Self {
        Self { server }
    }

    pub fn list(&self, options: &RequestOptions) -> anyhow::Result<(Vec<View>, Pagination)> {
        let url = self.server.site_url(&["views"], Some(options))?;
        info!(page = options.page_number, "listing views");
        let payload: ViewsResponse = self.server.get_xml(url).context("list views")?;
        let items: Vec<View> = payload
            .views
            .items
            .into_iter()
            .map(|view| view.into_model(None))
            .collect();
        let pagination = pagination_or_single(payload.pagination, options, items.len());
        Ok((items, pagination))
    }

    pub fn all(&self) -> anyhow::Result<Vec<View>> {
        Pager::new(self, self.server.default_options()).collect_all()
    }
}

impl PagedEndpoint for Views<'_> {
    type Item = View;

    fn page(&self, options: &RequestOptions) -> anyhow::Result<(Vec<View>, Pagination)> {
        self.list(options)
    }
}
