use anyhow::Context;
use reqwest::Method;
use tracing::info;

use crate::content_models::{TagList, TagsRequest, TagsResponse};
use crate::server::Server;
use crate::xml::build_request;

/// Content kinds that carry tags, by their URL collection name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Taggable {
    Workbooks,
    Datasources,
}

impl Taggable {
    fn collection(self) -> &'static str {
        match self {
            Taggable::Workbooks => "workbooks",
            Taggable::Datasources => "datasources",
        }
    }
}

/// Adds `labels` and returns the full tag set the server reports back.
pub(crate) fn add_tags(
    server: &Server,
    kind: Taggable,
    id: &str,
    labels: &[String],
) -> anyhow::Result<Vec<String>> {
    if labels.is_empty() {
        return Ok(Vec::new());
    }
    let url = server.site_url(&[kind.collection(), id, "tags"], None)?;
    let body = build_request(&TagsRequest {
        tags: TagList::from_labels(labels),
    })?;
    let payload: TagsResponse = server
        .send_xml(Method::PUT, url, body)
        .with_context(|| format!("add tags to {} {id}", kind.collection()))?;
    info!(kind = kind.collection(), id, count = labels.len(), "added tags");
    Ok(payload.tags.labels())
}

pub(crate) fn delete_tag(
    server: &Server,
    kind: Taggable,
    id: &str,
    label: &str,
) -> anyhow::Result<()> {
    let url = server.site_url(&[kind.collection(), id, "tags", label], None)?;
    server
        .send_empty(Method::DELETE, url, None)
        .with_context(|| format!("delete tag {label} from {} {id}", kind.collection()))
}
