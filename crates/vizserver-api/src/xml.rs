use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const NAMESPACE: &str = "http://tableau.com/api";

/// Body for POST calls that take no parameters.
pub(crate) const EMPTY_REQUEST: &str = "<tsRequest/>";

/// Decodes a `<tsResponse>` document. The root element name and namespace
/// declarations are not checked; unknown elements and attributes are skipped.
pub(crate) fn parse_response<T: DeserializeOwned>(body: &str) -> anyhow::Result<T> {
    quick_xml::de::from_str(body).context("decode server response")
}

pub(crate) fn build_request<T: Serialize>(body: &T) -> anyhow::Result<String> {
    quick_xml::se::to_string_with_root("tsRequest", body).context("encode request body")
}
