use serde::{Deserialize, Serialize};
use vizserver_core::model::{Pagination, ServerInfo, SessionInfo};
use vizserver_core::request_options::RequestOptions;

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: ErrorItem,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorItem {
    #[serde(rename = "@code", default)]
    pub(crate) code: String,
    #[serde(default)]
    pub(crate) summary: Option<String>,
    #[serde(default)]
    pub(crate) detail: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SignInRequest {
    pub(crate) credentials: CredentialsRequest,
}

#[derive(Debug, Default, Serialize)]
pub(crate) struct CredentialsRequest {
    #[serde(rename = "@name", skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
    #[serde(rename = "@password", skip_serializing_if = "Option::is_none")]
    pub(crate) password: Option<String>,
    #[serde(
        rename = "@personalAccessTokenName",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) token_name: Option<String>,
    #[serde(
        rename = "@personalAccessTokenSecret",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) token_secret: Option<String>,
    pub(crate) site: SiteRequest,
}

#[derive(Debug, Default, Serialize)]
pub(crate) struct SiteRequest {
    #[serde(rename = "@contentUrl")]
    pub(crate) content_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SignInResponse {
    pub(crate) credentials: CredentialsItem,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CredentialsItem {
    #[serde(rename = "@token")]
    pub(crate) token: String,
    pub(crate) site: SiteItem,
    pub(crate) user: UserRef,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SiteItem {
    #[serde(rename = "@id")]
    pub(crate) id: String,
    #[serde(rename = "@contentUrl", default)]
    pub(crate) content_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserRef {
    #[serde(rename = "@id")]
    pub(crate) id: String,
}

impl SignInResponse {
    pub(crate) fn into_session(self) -> SessionInfo {
        SessionInfo {
            token: self.credentials.token,
            site_id: self.credentials.site.id,
            site_content_url: self.credentials.site.content_url,
            user_id: self.credentials.user.id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServerInfoResponse {
    #[serde(rename = "serverInfo")]
    pub(crate) server_info: ServerInfoItem,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServerInfoItem {
    #[serde(rename = "productVersion", default)]
    pub(crate) product_version: Option<ProductVersion>,
    #[serde(rename = "restApiVersion")]
    pub(crate) rest_api_version: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductVersion {
    #[serde(rename = "@build", default)]
    pub(crate) build: Option<String>,
    #[serde(rename = "$text", default)]
    pub(crate) value: Option<String>,
}

impl ServerInfoResponse {
    pub(crate) fn into_model(self) -> ServerInfo {
        let (product_version, build) = match self.server_info.product_version {
            Some(version) => (version.value, version.build),
            None => (None, None),
        };
        ServerInfo {
            product_version,
            build,
            rest_api_version: self.server_info.rest_api_version.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct PaginationItem {
    #[serde(rename = "@pageNumber")]
    pub(crate) page_number: u32,
    #[serde(rename = "@pageSize")]
    pub(crate) page_size: u32,
    #[serde(rename = "@totalAvailable")]
    pub(crate) total_available: u64,
}

/// Uses the server's pagination block, or synthesizes one for endpoints that
/// return everything in a single response.
pub(crate) fn pagination_or_single(
    pagination: Option<PaginationItem>,
    options: &RequestOptions,
    count: usize,
) -> Pagination {
    match pagination {
        Some(item) => Pagination {
            page_number: item.page_number,
            page_size: item.page_size,
            total_available: item.total_available,
        },
        None => Pagination {
            page_number: options.page_number,
            page_size: options.page_size,
            total_available: u64::from(options.page_number.saturating_sub(1))
                * u64::from(options.page_size)
                + count as u64,
        },
    }
}
