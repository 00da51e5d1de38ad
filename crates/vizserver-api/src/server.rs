use anyhow::{Context, anyhow};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::info;
use vizserver_core::config::ClientConfig;
use vizserver_core::model::{ServerInfo, SessionInfo};
use vizserver_core::request_options::RequestOptions;

use crate::datasources::Datasources;
use crate::favorites::Favorites;
use crate::groups::Groups;
use crate::http::send_with_retry;
use crate::jobs::Jobs;
use crate::projects::Projects;
use crate::schedules::Schedules;
use crate::session_models::ServerInfoResponse;
use crate::users::Users;
use crate::views::Views;
use crate::workbooks::Workbooks;
use crate::xml::parse_response;

pub const AUTH_HEADER: &str = "X-Tableau-Auth";

/// Oldest API version that serves `serverinfo`.
const SERVER_INFO_VERSION: &str = "2.4";

const USER_AGENT: &str = concat!("vizserver-client/", env!("CARGO_PKG_VERSION"));

/// Connection to one server. Holds the active session after sign-in.
pub struct Server {
    client: Client,
    base_url: String,
    version: String,
    max_attempts: u32,
    page_size: u32,
    session: Option<SessionInfo>,
}

impl Server {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let config = ClientConfig {
            server_url: base_url.to_string(),
            ..ClientConfig::default()
        };
        Self::from_config(&config)
    }

    pub fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid client config")?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            base_url: config.server_url().to_string(),
            version: config.api_version().to_string(),
            max_attempts: config.http.max_attempts,
            page_size: config.page_size,
            session: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    pub fn session(&self) -> Option<&SessionInfo> {
        self.session.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    pub(crate) fn set_session(&mut self, session: SessionInfo) {
        self.session = Some(session);
    }

    pub(crate) fn clear_session(&mut self) -> Option<SessionInfo> {
        self.session.take()
    }

    /// Options for list calls, using the configured page size.
    pub fn default_options(&self) -> RequestOptions {
        RequestOptions::new().page_size(self.page_size)
    }

    pub fn server_info(&self) -> anyhow::Result<ServerInfo> {
        let url = self.url(
            &format!("{}/api/{SERVER_INFO_VERSION}", self.base_url),
            &["serverinfo"],
            None,
        )?;
        let body = self
            .execute(Method::GET, url, None, None)
            .context("fetch server info")?;
        Ok(parse_response::<ServerInfoResponse>(&body)?.into_model())
    }

    /// Switches to the newest API version the server reports.
    pub fn use_server_version(&mut self) -> anyhow::Result<String> {
        let info = self.server_info()?;
        info!(
            version = info.rest_api_version.as_str(),
            "using server API version"
        );
        self.version = info.rest_api_version;
        Ok(self.version.clone())
    }

    pub fn use_highest_version(&mut self) -> anyhow::Result<String> {
        self.use_server_version()
    }

    pub fn projects(&self) -> Projects<'_> {
        Projects::new(self)
    }

    pub fn workbooks(&self) -> Workbooks<'_> {
        Workbooks::new(self)
    }

    pub fn views(&self) -> Views<'_> {
        Views::new(self)
    }

    pub fn datasources(&self) -> Datasources<'_> {
        Datasources::new(self)
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    pub fn groups(&self) -> Groups<'_> {
        Groups::new(self)
    }

    pub fn jobs(&self) -> Jobs<'_> {
        Jobs::new(self)
    }

    pub fn schedules(&self) -> Schedules<'_> {
        Schedules::new(self)
    }

    pub fn favorites(&self) -> Favorites<'_> {
        Favorites::new(self)
    }

    pub(crate) fn server_base(&self) -> String {
        format!("{}/api/{}", self.base_url, self.version)
    }

    pub(crate) fn site_base(&self) -> anyhow::Result<String> {
        let session = self.require_session()?;
        Ok(format!("{}/sites/{}", self.server_base(), session.site_id))
    }

    pub(crate) fn require_session(&self) -> anyhow::Result<&SessionInfo> {
        self.session
            .as_ref()
            .ok_or_else(|| anyhow!("not signed in; call sign_in first"))
    }

    pub(crate) fn site_url(
        &self,
        segments: &[&str],
        options: Option<&RequestOptions>,
    ) -> anyhow::Result<Url> {
        let base = self.site_base()?;
        self.url(&base, segments, options)
    }

    pub(crate) fn server_url(
        &self,
        segments: &[&str],
        options: Option<&RequestOptions>,
    ) -> anyhow::Result<Url> {
        self.url(&self.server_base(), segments, options)
    }

    /// Appends percent-encoded path segments and the list query to `base`.
    pub(crate) fn url(
        &self,
        base: &str,
        segments: &[&str],
        options: Option<&RequestOptions>,
    ) -> anyhow::Result<Url> {
        let mut url = Url::parse(base).with_context(|| format!("parse server url {base}"))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("server url cannot carry a path: {base}"))?
            .pop_if_empty()
            .extend(segments);
        if let Some(options) = options {
            let mut query = url.query_pairs_mut();
            for (key, value) in options.query_pairs() {
                query.append_pair(&key, &value);
            }
        }
        Ok(url)
    }

    pub(crate) fn get_xml<T: DeserializeOwned>(&self, url: Url) -> anyhow::Result<T> {
        let token = self.require_session()?.token.clone();
        let body = self.execute(Method::GET, url, None, Some(&token))?;
        parse_response(&body)
    }

    pub(crate) fn send_xml<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: String,
    ) -> anyhow::Result<T> {
        let token = self.require_session()?.token.clone();
        let body = self.execute(method, url, Some(body), Some(&token))?;
        parse_response(&body)
    }

    /// Authenticated call whose response body is not needed.
    pub(crate) fn send_empty(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
    ) -> anyhow::Result<()> {
        let token = self.require_session()?.token.clone();
        self.execute(method, url, body, Some(&token))?;
        Ok(())
    }

    pub(crate) fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
        token: Option<&str>,
    ) -> anyhow::Result<String> {
        let mut builder = self.client.request(method, url);
        if let Some(token) = token {
            builder = builder.header(AUTH_HEADER, token);
        }
        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, "text/xml").body(body);
        }
        let response = send_with_retry(self.max_attempts, || {
            builder.try_clone().context("clone request")
        })?;
        response.text().context("read response body")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vizserver_core::config::DEFAULT_API_VERSION;

    fn signed_in() -> Server {
        let mut server = Server::new("https://bi.example.com/").unwrap();
        server.set_session(SessionInfo {
            token: "token".to_string(),
            site_id: "site-1".to_string(),
            site_content_url: "marketing".to_string(),
            user_id: "user-1".to_string(),
        });
        server
    }

    #[test]
    fn new_rejects_invalid_url() {
        assert!(Server::new("bi.example.com").is_err());
        assert!(Server::new("").is_err());
    }

    #[test]
    fn site_url_requires_session() {
        let server = Server::new("https://bi.example.com").unwrap();
        let err = server.site_url(&["projects"], None).unwrap_err();
        assert!(err.to_string().contains("not signed in"));
    }

    #[test]
    fn site_url_includes_version_and_site() {
        let server = signed_in();
        let url = server.site_url(&["projects", "p1"], None).unwrap();
        assert_eq!(
            url.as_str(),
            format!("https://bi.example.com/api/{DEFAULT_API_VERSION}/sites/site-1/projects/p1")
        );
    }

    #[test]
    fn url_encodes_segments_and_query() {
        let server = signed_in();
        let options = RequestOptions::new().page_size(5).page_number(2);
        let url = server
            .site_url(&["workbooks", "w1", "tags", "needs review"], Some(&options))
            .unwrap();
        assert!(url.path().ends_with("/workbooks/w1/tags/needs%20review"));
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        assert!(pairs.contains(&("pageSize".to_string(), "5".to_string())));
        assert!(pairs.contains(&("pageNumber".to_string(), "2".to_string())));
    }

    #[test]
    fn set_version_changes_server_base() {
        let mut server = signed_in();
        server.set_version("3.22");
        let url = server.server_url(&["schedules"], None).unwrap();
        assert_eq!(url.as_str(), "https://bi.example.com/api/3.22/schedules");
    }

    #[test]
    fn default_options_use_configured_page_size() {
        let config = ClientConfig {
            server_url: "https://bi.example.com".to_string(),
            page_size: 250,
            ..ClientConfig::default()
        };
        let server = Server::from_config(&config).unwrap();
        assert_eq!(server.default_options().page_size, 250);
    }

    #[test]
    fn from_config_rejects_zero_timeout() {
        let mut config = ClientConfig {
            server_url: "https://bi.example.com".to_string(),
            ..ClientConfig::default()
        };
        config.http.timeout_secs = 0;
        let err = Server::from_config(&config).err().unwrap();
        assert!(format!("{err:#}").contains("timeout_secs"));
    }
}
