use anyhow::Context;
use reqwest::Method;
use std::fmt;
use tracing::{info, warn};
use vizserver_core::config::{AuthConfig, ClientConfig};
use vizserver_core::model::SessionInfo;

use crate::server::Server;
use crate::session_models::{CredentialsRequest, SignInRequest, SignInResponse, SiteRequest};
use crate::xml::{build_request, parse_response};

/// Sign-in credentials. `site` is the site content URL; empty selects the
/// default site.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    PersonalAccessToken {
        name: String,
        secret: String,
        site: String,
    },
    Password {
        username: String,
        password: String,
        site: String,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::PersonalAccessToken { name, site, .. } => f
                .debug_struct("PersonalAccessToken")
                .field("name", name)
                .field("secret", &"<redacted>")
                .field("site", site)
                .finish(),
            Credentials::Password { username, site, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"<redacted>")
                .field("site", site)
                .finish(),
        }
    }
}

impl Credentials {
    pub fn personal_access_token(
        name: impl Into<String>,
        secret: impl Into<String>,
        site: impl Into<String>,
    ) -> Self {
        Credentials::PersonalAccessToken {
            name: name.into(),
            secret: secret.into(),
            site: site.into(),
        }
    }

    pub fn password(
        username: impl Into<String>,
        password: impl Into<String>,
        site: impl Into<String>,
    ) -> Self {
        Credentials::Password {
            username: username.into(),
            password: password.into(),
            site: site.into(),
        }
    }

    /// Builds credentials for the identity in `config` using `secret`.
    pub fn from_config(config: &ClientConfig, secret: String) -> anyhow::Result<Self> {
        let auth = config
            .auth
            .as_ref()
            .context("config has no auth identity")?;
        Ok(match auth {
            AuthConfig::PersonalAccessToken { name } => {
                Credentials::personal_access_token(name.clone(), secret, config.site.clone())
            }
            AuthConfig::Password { username } => {
                Credentials::password(username.clone(), secret, config.site.clone())
            }
        })
    }

    pub fn site(&self) -> &str {
        match self {
            Credentials::PersonalAccessToken { site, .. } | Credentials::Password { site, .. } => {
                site
            }
        }
    }

    pub fn identity(&self) -> &str {
        match self {
            Credentials::PersonalAccessToken { name, .. } => name,
            Credentials::Password { username, .. } => username,
        }
    }

    pub(crate) fn to_request(&self) -> SignInRequest {
        let site = SiteRequest {
            content_url: self.site().to_string(),
        };
        let credentials = match self {
            Credentials::PersonalAccessToken { name, secret, .. } => CredentialsRequest {
                token_name: Some(name.clone()),
                token_secret: Some(secret.clone()),
                site,
                ..CredentialsRequest::default()
            },
            Credentials::Password {
                username, password, ..
            } => CredentialsRequest {
                name: Some(username.clone()),
                password: Some(password.clone()),
                site,
                ..CredentialsRequest::default()
            },
        };
        SignInRequest { credentials }
    }
}

impl Server {
    pub fn sign_in(&mut self, credentials: &Credentials) -> anyhow::Result<&SessionInfo> {
        let url = self.server_url(&["auth", "signin"], None)?;
        let body = build_request(&credentials.to_request())?;
        let response = self
            .execute(Method::POST, url, Some(body), None)
            .with_context(|| format!("sign in as {}", credentials.identity()))?;
        let session = parse_response::<SignInResponse>(&response)?.into_session();
        info!(
            site = session.site_content_url.as_str(),
            user_id = session.user_id.as_str(),
            "signed in"
        );
        self.set_session(session);
        self.require_session()
    }

    /// Ends the session. The local session is dropped even when the server
    /// call fails.
    pub fn sign_out(&mut self) -> anyhow::Result<()> {
        let Some(session) = self.session().cloned() else {
            return Ok(());
        };
        let url = self.server_url(&["auth", "signout"], None)?;
        self.clear_session();
        let result = self
            .execute(Method::POST, url, None, Some(&session.token))
            .map(|_| ())
            .context("sign out");
        match &result {
            Ok(()) => info!(user_id = session.user_id.as_str(), "signed out"),
            Err(err) => warn!(error = %err, "sign out failed; session discarded"),
        }
        result
    }
}
