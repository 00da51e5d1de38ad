use anyhow::Context;
use keyring::Entry;
use serde::{Deserialize, Serialize};
use vizserver_core::config::{AuthConfig, ClientConfig, SECRET_ENV};

use crate::session::Credentials;

const SERVICE: &str = "vizserver-client";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretKind {
    PersonalAccessToken,
    Password,
}

impl SecretKind {
    pub fn for_auth(auth: &AuthConfig) -> Self {
        match auth {
            AuthConfig::PersonalAccessToken { .. } => SecretKind::PersonalAccessToken,
            AuthConfig::Password { .. } => SecretKind::Password,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSecret {
    kind: SecretKind,
    secret: String,
}

pub fn set_secret(account: &str, kind: SecretKind, secret: &str) -> anyhow::Result<()> {
    let entry = Entry::new(SERVICE, account).context("open keyring entry")?;
    let payload = serde_json::to_string(&StoredSecret {
        kind,
        secret: secret.to_string(),
    })
    .context("serialize secret")?;
    entry.set_password(&payload).context("write secret to keyring")
}

pub fn get_secret(account: &str, kind: SecretKind) -> anyhow::Result<String> {
    let entry = Entry::new(SERVICE, account).context("open keyring entry")?;
    let value = entry.get_password().context("read secret from keyring")?;
    decode_stored(&value, kind)
}

pub fn delete_secret(account: &str) -> anyhow::Result<()> {
    let entry = Entry::new(SERVICE, account).context("open keyring entry")?;
    entry.delete_credential().context("delete secret from keyring")
}

fn decode_stored(value: &str, expected: SecretKind) -> anyhow::Result<String> {
    let stored: StoredSecret = serde_json::from_str(value).context("decode stored secret")?;
    if stored.kind != expected {
        anyhow::bail!(
            "stored secret is a {:?} but the config expects a {:?}",
            stored.kind,
            expected
        );
    }
    Ok(stored.secret)
}

/// Secret for the configured identity: `VIZSERVER_SECRET` wins over the
/// keyring.
pub fn resolve_secret(config: &ClientConfig) -> anyhow::Result<String> {
    secret_from(config, std::env::var(SECRET_ENV).ok())
}

fn secret_from(config: &ClientConfig, env_value: Option<String>) -> anyhow::Result<String> {
    if let Some(value) = env_value.filter(|value| !value.is_empty()) {
        return Ok(value);
    }
    let auth = config.auth.as_ref().context("config has no auth identity")?;
    let account = config.secret_account()?;
    get_secret(&account, SecretKind::for_auth(auth))
        .with_context(|| format!("no secret in {SECRET_ENV} or keyring for {account}"))
}

pub fn credentials_for(config: &ClientConfig) -> anyhow::Result<Credentials> {
    let secret = resolve_secret(config)?;
    Credentials::from_config(config, secret)
}
