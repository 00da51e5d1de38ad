use super::*;
use tracing::warn;

pub(super) fn config_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => default_config_path(),
    }
}

/// Loads the config and checks it is usable for talking to a server.
pub(super) fn load_config(path: &Path) -> anyhow::Result<ClientConfig> {
    let config = ClientConfig::load(path)
        .with_context(|| format!("load config {}", path.display()))?;
    if config.server_url.trim().is_empty() {
        anyhow::bail!(
            "no server configured in {}; run `vizserver config init` first",
            path.display()
        );
    }
    config.validate().context("invalid config")?;
    Ok(config)
}

/// Signs in with the configured identity, runs `action`, then signs out.
/// A failed sign-out is logged and does not mask the action's result.
pub(super) fn with_session<T>(
    path: &Path,
    action: impl FnOnce(&Server) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    let config = load_config(path)?;
    let credentials = auth::credentials_for(&config)?;
    let mut server = Server::from_config(&config)?;
    server.sign_in(&credentials)?;
    let result = action(&server);
    if let Err(err) = server.sign_out() {
        warn!(error = %err, "sign out failed");
    }
    result
}

/// Prints items as pretty JSON or as one formatted line each.
pub(super) fn print_rows<T: Serialize>(
    items: &[T],
    list: ListArgs,
    line: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if list.json {
        println!(
            "{}",
            serde_json::to_string_pretty(items).context("serialize output")?
        );
        return Ok(());
    }
    debug!(count = items.len(), "printing rows");
    for item in items {
        println!("{}", line(item));
    }
    if items.is_empty() {
        println!("(none)");
    }
    Ok(())
}

pub(super) fn format_time(value: Option<OffsetDateTime>) -> String {
    value
        .and_then(|value| value.format(&Rfc3339).ok())
        .unwrap_or_else(|| "-".to_string())
}
