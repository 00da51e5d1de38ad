use super::*;
pub(super) fn handle_config(args: ConfigArgs, path: &Path) -> anyhow::Result<()> {
    match args.command {
        ConfigCommands::Init(args) => handle_init(args, path),
    }
}

pub(super) fn handle_init(args: InitArgs, path: &Path) -> anyhow::Result<()> {
    let config = config_from_init(args, ClientConfig::load(path)?);
    config.validate().context("invalid config values")?;
    config.save(path)?;
    info!(path = %path.display(), "saved config");
    println!("Config saved to {}", path.display());
    if let Some(auth) = &config.auth {
        println!(
            "Store the secret for {} with `vizserver token set --secret ...` or set {}",
            auth.identity(),
            vizserver_core::config::SECRET_ENV
        );
    }
    Ok(())
}

/// Applies init arguments over an existing config, keeping tuning values
/// such as page size and HTTP settings.
pub(super) fn config_from_init(args: InitArgs, existing: ClientConfig) -> ClientConfig {
    let auth = match (args.token_name, args.username) {
        (Some(name), _) => Some(AuthConfig::PersonalAccessToken { name }),
        (None, Some(username)) => Some(AuthConfig::Password { username }),
        (None, None) => existing.auth,
    };
    ClientConfig {
        server_url: args.server_url,
        site: args.site,
        api_version: args.api_version,
        auth,
        ..existing
    }
}
