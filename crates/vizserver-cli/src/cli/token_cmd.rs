use super::*;
pub(super) fn handle_token(args: TokenArgs, path: &Path) -> anyhow::Result<()> {
    let config = load_config(path)?;
    let identity = config
        .auth
        .as_ref()
        .context("config has no sign-in identity; run `vizserver config init` first")?;
    let account = config.secret_account()?;
    match args.command {
        TokenCommands::Set(args) => {
            if args.secret.trim().is_empty() {
                anyhow::bail!("secret must not be empty");
            }
            auth::set_secret(&account, auth::SecretKind::for_auth(identity), &args.secret)?;
            auth::get_secret(&account, auth::SecretKind::for_auth(identity))
                .context("read secret from keyring after write")?;
            info!(account = account.as_str(), "stored secret");
            println!("Secret stored for {account}");
        }
        TokenCommands::Delete => {
            auth::delete_secret(&account)?;
            info!(account = account.as_str(), "deleted secret");
            println!("Secret deleted for {account}");
        }
    }
    Ok(())
}
