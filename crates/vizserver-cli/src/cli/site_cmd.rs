use super::*;
pub(super) fn handle_info(path: &Path) -> anyhow::Result<()> {
    let config = load_config(path)?;
    let server = Server::from_config(&config)?;
    let info = server.server_info()?;
    println!("Server:   {}", server.base_url());
    println!(
        "Product:  {} (build {})",
        info.product_version.as_deref().unwrap_or("unknown"),
        info.build.as_deref().unwrap_or("unknown")
    );
    println!("REST API: {}", info.rest_api_version);
    println!("Client:   {}", server.version());
    Ok(())
}

pub(super) fn handle_users(args: UsersArgs, path: &Path) -> anyhow::Result<()> {
    match args.command {
        UsersCommands::List(list) => with_session(path, |server| {
            let users = server.users().all()?;
            print_rows(&users, list, |user| {
                format!(
                    "{}  {}  {}  last_login={}",
                    user.id,
                    user.name,
                    user.site_role,
                    format_time(user.last_login)
                )
            })
        }),
    }
}

pub(super) fn handle_groups(args: GroupsArgs, path: &Path) -> anyhow::Result<()> {
    match args.command {
        GroupsCommands::List(list) => with_session(path, |server| {
            let groups = server.groups().all()?;
            print_rows(&groups, list, |group| {
                format!(
                    "{}  {}  domain={}",
                    group.id,
                    group.name,
                    group.domain_name.as_deref().unwrap_or("local")
                )
            })
        }),
    }
}

pub(super) fn handle_schedules(args: SchedulesArgs, path: &Path) -> anyhow::Result<()> {
    match args.command {
        SchedulesCommands::List(list) => with_session(path, |server| {
            let schedules = server.schedules().all()?;
            print_rows(&schedules, list, |schedule| {
                format!(
                    "{}  {}  {}  next={}",
                    schedule.id,
                    schedule.name,
                    schedule.frequency.as_deref().unwrap_or("-"),
                    format_time(schedule.next_run_at)
                )
            })
        }),
    }
}
