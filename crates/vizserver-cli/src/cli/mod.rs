use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use vizserver_api::{Pager, Server, auth};
use vizserver_core::config::{AuthConfig, ClientConfig, default_config_path};
use vizserver_core::model::Job;
use vizserver_core::request_options::{Filter, FilterOperator, RequestOptions};

mod args;
mod config_cmd;
mod content_cmd;
mod jobs_cmd;
mod shared;
mod site_cmd;
#[cfg(test)]
mod tests;
mod token_cmd;

use args::*;

use config_cmd::handle_config;
use content_cmd::{handle_datasources, handle_projects, handle_workbooks};
use jobs_cmd::{handle_jobs, print_job};
use shared::{config_path, format_time, load_config, print_rows, with_session};
use site_cmd::{handle_groups, handle_info, handle_schedules, handle_users};
use token_cmd::handle_token;

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    info!(command = command_label(&cli.command), "running command");

    let path = config_path(cli.config.as_deref())?;
    match cli.command {
        Commands::Config(args) => handle_config(args, &path),
        Commands::Token(args) => handle_token(args, &path),
        Commands::Info => handle_info(&path),
        Commands::Projects(args) => handle_projects(args, &path),
        Commands::Workbooks(args) => handle_workbooks(args, &path),
        Commands::Datasources(args) => handle_datasources(args, &path),
        Commands::Users(args) => handle_users(args, &path),
        Commands::Groups(args) => handle_groups(args, &path),
        Commands::Jobs(args) => handle_jobs(args, &path),
        Commands::Schedules(args) => handle_schedules(args, &path),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn command_label(command: &Commands) -> &'static str {
    match command {
        Commands::Config(_) => "config",
        Commands::Token(_) => "token",
        Commands::Info => "info",
        Commands::Projects(_) => "projects",
        Commands::Workbooks(_) => "workbooks",
        Commands::Datasources(_) => "datasources",
        Commands::Users(_) => "users",
        Commands::Groups(_) => "groups",
        Commands::Jobs(_) => "jobs",
        Commands::Schedules(_) => "schedules",
    }
}
