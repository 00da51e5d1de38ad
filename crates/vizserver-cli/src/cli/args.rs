use super::*;
#[derive(Parser)]
#[command(name = "vizserver", author, version, about)]
pub(super) struct Cli {
    #[arg(long, global = true, help = "Path to the config file")]
    pub(super) config: Option<PathBuf>,
    #[arg(short, long, global = true, help = "Log progress at info level")]
    pub(super) verbose: bool,
    #[command(subcommand)]
    pub(super) command: Commands,
}

#[derive(clap::Subcommand)]
pub(super) enum Commands {
    #[command(about = "Manage config")]
    Config(ConfigArgs),
    #[command(about = "Manage the stored sign-in secret")]
    Token(TokenArgs),
    #[command(about = "Show server version info (no sign-in)")]
    Info,
    #[command(about = "Work with projects")]
    Projects(ProjectsArgs),
    #[command(about = "Work with workbooks")]
    Workbooks(WorkbooksArgs),
    #[command(about = "Work with published data sources")]
    Datasources(DatasourcesArgs),
    #[command(about = "Work with site users")]
    Users(UsersArgs),
    #[command(about = "Work with groups")]
    Groups(GroupsArgs),
    #[command(about = "Inspect and wait for background jobs")]
    Jobs(JobsArgs),
    #[command(about = "Work with server schedules")]
    Schedules(SchedulesArgs),
}

#[derive(Parser)]
pub(super) struct ConfigArgs {
    #[command(subcommand)]
    pub(super) command: ConfigCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum ConfigCommands {
    #[command(about = "Write a config for a server and sign-in identity")]
    Init(InitArgs),
}

#[derive(Parser)]
pub(super) struct InitArgs {
    #[arg(long)]
    pub(super) server_url: String,
    #[arg(long, default_value = "")]
    pub(super) site: String,
    #[arg(long)]
    pub(super) api_version: Option<String>,
    #[arg(long, conflicts_with = "username", required_unless_present = "username")]
    pub(super) token_name: Option<String>,
    #[arg(long)]
    pub(super) username: Option<String>,
}

#[derive(Parser)]
pub(super) struct TokenArgs {
    #[command(subcommand)]
    pub(super) command: TokenCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum TokenCommands {
    #[command(about = "Store the secret for the configured identity in the keyring")]
    Set(SetTokenArgs),
    #[command(about = "Remove the stored secret from the keyring")]
    Delete,
}

#[derive(Parser)]
pub(super) struct SetTokenArgs {
    #[arg(long)]
    pub(super) secret: String,
}

#[derive(Parser, Clone, Copy)]
pub(super) struct ListArgs {
    #[arg(long, help = "Print JSON instead of one line per item")]
    pub(super) json: bool,
}

#[derive(Parser)]
pub(super) struct ProjectsArgs {
    #[command(subcommand)]
    pub(super) command: ProjectsCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum ProjectsCommands {
    #[command(about = "List projects")]
    List(ListArgs),
}

#[derive(Parser)]
pub(super) struct WorkbooksArgs {
    #[command(subcommand)]
    pub(super) command: WorkbooksCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum WorkbooksCommands {
    #[command(about = "List workbooks")]
    List(ListWorkbooksArgs),
    #[command(about = "Queue an extract refresh")]
    Refresh(RefreshArgs),
}

#[derive(Parser)]
pub(super) struct ListWorkbooksArgs {
    #[arg(long, help = "Only workbooks in the project with this name")]
    pub(super) project: Option<String>,
    #[command(flatten)]
    pub(super) list: ListArgs,
}

#[derive(Parser)]
pub(super) struct RefreshArgs {
    pub(super) id: String,
    #[arg(long, help = "Wait for the refresh job to finish")]
    pub(super) wait: bool,
    #[arg(long, requires = "wait")]
    pub(super) timeout_secs: Option<u64>,
}

#[derive(Parser)]
pub(super) struct DatasourcesArgs {
    #[command(subcommand)]
    pub(super) command: DatasourcesCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum DatasourcesCommands {
    #[command(about = "List published data sources")]
    List(ListArgs),
    #[command(about = "Queue an extract refresh")]
    Refresh(RefreshArgs),
}

#[derive(Parser)]
pub(super) struct UsersArgs {
    #[command(subcommand)]
    pub(super) command: UsersCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum UsersCommands {
    #[command(about = "List site users")]
    List(ListArgs),
}

#[derive(Parser)]
pub(super) struct GroupsArgs {
    #[command(subcommand)]
    pub(super) command: GroupsCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum GroupsCommands {
    #[command(about = "List groups")]
    List(ListArgs),
}

#[derive(Parser)]
pub(super) struct JobsArgs {
    #[command(subcommand)]
    pub(super) command: JobsCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum JobsCommands {
    #[command(about = "List background jobs")]
    List(ListArgs),
    #[command(about = "Wait for a job to finish")]
    Wait(WaitArgs),
    #[command(about = "Cancel a job")]
    Cancel(JobIdArgs),
}

#[derive(Parser)]
pub(super) struct WaitArgs {
    pub(super) id: String,
    #[arg(long)]
    pub(super) timeout_secs: Option<u64>,
}

#[derive(Parser)]
pub(super) struct JobIdArgs {
    pub(super) id: String,
}

#[derive(Parser)]
pub(super) struct SchedulesArgs {
    #[command(subcommand)]
    pub(super) command: SchedulesCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum SchedulesCommands {
    #[command(about = "List server schedules")]
    List(ListArgs),
}

pub(super) fn timeout_from(secs: Option<u64>) -> Option<Duration> {
    secs.map(Duration::from_secs)
}
