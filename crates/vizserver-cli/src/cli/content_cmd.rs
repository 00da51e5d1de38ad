use super::*;
pub(super) fn handle_projects(args: ProjectsArgs, path: &Path) -> anyhow::Result<()> {
    match args.command {
        ProjectsCommands::List(list) => with_session(path, |server| {
            let projects = server.projects().all()?;
            print_rows(&projects, list, |project| {
                format!(
                    "{}  {}  parent={}",
                    project.id,
                    project.name,
                    project.parent_id.as_deref().unwrap_or("-")
                )
            })
        }),
    }
}

pub(super) fn handle_workbooks(args: WorkbooksArgs, path: &Path) -> anyhow::Result<()> {
    match args.command {
        WorkbooksCommands::List(args) => with_session(path, |server| {
            let endpoint = server.workbooks();
            let options = workbook_list_options(server.default_options(), args.project.as_deref());
            let workbooks = Pager::new(&endpoint, options).collect_all()?;
            print_rows(&workbooks, args.list, |workbook| {
                let project = workbook
                    .project
                    .as_ref()
                    .and_then(|project| project.name.as_deref())
                    .unwrap_or("-");
                format!(
                    "{}  {}  project={}  updated={}",
                    workbook.id,
                    workbook.name,
                    project,
                    format_time(workbook.updated_at)
                )
            })
        }),
        WorkbooksCommands::Refresh(args) => with_session(path, |server| {
            let job = server.workbooks().refresh(&args.id)?;
            finish_refresh(server, job, &args)
        }),
    }
}

pub(super) fn handle_datasources(args: DatasourcesArgs, path: &Path) -> anyhow::Result<()> {
    match args.command {
        DatasourcesCommands::List(list) => with_session(path, |server| {
            let datasources = server.datasources().all()?;
            print_rows(&datasources, list, |datasource| {
                format!(
                    "{}  {}  type={}  extracts={}",
                    datasource.id,
                    datasource.name,
                    datasource.datasource_type.as_deref().unwrap_or("-"),
                    datasource.has_extracts
                )
            })
        }),
        DatasourcesCommands::Refresh(args) => with_session(path, |server| {
            let job = server.datasources().refresh(&args.id)?;
            finish_refresh(server, job, &args)
        }),
    }
}

pub(super) fn workbook_list_options(base: RequestOptions, project: Option<&str>) -> RequestOptions {
    match project {
        Some(name) => base.filter(Filter::new("projectName", FilterOperator::Equals, name)),
        None => base,
    }
}

fn finish_refresh(server: &Server, job: Job, args: &RefreshArgs) -> anyhow::Result<()> {
    println!("Refresh queued as job {}", job.id);
    if !args.wait {
        return Ok(());
    }
    let job = server
        .jobs()
        .wait_for_job(&job.id, timeout_from(args.timeout_secs))?;
    print_job(&job);
    Ok(())
}
