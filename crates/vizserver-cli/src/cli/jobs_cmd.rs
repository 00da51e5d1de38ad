use super::*;
pub(super) fn handle_jobs(args: JobsArgs, path: &Path) -> anyhow::Result<()> {
    match args.command {
        JobsCommands::List(list) => with_session(path, |server| {
            let jobs = server.jobs().all()?;
            print_rows(&jobs, list, |job| {
                format!(
                    "{}  {}  {}  created={}",
                    job.id,
                    job.job_type.as_deref().unwrap_or("-"),
                    job.status.as_deref().unwrap_or("-"),
                    format_time(job.created_at)
                )
            })
        }),
        JobsCommands::Wait(args) => with_session(path, |server| {
            let job = server
                .jobs()
                .wait_for_job(&args.id, timeout_from(args.timeout_secs))?;
            print_job(&job);
            Ok(())
        }),
        JobsCommands::Cancel(args) => with_session(path, |server| {
            server.jobs().cancel(&args.id)?;
            println!("Cancellation requested for job {}", args.id);
            Ok(())
        }),
    }
}

pub(super) fn print_job(job: &Job) {
    println!(
        "Job {} finished with {:?} at {}",
        job.id,
        job.finish_code,
        format_time(job.completed_at)
    );
    for note in &job.notes {
        println!("  note: {note}");
    }
}
