use serde::Deserialize;
use vizserver_core::model::{BackgroundJob, FinishCode, Job, Schedule, parse_timestamp};

use crate::session_models::PaginationItem;

#[derive(Debug, Deserialize)]
pub(crate) struct JobResponse {
    pub(crate) job: JobItem,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JobItem {
    #[serde(rename = "@id")]
    pub(crate) id: String,
    #[serde(rename = "@type", default)]
    pub(crate) job_type: Option<String>,
    #[serde(rename = "@mode", default)]
    pub(crate) mode: Option<String>,
    #[serde(rename = "@progress", default)]
    pub(crate) progress: Option<u32>,
    #[serde(rename = "@createdAt", default)]
    pub(crate) created_at: Option<String>,
    #[serde(rename = "@startedAt", default)]
    pub(crate) started_at: Option<String>,
    #[serde(rename = "@completedAt", default)]
    pub(crate) completed_at: Option<String>,
    #[serde(rename = "@finishCode", default)]
    pub(crate) finish_code: Option<i32>,
    #[serde(rename = "notes", default)]
    pub(crate) notes: Vec<String>,
    #[serde(rename = "extractRefreshJob", default)]
    pub(crate) extract_refresh_job: Option<ExtractRefreshJobItem>,
}

/// Refresh details nested in a job; failure notes usually live here.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExtractRefreshJobItem {
    #[serde(rename = "notes", default)]
    pub(crate) notes: Vec<String>,
}

impl JobItem {
    pub(crate) fn into_model(self) -> Job {
        let mut notes = self.notes;
        if let Some(refresh) = self.extract_refresh_job {
            notes.extend(refresh.notes);
        }
        Job {
            id: self.id,
            job_type: self.job_type,
            mode: self.mode,
            progress: self.progress,
            created_at: parse_timestamp(self.created_at.as_deref()),
            started_at: parse_timestamp(self.started_at.as_deref()),
            completed_at: parse_timestamp(self.completed_at.as_deref()),
            finish_code: self.finish_code.map(FinishCode::from_code),
            notes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BackgroundJobsResponse {
    #[serde(default)]
    pub(crate) pagination: Option<PaginationItem>,
    #[serde(rename = "backgroundJobs", default)]
    pub(crate) background_jobs: BackgroundJobList,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct BackgroundJobList {
    #[serde(rename = "backgroundJob", default)]
    pub(crate) items: Vec<BackgroundJobItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BackgroundJobItem {
    #[serde(rename = "@id")]
    pub(crate) id: String,
    #[serde(rename = "@status", default)]
    pub(crate) status: Option<String>,
    #[serde(rename = "@jobType", default)]
    pub(crate) job_type: Option<String>,
    #[serde(rename = "@priority", default)]
    pub(crate) priority: Option<u32>,
    #[serde(rename = "@createdAt", default)]
    pub(crate) created_at: Option<String>,
    #[serde(rename = "@startedAt", default)]
    pub(crate) started_at: Option<String>,
    #[serde(rename = "@endedAt", default)]
    pub(crate) ended_at: Option<String>,
    #[serde(rename = "@title", default)]
    pub(crate) title: Option<String>,
    #[serde(rename = "@subtitle", default)]
    pub(crate) subtitle: Option<String>,
}

impl BackgroundJobItem {
    pub(crate) fn into_model(self) -> BackgroundJob {
        BackgroundJob {
            id: self.id,
            status: self.status,
            job_type: self.job_type,
            priority: self.priority,
            created_at: parse_timestamp(self.created_at.as_deref()),
            started_at: parse_timestamp(self.started_at.as_deref()),
            ended_at: parse_timestamp(self.ended_at.as_deref()),
            title: self.title,
            subtitle: self.subtitle,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SchedulesResponse {
    #[serde(default)]
    pub(crate) pagination: Option<PaginationItem>,
    #[serde(default)]
    pub(crate) schedules: ScheduleList,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ScheduleList {
    #[serde(rename = "schedule", default)]
    pub(crate) items: Vec<ScheduleItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScheduleResponse {
    pub(crate) schedule: ScheduleItem,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScheduleItem {
    #[serde(rename = "@id")]
    pub(crate) id: String,
    #[serde(rename = "@name")]
    pub(crate) name: String,
    #[serde(rename = "@state", default)]
    pub(crate) state: Option<String>,
    #[serde(rename = "@priority", default)]
    pub(crate) priority: Option<u32>,
    #[serde(rename = "@type", default)]
    pub(crate) schedule_type: Option<String>,
    #[serde(rename = "@frequency", default)]
    pub(crate) frequency: Option<String>,
    #[serde(rename = "@nextRunAt", default)]
    pub(crate) next_run_at: Option<String>,
    #[serde(rename = "@createdAt", default)]
    pub(crate) created_at: Option<String>,
    #[serde(rename = "@updatedAt", default)]
    pub(crate) updated_at: Option<String>,
}

impl ScheduleItem {
    pub(crate) fn into_model(self) -> Schedule {
        Schedule {
            id: self.id,
            name: self.name,
            state: self.state,
            priority: self.priority,
            schedule_type: self.schedule_type,
            frequency: self.frequency,
            next_run_at: parse_timestamp(self.next_run_at.as_deref()),
            created_at: parse_timestamp(self.created_at.as_deref()),
            updated_at: parse_timestamp(self.updated_at.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_response;

    #[test]
    fn running_job_has_no_completion() {
        let body = r#"<tsResponse><job id="j1" mode="Asynchronous" type="RefreshExtract" progress="40" createdAt="2024-02-01T08:00:00Z" startedAt="2024-02-01T08:00:05Z"/></tsResponse>"#;
        let job = parse_response::<JobResponse>(body).unwrap().job.into_model();
        assert!(!job.is_complete());
        assert_eq!(job.progress, Some(40));
        assert_eq!(job.finish_code, None);
        assert_eq!(job.job_type.as_deref(), Some("RefreshExtract"));
    }

    #[test]
    fn finished_job_reads_finish_code_and_notes() {
        let body = r#"<tsResponse><job id="j1" type="RefreshExtract" progress="100" completedAt="2024-02-01T08:03:00Z" finishCode="1"><notes>Connection refused</notes></job></tsResponse>"#;
        let job = parse_response::<JobResponse>(body).unwrap().job.into_model();
        assert!(job.is_complete());
        assert_eq!(job.finish_code, Some(FinishCode::Failed));
        assert_eq!(job.notes, vec!["Connection refused".to_string()]);
    }

    #[test]
    fn failed_refresh_reads_nested_notes() {
        let body = r#"<tsResponse xmlns="http://tableau.com/api"><job id="j1" mode="Asynchronous" type="RefreshExtract" progress="100" completedAt="2024-02-01T08:03:00Z" finishCode="1"><statusNotes><statusNote type="CountOfUsersAddedToGroup" value="0"/></statusNotes><extractRefreshJob><notes>first</notes><notes>second</notes><datasource id="d1" name="Orders"/></extractRefreshJob></job></tsResponse>"#;
        let job = parse_response::<JobResponse>(body).unwrap().job.into_model();
        assert_eq!(job.finish_code, Some(FinishCode::Failed));
        assert_eq!(job.notes, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn background_jobs_decode() {
        let body = r#"<tsResponse><pagination pageNumber="1" pageSize="100" totalAvailable="1"/><backgroundJobs><backgroundJob id="b1" status="InProgress" jobType="refresh_extracts" priority="50" createdAt="2024-02-01T08:00:00Z" title="Orders"/></backgroundJobs></tsResponse>"#;
        let parsed: BackgroundJobsResponse = parse_response(body).unwrap();
        let job = parsed
            .background_jobs
            .items
            .into_iter()
            .next()
            .unwrap()
            .into_model();
        assert_eq!(job.status.as_deref(), Some("InProgress"));
        assert_eq!(job.priority, Some(50));
        assert!(job.ended_at.is_none());
    }

    #[test]
    fn schedules_decode() {
        let body = r#"<tsResponse><schedules><schedule id="s1" name="Nightly" state="Active" priority="50" type="Extract" frequency="Daily" nextRunAt="2024-02-02T02:00:00Z"/></schedules></tsResponse>"#;
        let parsed: SchedulesResponse = parse_response(body).unwrap();
        let schedule = parsed
            .schedules
            .items
            .into_iter()
            .next()
            .unwrap()
            .into_model();
        assert_eq!(schedule.name, "Nightly");
        assert_eq!(schedule.frequency.as_deref(), Some("Daily"));
        assert!(schedule.next_run_at.is_some());
    }
}
