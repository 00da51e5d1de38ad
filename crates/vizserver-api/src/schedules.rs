use anyhow::Context;
use tracing::info;
use vizserver_core::model::{Pagination, Schedule};
use vizserver_core::request_options::RequestOptions;

use crate::job_models::{ScheduleItem, ScheduleResponse, SchedulesResponse};
use crate::paging::{PagedEndpoint, Pager};
use crate::server::Server;
use crate::session_models::pagination_or_single;

/// Schedules live at server scope but still require a session.
pub struct Schedules<'a> {
    server: &'a Server,
}

impl<'a> Schedules<'a> {
    pub(crate) fn new(server: &'a Server) -> Self {
        Self { server }
    }

    pub fn list(&self, options: &RequestOptions) -> anyhow::Result<(Vec<Schedule>, Pagination)> {
        let url = self.server.server_url(&["schedules"], Some(options))?;
        info!(page = options.page_number, "listing schedules");
        let payload: SchedulesResponse = self.server.get_xml(url).context("list schedules")?;
        let items: Vec<Schedule> = payload
            .schedules
            .items
            .into_iter()
            .map(ScheduleItem::into_model)
            .collect();
        let pagination = pagination_or_single(payload.pagination, options, items.len());
        Ok((items, pagination))
    }

    pub fn all(&self) -> anyhow::Result<Vec<Schedule>> {
        Pager::new(self, self.server.default_options()).collect_all()
    }

    pub fn get_by_id(&self, schedule_id: &str) -> anyhow::Result<Schedule> {
        let url = self.server.server_url(&["schedules", schedule_id], None)?;
        let payload: ScheduleResponse = self
            .server
            .get_xml(url)
            .with_context(|| format!("get schedule {schedule_id}"))?;
        Ok(payload.schedule.into_model())
    }
}

impl PagedEndpoint for Schedules<'_> {
    type Item = Schedule;

    fn page(&self, options: &RequestOptions) -> anyhow::Result<(Vec<Schedule>, Pagination)> {
        self.list(options)
    }
}
