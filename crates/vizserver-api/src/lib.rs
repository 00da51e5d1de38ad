pub mod auth;
pub mod datasources;
pub mod favorites;
pub mod groups;
mod http;
pub mod jobs;
pub mod paging;
pub mod projects;
pub mod schedules;
pub mod server;
pub mod session;
pub mod users;
pub mod views;
pub mod workbooks;

mod content_models;
mod job_models;
mod session_models;
mod tags;
mod user_models;
mod xml;

pub use jobs::poll_until_complete;
pub use paging::{PagedEndpoint, Pager};
pub use server::{AUTH_HEADER, Server};
pub use xml::NAMESPACE;
pub use session::Credentials;
pub use workbooks::WorkbookUpdate;
