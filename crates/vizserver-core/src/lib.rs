pub mod backoff;
pub mod config;
pub mod error;
pub mod model;
pub mod request_options;

pub use backoff::{BackoffError, BackoffTimer, Clock, ManualClock, SystemClock};
pub use error::{JobError, ServerError};
pub use request_options::{Filter, FilterOperator, RequestOptions, SortDirection};
