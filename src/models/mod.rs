pub mod alert;
pub mod record;

pub use alert::{Alert, AlertKind};
pub use record::{HttpMethod, LogRecord, ResponseSize, TIMESTAMP_FORMAT};
