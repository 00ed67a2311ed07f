pub mod aggregate;
pub mod attendance;
pub mod directory;
pub mod etl;
pub mod normalize;
pub mod session;
pub mod time;

pub use crate::domain::model::{AttendanceEntry, Employee, EmployeeStatus, ImportRow, ImportSummary};
pub use crate::domain::ports::{Repository, Storage, WorkbookReader};
pub use crate::utils::error::Result;
