pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
pub use config::AppConfig;

pub use adapters::{JsonRepository, LocalStorage, XlsxReader};
pub use core::{aggregate::Aggregator, etl::ImportEngine, session::Session};
pub use domain::model::{AttendanceEntry, Employee, EmployeeStatus, ImportSummary};
pub use utils::error::{AttendanceError, Result};
