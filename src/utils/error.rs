use thiserror::Error;

#[derive(Error, Debug)]
pub enum AttendanceError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Import format error: {message}")]
    ImportFormatError { message: String },

    #[error("Import format error: required sheet '{sheet}' is missing")]
    MissingSheetError { sheet: String },

    #[error("Unsupported file type: '{extension}'")]
    UnsupportedFileType { extension: String },

    #[error("Spreadsheet library not available")]
    SpreadsheetUnavailable,

    #[error("Storage unavailable: {message}")]
    StorageUnavailable { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    ImportFormat,
    UnsupportedFile,
    Storage,
    Configuration,
    Io,
}

impl AttendanceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AttendanceError::CsvError(_)
            | AttendanceError::ImportFormatError { .. }
            | AttendanceError::MissingSheetError { .. } => ErrorCategory::ImportFormat,
            AttendanceError::UnsupportedFileType { .. }
            | AttendanceError::SpreadsheetUnavailable => ErrorCategory::UnsupportedFile,
            AttendanceError::StorageUnavailable { .. }
            | AttendanceError::SerializationError(_) => ErrorCategory::Storage,
            AttendanceError::ConfigValidationError { .. }
            | AttendanceError::MissingConfigError { .. }
            | AttendanceError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            AttendanceError::IoError(_) => ErrorCategory::Io,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AttendanceError::MissingSheetError { .. } => {
                "Sheet names must be Employees and Attendance.".to_string()
            }
            AttendanceError::UnsupportedFileType { .. } => "Unsupported file type.".to_string(),
            AttendanceError::SpreadsheetUnavailable => {
                "XLSX support is not available in this build. Please use CSV.".to_string()
            }
            AttendanceError::StorageUnavailable { message } => {
                format!("Changes were applied but could not be saved: {}", message)
            }
            other => format!("Import failed: {}", other),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::ImportFormat => {
                "Check the header row: EmployeeID,Name,... for employees or EmployeeID,Date,ClockIn,ClockOut for attendance"
            }
            ErrorCategory::UnsupportedFile => "Use a .csv file, or a .xlsx file with the xlsx feature enabled",
            ErrorCategory::Storage => "Check that the data directory exists and is writable",
            ErrorCategory::Configuration => "Review the configuration file and command line flags",
            ErrorCategory::Io => "Make sure the file exists and is readable",
        }
    }
}

pub type Result<T> = std::result::Result<T, AttendanceError>;
