use crate::adapters::repository::{DEFAULT_ATTENDANCE_FILE, DEFAULT_EMPLOYEES_FILE};
use crate::utils::error::{AttendanceError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub employees_file: String,
    pub attendance_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            employees_file: DEFAULT_EMPLOYEES_FILE.to_string(),
            attendance_file: DEFAULT_ATTENDANCE_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub seed_sample_data: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed_sample_data: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AttendanceError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AttendanceError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AttendanceError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn data_dir(&self) -> &str {
        &self.storage.data_dir
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("storage.data_dir", &self.storage.data_dir)?;
        validation::validate_non_empty_string("storage.employees_file", &self.storage.employees_file)?;
        validation::validate_non_empty_string("storage.attendance_file", &self.storage.attendance_file)?;
        validation::validate_file_extensions(
            "storage",
            &[
                self.storage.employees_file.clone(),
                self.storage.attendance_file.clone(),
            ],
            &["json"],
        )?;

        if self.storage.employees_file == self.storage.attendance_file {
            return Err(AttendanceError::InvalidConfigValueError {
                field: "storage.attendance_file".to_string(),
                value: self.storage.attendance_file.clone(),
                reason: "Employees and attendance must be stored in different files".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.data_dir(), "./data");
        assert_eq!(config.storage.employees_file, "employees.json");
        assert!(config.session.seed_sample_data);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[storage]
data_dir = "/var/lib/attendance"
employees_file = "staff.json"
attendance_file = "log.json"

[session]
seed_sample_data = false

[logging]
format = "json"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.data_dir(), "/var/lib/attendance");
        assert_eq!(config.storage.attendance_file, "log.json");
        assert!(!config.session.seed_sample_data);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ATTENDANCE_TEST_DATA_DIR", "/tmp/attendance-test");

        let toml_content = r#"
[storage]
data_dir = "${ATTENDANCE_TEST_DATA_DIR}"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.data_dir(), "/tmp/attendance-test");

        std::env::remove_var("ATTENDANCE_TEST_DATA_DIR");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[storage]
employees_file = "same.json"
attendance_file = "same.json"
"#;
        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str("[storage]\nattendance_file = \"log.csv\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[storage\n").unwrap_err();
        assert!(matches!(err, AttendanceError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[storage]\ndata_dir = \"./from-file\"\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.data_dir(), "./from-file");
    }
}
