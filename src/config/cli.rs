use crate::config::toml_config::AppConfig;
use crate::domain::model::{Employee, EmployeeStatus};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "attendance")]
#[command(about = "Employee attendance tracking with CSV/XLSX import")]
pub struct CliConfig {
    #[arg(short, long, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Directory holding employees.json and attendance.json")]
    pub data_dir: Option<String>,

    #[arg(long, help = "Do not seed sample data into an empty store")]
    pub no_seed: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List employees ordered by id
    Employees,

    /// Show a profile, hours worked and the latest attendance entries
    Show {
        employee_id: String,
        #[arg(long, default_value = "10")]
        limit: usize,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Add or replace an employee profile
    AddEmployee {
        employee_id: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        department: String,
        #[arg(long, default_value = "")]
        role: String,
        #[arg(long, default_value = "")]
        join_date: String,
        #[arg(long, default_value = "Active")]
        status: String,
    },

    /// Record a clock-in (defaults to now)
    ClockIn {
        employee_id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        time: Option<String>,
    },

    /// Record a clock-out (defaults to now)
    ClockOut {
        employee_id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        time: Option<String>,
    },

    /// Total hours, optionally within [from, to]
    Hours {
        employee_id: String,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Import a .csv or .xlsx file
    Import { file: String },
}

impl CliConfig {
    /// Loads the TOML file if one was given, then applies command line overrides.
    pub fn app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(data_dir) = &self.data_dir {
            config.storage.data_dir = data_dir.clone();
        }
        if self.no_seed {
            config.session.seed_sample_data = false;
        }

        Ok(config)
    }
}

impl Command {
    /// Builds the profile for `add-employee`, trimming every field.
    pub fn employee(&self) -> Option<Employee> {
        match self {
            Command::AddEmployee {
                employee_id,
                name,
                department,
                role,
                join_date,
                status,
            } => Some(Employee {
                employee_id: employee_id.trim().to_string(),
                name: name.trim().to_string(),
                department: department.trim().to_string(),
                role: role.trim().to_string(),
                join_date: join_date.trim().to_string(),
                status: EmployeeStatus::from_cell(status).unwrap_or_default(),
            }),
            _ => None,
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(data_dir) = &self.data_dir {
            validation::validate_path("data_dir", data_dir)?;
        }

        match &self.command {
            Command::AddEmployee {
                employee_id,
                status,
                ..
            } => {
                validation::validate_non_empty_string("employee_id", employee_id)?;
                validation::validate_one_of("status", status, &["Active", "Inactive"])?;
            }
            Command::Show { employee_id, .. }
            | Command::ClockIn { employee_id, .. }
            | Command::ClockOut { employee_id, .. }
            | Command::Hours { employee_id, .. } => {
                validation::validate_non_empty_string("employee_id", employee_id)?;
            }
            Command::Import { file } => validation::validate_path("file", file)?,
            Command::Employees => {}
        }

        Ok(())
    }
}
