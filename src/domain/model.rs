use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
}

impl EmployeeStatus {
    /// Reads a status cell. Blank cells mean `Active`; unknown values are `None`.
    pub fn from_cell(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("active") {
            Some(EmployeeStatus::Active)
        } else if value.eq_ignore_ascii_case("inactive") {
            Some(EmployeeStatus::Inactive)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "Active",
            EmployeeStatus::Inactive => "Inactive",
        }
    }
}

impl std::fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: String,
    pub name: String,
    pub department: String,
    pub role: String,
    pub join_date: String,
    pub status: EmployeeStatus,
}

/// One day of attendance. `hours` is derived from the two clock times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub employee_id: String,
    pub date: String,
    pub clock_in: Option<String>,
    pub clock_out: Option<String>,
    pub hours: Option<f64>,
}

/// A row as read from a CSV file or a worksheet, keyed by header text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRow {
    pub data: HashMap<String, serde_json::Value>,
}

impl RawRow {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<serde_json::Value>,
    {
        Self {
            data: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Canonical record produced by the normalizer, whatever the source format.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportRow {
    Employee(Employee),
    Attendance(AttendanceEntry),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedImport {
    pub rows: Vec<ImportRow>,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub employees: usize,
    pub attendance: usize,
    pub skipped: usize,
}

impl std::fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Imported: {} employees, {} attendance rows",
            self.employees, self.attendance
        )?;
        if self.skipped > 0 {
            write!(f, " ({} rows without EmployeeID skipped)", self.skipped)?;
        }
        Ok(())
    }
}

/// Everything the repository persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub employees: BTreeMap<String, Employee>,
    pub attendance: Vec<AttendanceEntry>,
}
