//! Turns raw CSV / worksheet rows into canonical [`ImportRow`]s.
//!
//! CSV headers are matched case-insensitively and the file is classified as
//! employee or attendance data by its header row. Workbooks must carry both an
//! `Employees` and an `Attendance` sheet whose headers match exactly.

use crate::domain::model::{
    AttendanceEntry, Employee, EmployeeStatus, ImportRow, NormalizedImport, RawRow, Sheet, Workbook,
};
use crate::utils::error::{AttendanceError, Result};
use serde_json::Value;
use std::collections::BTreeSet;

pub const EMPLOYEES_SHEET: &str = "Employees";
pub const ATTENDANCE_SHEET: &str = "Attendance";

const COL_EMPLOYEE_ID: &str = "EmployeeID";
const COL_NAME: &str = "Name";
const COL_DEPARTMENT: &str = "Department";
const COL_ROLE: &str = "Role";
const COL_JOIN_DATE: &str = "JoinDate";
const COL_STATUS: &str = "Status";
const COL_DATE: &str = "Date";
const COL_CLOCK_IN: &str = "ClockIn";
const COL_CLOCK_OUT: &str = "ClockOut";

const EMPLOYEE_COLUMNS: &[&str] = &[COL_EMPLOYEE_ID, COL_NAME];
const ATTENDANCE_COLUMNS: &[&str] = &[COL_EMPLOYEE_ID, COL_DATE];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvKind {
    Employees,
    Attendance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderMatch {
    /// CSV files: exact header, then lower-case, then any ASCII-case variant.
    CaseInsensitive,
    /// Worksheets: fixed header names only.
    Exact,
}

/// Employee data needs both an `EmployeeID` and a `Name` column.
pub fn detect_csv_kind<S: AsRef<str>>(headers: &[S]) -> CsvKind {
    let has = |wanted: &str| headers.iter().any(|h| h.as_ref().trim().eq_ignore_ascii_case(wanted));
    if has(COL_EMPLOYEE_ID) && has(COL_NAME) {
        CsvKind::Employees
    } else {
        CsvKind::Attendance
    }
}

/// Reads CSV text into its header row and data rows. Every cell is trimmed.
pub fn parse_csv(text: &str) -> Result<(Vec<String>, Vec<RawRow>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(AttendanceError::ImportFormatError {
            message: "CSV file has no header row".to_string(),
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let row = RawRow::from_pairs(
            headers
                .iter()
                .enumerate()
                .map(|(i, h)| (h.clone(), record.get(i).unwrap_or("").to_string())),
        );
        rows.push(row);
    }

    Ok((headers, rows))
}

pub fn normalize_csv(text: &str) -> Result<NormalizedImport> {
    let (headers, rows) = parse_csv(text)?;
    let kind = detect_csv_kind(headers.as_slice());
    tracing::debug!(?kind, columns = headers.len(), rows = rows.len(), "Classified CSV file");

    let required = match kind {
        CsvKind::Employees => EMPLOYEE_COLUMNS,
        CsvKind::Attendance => ATTENDANCE_COLUMNS,
    };
    require_columns("CSV file", headers.as_slice(), required, HeaderMatch::CaseInsensitive)?;

    let mut normalized = NormalizedImport::default();
    match kind {
        CsvKind::Employees => {
            collect_employees(&rows, HeaderMatch::CaseInsensitive, &mut normalized)
        }
        CsvKind::Attendance => {
            collect_attendance(&rows, HeaderMatch::CaseInsensitive, &mut normalized)
        }
    }
    Ok(normalized)
}

/// Both sheets and their columns are checked before any row is produced.
pub fn normalize_workbook(workbook: &Workbook) -> Result<NormalizedImport> {
    let employees = workbook
        .sheet(EMPLOYEES_SHEET)
        .ok_or_else(|| AttendanceError::MissingSheetError {
            sheet: EMPLOYEES_SHEET.to_string(),
        })?;
    let attendance = workbook
        .sheet(ATTENDANCE_SHEET)
        .ok_or_else(|| AttendanceError::MissingSheetError {
            sheet: ATTENDANCE_SHEET.to_string(),
        })?;
    require_sheet_columns(employees, EMPLOYEE_COLUMNS)?;
    require_sheet_columns(attendance, ATTENDANCE_COLUMNS)?;

    let mut normalized = NormalizedImport::default();
    collect_employees(&employees.rows, HeaderMatch::Exact, &mut normalized);
    collect_attendance(&attendance.rows, HeaderMatch::Exact, &mut normalized);
    Ok(normalized)
}

fn require_columns<S: AsRef<str>>(
    source: &str,
    headers: &[S],
    required: &[&str],
    mode: HeaderMatch,
) -> Result<()> {
    let present = |wanted: &str| {
        headers.iter().any(|h| match mode {
            HeaderMatch::CaseInsensitive => h.as_ref().eq_ignore_ascii_case(wanted),
            HeaderMatch::Exact => h.as_ref() == wanted,
        })
    };
    let missing: Vec<&str> = required.iter().copied().filter(|c| !present(*c)).collect();
    if missing.is_empty() {
        return Ok(());
    }

    Err(AttendanceError::ImportFormatError {
        message: format!("{} is missing required column(s): {}", source, missing.join(", ")),
    })
}

/// An empty sheet has nothing to import, so only sheets with rows are checked.
fn require_sheet_columns(sheet: &Sheet, required: &[&str]) -> Result<()> {
    if sheet.rows.is_empty() {
        return Ok(());
    }
    let headers: BTreeSet<&str> = sheet
        .rows
        .iter()
        .flat_map(|row| row.data.keys().map(String::as_str))
        .collect();
    let headers: Vec<&str> = headers.into_iter().collect();
    require_columns(
        &format!("Sheet '{}'", sheet.name),
        headers.as_slice(),
        required,
        HeaderMatch::Exact,
    )
}

fn collect_employees(rows: &[RawRow], mode: HeaderMatch, out: &mut NormalizedImport) {
    for row in rows {
        match employee_from_row(row, mode) {
            Some(employee) => out.rows.push(ImportRow::Employee(employee)),
            None => out.skipped += 1,
        }
    }
}

fn collect_attendance(rows: &[RawRow], mode: HeaderMatch, out: &mut NormalizedImport) {
    out.rows.extend(
        rows.iter()
            .map(|row| ImportRow::Attendance(attendance_from_row(row, mode))),
    );
}

fn employee_from_row(row: &RawRow, mode: HeaderMatch) -> Option<Employee> {
    let employee_id = column(row, COL_EMPLOYEE_ID, mode);
    if employee_id.is_empty() {
        return None;
    }

    let raw_status = column(row, COL_STATUS, mode);
    let status = EmployeeStatus::from_cell(&raw_status).unwrap_or_else(|| {
        tracing::warn!(
            employee_id = %employee_id,
            status = %raw_status,
            "Unknown employee status, treating as Active"
        );
        EmployeeStatus::Active
    });

    Some(Employee {
        name: column(row, COL_NAME, mode),
        department: column(row, COL_DEPARTMENT, mode),
        role: column(row, COL_ROLE, mode),
        join_date: column(row, COL_JOIN_DATE, mode),
        status,
        employee_id,
    })
}

fn attendance_from_row(row: &RawRow, mode: HeaderMatch) -> AttendanceEntry {
    let non_blank = |s: String| if s.is_empty() { None } else { Some(s) };
    AttendanceEntry::new(
        column(row, COL_EMPLOYEE_ID, mode),
        column(row, COL_DATE, mode),
        non_blank(column(row, COL_CLOCK_IN, mode)),
        non_blank(column(row, COL_CLOCK_OUT, mode)),
    )
}

/// Trimmed text of a column; missing and empty cells both give "".
fn column(row: &RawRow, name: &str, mode: HeaderMatch) -> String {
    let mut value = row.data.get(name).map(cell_text).unwrap_or_default();

    if value.is_empty() && mode == HeaderMatch::CaseInsensitive {
        value = row
            .data
            .get(&name.to_lowercase())
            .map(cell_text)
            .filter(|v| !v.is_empty())
            .or_else(|| {
                row.data
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| cell_text(v))
            })
            .unwrap_or_default();
    }

    value
}

/// Renders a cell as text. Integral numbers lose their fractional part.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}
