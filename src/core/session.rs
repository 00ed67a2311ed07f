//! Loaded state plus persistence for one run of the program.

use crate::core::aggregate::Aggregator;
use crate::core::attendance::AttendanceStore;
use crate::core::directory::EmployeeDirectory;
use crate::domain::model::{
    AttendanceEntry, Employee, EmployeeStatus, ImportRow, ImportSummary, NormalizedImport, Snapshot,
};
use crate::domain::ports::Repository;
use crate::utils::error::Result;

/// The employee directory and attendance log for one run of the program.
///
/// Loaded once by [`Session::open`]; every mutating call saves through the
/// repository afterwards. If saving fails the change is kept in memory and the
/// error is returned so the caller can report it.
pub struct Session<R: Repository> {
    repository: R,
    directory: EmployeeDirectory,
    attendance: AttendanceStore,
}

impl<R: Repository> Session<R> {
    pub async fn open(repository: R, seed_sample_data: bool) -> Self {
        let snapshot = match repository.load().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Could not load saved data, starting empty: {}", e);
                Snapshot::default()
            }
        };

        let mut session = Self {
            repository,
            directory: EmployeeDirectory::from_map(snapshot.employees),
            attendance: AttendanceStore::from_entries(snapshot.attendance),
        };

        if seed_sample_data {
            session.seed_if_empty();
        }

        tracing::info!(
            employees = session.directory.len(),
            attendance = session.attendance.len(),
            "Session opened"
        );
        session
    }

    fn seed_if_empty(&mut self) {
        if self.directory.is_empty() {
            tracing::info!("No employees found, seeding sample profiles");
            for employee in sample_employees() {
                self.directory.upsert(employee);
            }
        }
        if self.attendance.is_empty() {
            tracing::info!("No attendance found, seeding sample entries");
            for entry in sample_attendance() {
                self.append_attendance(entry);
            }
        }
    }

    pub fn directory(&self) -> &EmployeeDirectory {
        &self.directory
    }

    pub fn attendance(&self) -> &AttendanceStore {
        &self.attendance
    }

    pub fn aggregator(&self) -> Aggregator<'_> {
        Aggregator::new(&self.attendance)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            employees: self.directory.as_map().clone(),
            attendance: self.attendance.entries().to_vec(),
        }
    }

    pub async fn save(&self) -> Result<()> {
        self.repository.save(&self.snapshot()).await
    }

    pub async fn upsert_employee(&mut self, employee: Employee) -> Result<()> {
        tracing::info!(employee_id = %employee.employee_id, "Saving employee profile");
        self.directory.upsert(employee);
        self.save().await
    }

    pub async fn clock_in(&mut self, employee_id: &str, date: &str, time: &str) -> Result<AttendanceEntry> {
        let entry = self.attendance.record_clock_in(employee_id, date, time).clone();
        tracing::info!(employee_id, date, time, "Clocked in");
        self.save().await?;
        Ok(entry)
    }

    pub async fn clock_out(&mut self, employee_id: &str, date: &str, time: &str) -> Result<AttendanceEntry> {
        let entry = self.attendance.record_clock_out(employee_id, date, time).clone();
        tracing::info!(employee_id, date, time, hours = ?entry.hours, "Clocked out");
        self.save().await?;
        Ok(entry)
    }

    /// Applies normalized rows: employees are upserted, attendance is appended.
    pub async fn absorb(&mut self, import: NormalizedImport) -> Result<ImportSummary> {
        let mut summary = ImportSummary {
            skipped: import.skipped,
            ..ImportSummary::default()
        };

        for row in import.rows {
            match row {
                ImportRow::Employee(employee) => {
                    self.directory.upsert(employee);
                    summary.employees += 1;
                }
                ImportRow::Attendance(entry) => {
                    self.append_attendance(entry);
                    summary.attendance += 1;
                }
            }
        }

        self.save().await?;
        Ok(summary)
    }

    fn append_attendance(&mut self, entry: AttendanceEntry) {
        let AttendanceEntry {
            employee_id,
            date,
            clock_in,
            clock_out,
            ..
        } = entry;
        self.attendance
            .upsert_from_import(&employee_id, &date, clock_in, clock_out);
    }
}

fn sample_employees() -> Vec<Employee> {
    [
        ("E001", "Shamim", "Operations", "Associate", "2024-01-15", EmployeeStatus::Active),
        ("E002", "Rafi", "Sales", "Executive", "2023-09-10", EmployeeStatus::Active),
        ("E003", "Nadia", "HR", "Officer", "2022-06-01", EmployeeStatus::Inactive),
    ]
    .into_iter()
    .map(|(id, name, department, role, join_date, status)| Employee {
        employee_id: id.to_string(),
        name: name.to_string(),
        department: department.to_string(),
        role: role.to_string(),
        join_date: join_date.to_string(),
        status,
    })
    .collect()
}

fn sample_attendance() -> Vec<AttendanceEntry> {
    [
        ("E001", "2025-11-28", "09:02", "18:05"),
        ("E001", "2025-11-29", "09:15", "17:45"),
        ("E002", "2025-11-28", "10:00", "19:10"),
        ("E003", "2025-11-26", "08:52", "16:30"),
    ]
    .into_iter()
    .map(|(id, date, clock_in, clock_out)| {
        AttendanceEntry::new(id, date, Some(clock_in.to_string()), Some(clock_out.to_string()))
    })
    .collect()
}
