use crate::domain::model::{AttendanceEntry, Employee, Snapshot};
use crate::domain::ports::{Repository, Storage};
use crate::utils::error::{AttendanceError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;

pub const DEFAULT_EMPLOYEES_FILE: &str = "employees.json";
pub const DEFAULT_ATTENDANCE_FILE: &str = "attendance.json";

/// Keeps employees as a JSON object keyed by id and attendance as a JSON array.
pub struct JsonRepository<S: Storage> {
    storage: S,
    employees_file: String,
    attendance_file: String,
}

impl<S: Storage> JsonRepository<S> {
    pub fn new(storage: S) -> Self {
        Self::with_files(storage, DEFAULT_EMPLOYEES_FILE, DEFAULT_ATTENDANCE_FILE)
    }

    pub fn with_files(
        storage: S,
        employees_file: impl Into<String>,
        attendance_file: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            employees_file: employees_file.into(),
            attendance_file: attendance_file.into(),
        }
    }

    /// A missing file reads as `None`; any other failure is a storage error.
    async fn read_optional(&self, path: &str) -> Result<Option<Vec<u8>>> {
        if !self.storage.exists(path).await {
            return Ok(None);
        }
        self.storage
            .read_file(path)
            .await
            .map(Some)
            .map_err(|e| storage_unavailable(path, e))
    }
}

fn storage_unavailable(path: &str, err: AttendanceError) -> AttendanceError {
    AttendanceError::StorageUnavailable {
        message: format!("{}: {}", path, err),
    }
}

#[async_trait]
impl<S: Storage> Repository for JsonRepository<S> {
    async fn load(&self) -> Result<Snapshot> {
        let employees: BTreeMap<String, Employee> = match self.read_optional(&self.employees_file).await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| storage_unavailable(&self.employees_file, e.into()))?,
            None => BTreeMap::new(),
        };
        let attendance: Vec<AttendanceEntry> = match self.read_optional(&self.attendance_file).await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| storage_unavailable(&self.attendance_file, e.into()))?,
            None => Vec::new(),
        };

        tracing::debug!(
            employees = employees.len(),
            attendance = attendance.len(),
            "Loaded snapshot"
        );
        Ok(Snapshot {
            employees,
            attendance,
        })
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let employees = serde_json::to_vec_pretty(&snapshot.employees)?;
        let attendance = serde_json::to_vec_pretty(&snapshot.attendance)?;

        self.storage
            .write_file(&self.employees_file, &employees)
            .await
            .map_err(|e| storage_unavailable(&self.employees_file, e))?;
        self.storage
            .write_file(&self.attendance_file, &attendance)
            .await
            .map_err(|e| storage_unavailable(&self.attendance_file, e))?;

        tracing::debug!(
            employees = snapshot.employees.len(),
            attendance = snapshot.attendance.len(),
            "Saved snapshot"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::LocalStorage;
    use crate::domain::model::EmployeeStatus;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_from_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonRepository::new(LocalStorage::new(temp_dir.path().to_str().unwrap()));

        let snapshot = repository.load().await.unwrap();
        assert!(snapshot.employees.is_empty());
        assert!(snapshot.attendance.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonRepository::new(LocalStorage::new(temp_dir.path().to_str().unwrap()));

        let mut snapshot = Snapshot::default();
        snapshot.employees.insert(
            "E001".to_string(),
            Employee {
                employee_id: "E001".to_string(),
                name: "Shamim".to_string(),
                department: "Operations".to_string(),
                role: "Associate".to_string(),
                join_date: "2024-01-15".to_string(),
                status: EmployeeStatus::Active,
            },
        );
        snapshot.attendance.push(AttendanceEntry::new(
            "E001",
            "2025-11-28",
            Some("09:02".to_string()),
            None,
        ));

        repository.save(&snapshot).await.unwrap();
        assert!(temp_dir.path().join(DEFAULT_EMPLOYEES_FILE).exists());

        let loaded = repository.load().await.unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_storage_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(DEFAULT_ATTENDANCE_FILE), b"{not json").unwrap();
        let repository = JsonRepository::new(LocalStorage::new(temp_dir.path().to_str().unwrap()));

        let err = repository.load().await.unwrap_err();
        assert!(matches!(err, AttendanceError::StorageUnavailable { .. }));
    }
}
