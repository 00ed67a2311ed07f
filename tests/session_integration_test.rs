use attendance_etl::{EmployeeStatus, JsonRepository, LocalStorage, Session};
use attendance_etl::Employee;
use tempfile::TempDir;

fn repository(dir: &TempDir) -> JsonRepository<LocalStorage> {
    JsonRepository::new(LocalStorage::new(dir.path().to_str().unwrap()))
}

#[tokio::test]
async fn test_first_start_seeds_and_persists_on_mutation() {
    let temp_dir = TempDir::new().unwrap();
    let mut session = Session::open(repository(&temp_dir), true).await;

    let ids: Vec<&str> = session
        .directory()
        .list()
        .iter()
        .map(|e| e.employee_id.as_str())
        .collect();
    assert_eq!(ids, vec!["E001", "E002", "E003"]);
    assert_eq!(session.directory().get("E003").unwrap().status, EmployeeStatus::Inactive);

    // Seed data is only written once something changes.
    assert!(!temp_dir.path().join("employees.json").exists());
    session.clock_in("E002", "2025-12-01", "10:00").await.unwrap();
    assert!(temp_dir.path().join("employees.json").exists());
    assert!(temp_dir.path().join("attendance.json").exists());
}

#[tokio::test]
async fn test_seeded_hours_match_known_values() {
    let temp_dir = TempDir::new().unwrap();
    let session = Session::open(repository(&temp_dir), true).await;
    let aggregator = session.aggregator();

    assert!((aggregator.total_hours("E001") - (9.05 + 8.5)).abs() < 1e-9);
    assert_eq!(aggregator.total_hours("E003"), 7.63);

    let latest = session.attendance().query("E001");
    assert_eq!(latest[0].date, "2025-11-29");
    assert_eq!(latest[1].date, "2025-11-28");
}

#[tokio::test]
async fn test_clock_events_survive_restart() {
    let temp_dir = TempDir::new().unwrap();
    {
        let mut session = Session::open(repository(&temp_dir), false).await;
        session.clock_in("E010", "2025-12-02", "21:30").await.unwrap();
        session.clock_out("E010", "2025-12-02", "05:45").await.unwrap();
    }

    let session = Session::open(repository(&temp_dir), false).await;
    let entries = session.attendance().query("E010");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].clock_in.as_deref(), Some("21:30"));
    assert_eq!(entries[0].clock_out.as_deref(), Some("05:45"));
    assert_eq!(entries[0].hours, Some(8.25));
}

#[tokio::test]
async fn test_manual_employee_upsert_overwrites() {
    let temp_dir = TempDir::new().unwrap();
    let mut session = Session::open(repository(&temp_dir), true).await;

    session
        .upsert_employee(Employee {
            employee_id: "E002".to_string(),
            name: "Rafi Islam".to_string(),
            department: String::new(),
            role: "Manager".to_string(),
            join_date: "2023-09-10".to_string(),
            status: EmployeeStatus::Inactive,
        })
        .await
        .unwrap();

    let reopened = Session::open(repository(&temp_dir), true).await;
    let rafi = reopened.directory().get("E002").unwrap();
    assert_eq!(rafi.name, "Rafi Islam");
    assert_eq!(rafi.department, "");
    assert_eq!(reopened.directory().len(), 3);
}

#[tokio::test]
async fn test_corrupt_store_starts_empty() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("employees.json"), b"not json").unwrap();

    let session = Session::open(repository(&temp_dir), false).await;
    assert!(session.directory().is_empty());
    assert!(session.attendance().is_empty());
}

#[tokio::test]
async fn test_stored_hours_are_rederived_on_load() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("attendance.json"),
        br#"[
            {"employee_id": "E1", "date": "2025-12-01", "clock_in": "09:00", "clock_out": "17:00", "hours": 99.0},
            {"employee_id": "E1", "date": "2025-12-02", "clock_in": "09:00", "clock_out": null, "hours": 5.0}
        ]"#,
    )
    .unwrap();

    let session = Session::open(repository(&temp_dir), false).await;

    assert_eq!(session.aggregator().total_hours("E1"), 8.0);
    let entries = session.attendance().query("E1");
    assert_eq!(entries[0].date, "2025-12-02");
    assert_eq!(entries[0].hours, None);
    assert_eq!(entries[1].hours, Some(8.0));
}
