//! The attendance log: clock events, imported rows and per-employee queries.

use crate::core::time::compute_hours;
use crate::domain::model::AttendanceEntry;
use chrono::NaiveDate;
use std::cmp::Reverse;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

impl AttendanceEntry {
    pub fn new(
        employee_id: impl Into<String>,
        date: impl Into<String>,
        clock_in: Option<String>,
        clock_out: Option<String>,
    ) -> Self {
        let mut entry = Self {
            employee_id: employee_id.into(),
            date: date.into(),
            clock_in,
            clock_out,
            hours: None,
        };
        entry.recompute_hours();
        entry
    }

    pub fn recompute_hours(&mut self) {
        self.hours = compute_hours(self.clock_in.as_deref(), self.clock_out.as_deref());
    }

    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// Attendance entries for every employee.
///
/// Clock events upsert on (employee, date); imports append.
#[derive(Debug, Clone, Default)]
pub struct AttendanceStore {
    entries: Vec<AttendanceEntry>,
}

impl AttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored `hours` are never trusted; they are derived again from the clock times.
    pub fn from_entries(entries: Vec<AttendanceEntry>) -> Self {
        let mut store = Self::new();
        for mut entry in entries {
            entry.recompute_hours();
            store.entries.push(entry);
        }
        store
    }

    pub fn record_clock_in(&mut self, employee_id: &str, date: &str, time: &str) -> &AttendanceEntry {
        let time = time.trim().to_string();
        self.upsert_clock_event(employee_id, date, |entry| entry.clock_in = Some(time))
    }

    pub fn record_clock_out(&mut self, employee_id: &str, date: &str, time: &str) -> &AttendanceEntry {
        let time = time.trim().to_string();
        self.upsert_clock_event(employee_id, date, |entry| entry.clock_out = Some(time))
    }

    fn upsert_clock_event(
        &mut self,
        employee_id: &str,
        date: &str,
        apply: impl FnOnce(&mut AttendanceEntry),
    ) -> &AttendanceEntry {
        let idx = match self.position(employee_id, date) {
            Some(idx) => {
                tracing::debug!(employee_id, date, "Updating existing attendance entry");
                idx
            }
            None => {
                tracing::debug!(employee_id, date, "Creating attendance entry");
                self.entries
                    .push(AttendanceEntry::new(employee_id, date, None, None));
                self.entries.len() - 1
            }
        };

        let entry = &mut self.entries[idx];
        apply(entry);
        entry.recompute_hours();
        entry
    }

    /// Appends without looking for an existing entry on the same day.
    pub fn upsert_from_import(
        &mut self,
        employee_id: &str,
        date: &str,
        clock_in: Option<String>,
        clock_out: Option<String>,
    ) {
        self.entries
            .push(AttendanceEntry::new(employee_id, date, clock_in, clock_out));
    }

    /// Entries for one employee, newest date first. Unparseable dates go last.
    pub fn query(&self, employee_id: &str) -> Vec<&AttendanceEntry> {
        let mut rows: Vec<&AttendanceEntry> = self
            .entries
            .iter()
            .filter(|e| e.employee_id == employee_id)
            .collect();
        rows.sort_by_key(|e| Reverse(e.calendar_date()));
        rows
    }

    pub fn for_employee<'a>(&'a self, employee_id: &'a str) -> impl Iterator<Item = &'a AttendanceEntry> + 'a {
        self.entries.iter().filter(move |e| e.employee_id == employee_id)
    }

    pub fn entries(&self) -> &[AttendanceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, employee_id: &str, date: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.employee_id == employee_id && e.date == date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_in_then_out_same_day_is_one_entry() {
        let mut store = AttendanceStore::new();
        store.record_clock_in("E001", "2025-12-01", "09:00");
        let entry = store.record_clock_out("E001", "2025-12-01", "17:30").clone();

        assert_eq!(store.len(), 1);
        assert_eq!(entry.clock_in.as_deref(), Some("09:00"));
        assert_eq!(entry.clock_out.as_deref(), Some("17:30"));
        assert_eq!(entry.hours, Some(8.5));
    }

    #[test]
    fn test_clock_in_alone_has_no_hours() {
        let mut store = AttendanceStore::new();
        let entry = store.record_clock_in("E001", "2025-12-01", "09:00");
        assert_eq!(entry.clock_out, None);
        assert_eq!(entry.hours, None);
    }

    #[test]
    fn test_clock_out_without_clock_in_creates_entry() {
        let mut store = AttendanceStore::new();
        let entry = store.record_clock_out("E002", "2025-12-01", "18:00");
        assert_eq!(entry.clock_in, None);
        assert_eq!(entry.clock_out.as_deref(), Some("18:00"));
        assert_eq!(entry.hours, None);

        store.record_clock_in("E002", "2025-12-01", "10:00");
        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].hours, Some(8.0));
    }

    #[test]
    fn test_repeated_clock_in_overwrites() {
        let mut store = AttendanceStore::new();
        store.record_clock_out("E001", "2025-12-01", "17:00");
        store.record_clock_in("E001", "2025-12-01", "08:00");
        store.record_clock_in("E001", "2025-12-01", "09:00");
        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].hours, Some(8.0));
    }

    #[test]
    fn test_different_days_are_separate_entries() {
        let mut store = AttendanceStore::new();
        store.record_clock_in("E001", "2025-12-01", "09:00");
        store.record_clock_in("E001", "2025-12-02", "09:00");
        store.record_clock_in("E002", "2025-12-01", "09:00");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_import_appends_duplicates() {
        let mut store = AttendanceStore::new();
        store.record_clock_in("E001", "2025-12-01", "09:00");
        store.upsert_from_import("E001", "2025-12-01", Some("09:00".into()), Some("17:00".into()));
        store.upsert_from_import("E001", "2025-12-01", Some("09:00".into()), Some("17:00".into()));

        assert_eq!(store.len(), 3);
        assert_eq!(store.entries()[1].hours, Some(8.0));
    }

    #[test]
    fn test_loaded_entries_get_hours_rederived() {
        let mut stale = AttendanceEntry::new("E1", "2025-12-01", Some("09:00".into()), Some("17:00".into()));
        stale.hours = Some(99.0);
        let mut half = AttendanceEntry::new("E1", "2025-12-02", Some("09:00".into()), None);
        half.hours = Some(5.0);

        let store = AttendanceStore::from_entries(vec![stale, half]);
        assert_eq!(store.entries()[0].hours, Some(8.0));
        assert_eq!(store.entries()[1].hours, None);
    }

    #[test]
    fn test_query_orders_by_date_descending() {
        let mut store = AttendanceStore::new();
        store.upsert_from_import("E001", "2025-11-28", None, None);
        store.upsert_from_import("E001", "not-a-date", None, None);
        store.upsert_from_import("E001", "2025-11-30", None, None);
        store.upsert_from_import("E002", "2025-12-31", None, None);
        store.upsert_from_import("E001", "2025-11-29", None, None);

        let dates: Vec<&str> = store.query("E001").iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-11-30", "2025-11-29", "2025-11-28", "not-a-date"]);
    }
}
