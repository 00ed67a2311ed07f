//! Hours worked per employee, over all time or an inclusive date range.

use crate::core::attendance::AttendanceStore;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HoursSummary {
    pub all_time: f64,
    pub in_range: Option<f64>,
}

/// Read-only hours queries over an [`AttendanceStore`].
pub struct Aggregator<'a> {
    store: &'a AttendanceStore,
}

impl<'a> Aggregator<'a> {
    pub fn new(store: &'a AttendanceStore) -> Self {
        Self { store }
    }

    /// Sum of known hours. Entries without hours are ignored.
    pub fn total_hours(&self, employee_id: &str) -> f64 {
        self.store
            .for_employee(employee_id)
            .filter_map(|e| e.hours)
            .fold(0.0, |acc, h| acc + h)
    }

    /// Sum of known hours for dates in `[from, to]`; `None` unless both bounds are given.
    pub fn total_hours_in_range(
        &self,
        employee_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Option<f64> {
        let (from, to) = (from?, to?);
        let total = self
            .store
            .for_employee(employee_id)
            .filter(|e| matches!(e.calendar_date(), Some(d) if d >= from && d <= to))
            .filter_map(|e| e.hours)
            .fold(0.0, |acc, h| acc + h);
        Some(total)
    }

    pub fn summary(
        &self,
        employee_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> HoursSummary {
        HoursSummary {
            all_time: self.total_hours(employee_id),
            in_range: self.total_hours_in_range(employee_id, from, to),
        }
    }
}
