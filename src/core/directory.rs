use crate::domain::model::Employee;
use std::collections::BTreeMap;

/// Employee profiles keyed by `employee_id`.
#[derive(Debug, Clone, Default)]
pub struct EmployeeDirectory {
    employees: BTreeMap<String, Employee>,
}

impl EmployeeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(employees: BTreeMap<String, Employee>) -> Self {
        Self { employees }
    }

    /// Inserts or fully replaces the profile with the same id.
    pub fn upsert(&mut self, employee: Employee) -> Option<Employee> {
        self.employees.insert(employee.employee_id.clone(), employee)
    }

    pub fn get(&self, employee_id: &str) -> Option<&Employee> {
        self.employees.get(employee_id)
    }

    /// All profiles, ascending by `employee_id`.
    pub fn list(&self) -> Vec<&Employee> {
        self.employees.values().collect()
    }

    pub fn as_map(&self) -> &BTreeMap<String, Employee> {
        &self.employees
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}
