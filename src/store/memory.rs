// src/store/memory.rs
//
// In-memory `RecordStore` for handler tests. Records every call so tests
// can assert which lookups happened.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{at_most_one, Credentials, RecordStore, StoreError};
use crate::models::{Caller, Employee, Organization, Report};

#[derive(Default)]
pub struct MemoryStore {
    sessions: HashMap<String, String>,
    employees: Vec<Employee>,
    organizations: Vec<Organization>,
    reports: Vec<Report>,
    fail_reports: bool,
    calls: Mutex<Vec<&'static str>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `token` authenticates as `user_id`.
    pub fn with_session(mut self, token: &str, user_id: &str) -> Self {
        self.sessions.insert(token.to_string(), user_id.to_string());
        self
    }

    pub fn with_organization(mut self, id: &str, owner: &str) -> Self {
        self.organizations.push(Organization {
            id: id.to_string(),
            user_id: owner.to_string(),
        });
        self
    }

    pub fn with_employee(mut self, id: &str, organization_id: &str) -> Self {
        self.employees.push(Employee {
            id: id.to_string(),
            organization_id: organization_id.to_string(),
        });
        self
    }

    pub fn with_report(mut self, report: Report) -> Self {
        self.reports.push(report);
        self
    }

    pub fn failing_reports(mut self) -> Self {
        self.fail_reports = true;
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn resolve_caller(&self, credentials: &Credentials) -> Result<Option<Caller>, StoreError> {
        self.record("resolve_caller");
        Ok(self
            .sessions
            .get(&credentials.access_token)
            .map(|id| Caller { id: id.clone() }))
    }

    async fn find_employee(
        &self,
        _credentials: &Credentials,
        employee_id: &str,
    ) -> Result<Option<Employee>, StoreError> {
        self.record("find_employee");
        let rows = self
            .employees
            .iter()
            .filter(|e| e.id == employee_id)
            .cloned()
            .collect();
        at_most_one(rows, "employees")
    }

    async fn find_organization_by_owner(
        &self,
        _credentials: &Credentials,
        owner_id: &str,
    ) -> Result<Option<Organization>, StoreError> {
        self.record("find_organization_by_owner");
        let rows = self
            .organizations
            .iter()
            .filter(|o| o.user_id == owner_id)
            .cloned()
            .collect();
        at_most_one(rows, "organization")
    }

    async fn list_reports_by_employee(
        &self,
        _credentials: &Credentials,
        employee_id: &str,
    ) -> Result<Vec<Report>, StoreError> {
        self.record("list_reports_by_employee");
        if self.fail_reports {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut rows: Vec<Report> = self
            .reports
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect();
        // month descending, nulls first like Postgres `ORDER BY month DESC`
        rows.sort_by(|a, b| match (&a.month, &b.month) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => y.cmp(x),
        });
        Ok(rows)
    }
}
