//! Shared test utilities for the admin console.
//!
//! Provides a scripted [`Transport`] so client, list and form tests run without a
//! backend, plus sample records with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::api::{ApiRequest, ApiResponse, Transport, TransportError};
use crate::entities::{CrRecord, FacultyRecord, StudentRecord};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tracing_subscriber::EnvFilter;

pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")), // Default to TRACE for tests if RUST_LOG is not set
        )
        .with_test_writer()
        .try_init();
}

/// Transport that replays scripted responses in order and records every request.
#[derive(Debug, Default)]
pub struct FakeTransport {
    script: Mutex<VecDeque<Result<ApiResponse, String>>>,
    requests: Mutex<Vec<ApiRequest>>,
    hold: Mutex<Option<Arc<Notify>>>,
}

impl FakeTransport {
    /// Transport with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response with `status` and `body`.
    pub fn respond(&self, status: u16, body: Value) {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse {
                status,
                body: Some(body),
            }));
    }

    /// Queues a response whose body is not JSON, e.g. an HTML error page.
    pub fn respond_undecodable(&self, status: u16) {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse { status, body: None }));
    }

    /// Queues a network failure.
    pub fn fail(&self, message: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    /// Makes the next request wait, after being recorded, until the returned
    /// notifier fires.
    pub fn hold_next(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.hold.lock().unwrap() = Some(Arc::clone(&notify));
        notify
    }

    /// Every request sent so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests sent so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        let hold = self.hold.lock().unwrap().take();
        if let Some(notify) = hold {
            notify.notified().await;
        }

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(TransportError::Network(message)),
            None => Err(TransportError::Network("no scripted response".to_string())),
        }
    }
}

/// Creates a student with the given class and sensible defaults.
///
/// # Defaults
/// * `name`: "Student `<id>`"
/// * `section`: "A"
/// * `phone`, `email`: None
pub fn student(id: &str, year: &str, branch: &str) -> StudentRecord {
    StudentRecord {
        id: id.to_string(),
        name: format!("Student {id}"),
        year: year.to_string(),
        branch: branch.to_string(),
        section: Some("A".to_string()),
        phone: None,
        email: None,
    }
}

fn cr(id: &str, name: &str, year: &str, branch: &str, section: &str) -> CrRecord {
    CrRecord {
        id: id.to_string(),
        name: name.to_string(),
        year: year.to_string(),
        branch: branch.to_string(),
        section: Some(section.to_string()),
        phone: Some("9876543210".to_string()),
    }
}

/// Four CRs across years and branches, already in display codes.
pub fn sample_crs() -> Vec<CrRecord> {
    vec![
        cr("R210387", "Asha", "E1", "CSE", "A"),
        cr("R210512", "Ravi Kumar", "E2", "ECE", "B"),
        cr("R220101", "Meena", "E1", "ECE", "A"),
        cr("R200044", "Kiran", "E2", "CSE", "C"),
    ]
}

fn faculty(assignment_id: i64, id: &str, name: &str, subject_code: &str, department: &str) -> FacultyRecord {
    FacultyRecord {
        assignment_id,
        id: id.to_string(),
        name: name.to_string(),
        department: department.to_string(),
        subject_code: subject_code.to_string(),
        year: "E2".to_string(),
        section: "A".to_string(),
    }
}

/// Three faculty assignments with keys "1", "2" and "3".
pub fn sample_faculty() -> Vec<FacultyRecord> {
    vec![
        faculty(1, "F001", "Dr. Rao", "CS3101", "CSE"),
        faculty(2, "F002", "Dr. Lakshmi", "EC2201", "ECE"),
        faculty(3, "F003", "Prof. Naidu", "ME1105", "ME"),
    ]
}
