//! View-owned collection of leave requests.

use crate::models::{LeaveRequest, LeaveRequestId, LeaveStatus};

/// Leave requests as last reported by the server, newest first.
///
/// Entries only change through [`replace_all`](Self::replace_all) and
/// [`upsert`](Self::upsert), both fed from server responses.
#[derive(Debug, Clone, Default)]
pub struct LeaveBook {
    requests: Vec<LeaveRequest>,
}

impl LeaveBook {
    pub fn new(requests: Vec<LeaveRequest>) -> Self {
        let mut book = Self::default();
        book.replace_all(requests);
        book
    }

    pub fn replace_all(&mut self, mut requests: Vec<LeaveRequest>) {
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        self.requests = requests;
    }

    /// Merge one authoritative record by id.
    pub fn upsert(&mut self, request: LeaveRequest) {
        match self.requests.iter_mut().find(|r| r.id == request.id) {
            Some(existing) => *existing = request,
            None => {
                let pos = self
                    .requests
                    .iter()
                    .position(|r| r.created_at < request.created_at)
                    .unwrap_or(self.requests.len());
                self.requests.insert(pos, request);
            }
        }
    }

    pub fn get(&self, id: LeaveRequestId) -> Option<&LeaveRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    pub fn all(&self) -> &[LeaveRequest] {
        &self.requests
    }

    pub fn by_status(&self, status: LeaveStatus) -> impl Iterator<Item = &LeaveRequest> {
        self.requests.iter().filter(move |r| r.status == status)
    }

    pub fn pending_count(&self) -> usize {
        self.by_status(LeaveStatus::Pending).count()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
