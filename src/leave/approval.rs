//! Manager-side approve / reject flow.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use super::book::LeaveBook;
use crate::api::HrBackend;
use crate::error::{AppError, Result};
use crate::models::{DecisionPayload, LeaveRequest, LeaveRequestId, LeaveStatus};

/// What the manager decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Approve { reason: Option<String> },
    Reject { reason: String },
}

impl Decision {
    pub fn target(&self) -> LeaveStatus {
        match self {
            Self::Approve { .. } => LeaveStatus::Approved,
            Self::Reject { .. } => LeaveStatus::Rejected,
        }
    }

    fn payload(&self) -> DecisionPayload {
        let reason = match self {
            Self::Approve { reason } => reason.as_deref(),
            Self::Reject { reason } => Some(reason.as_str()),
        };
        DecisionPayload {
            reason: reason.map(str::trim).filter(|r| !r.is_empty()).map(str::to_string),
        }
    }
}

/// A decision that passed local checks and is now in flight.
#[derive(Debug, Clone)]
pub struct PreparedDecision {
    pub id: LeaveRequestId,
    pub decision: Decision,
    payload: DecisionPayload,
}

impl PreparedDecision {
    /// Send the decision. Does not touch any local state.
    pub async fn execute(&self, backend: &dyn HrBackend) -> Result<LeaveRequest> {
        match self.decision {
            Decision::Approve { .. } => backend.approve_leave_request(self.id, &self.payload).await,
            Decision::Reject { .. } => backend.reject_leave_request(self.id, &self.payload).await,
        }
    }
}

/// Leave requests shown on the approvals screen plus the decisions in flight.
#[derive(Debug, Default)]
pub struct ApprovalDesk {
    book: LeaveBook,
    in_flight: HashSet<LeaveRequestId>,
    /// Records this desk saw decided, kept so an older list cannot undo them.
    decided: HashMap<LeaveRequestId, LeaveRequest>,
}

impl ApprovalDesk {
    pub fn new(book: LeaveBook) -> Self {
        Self {
            book,
            in_flight: HashSet::new(),
            decided: HashMap::new(),
        }
    }

    pub fn book(&self) -> &LeaveBook {
        &self.book
    }

    /// Replace the list after a refetch. Decisions still in flight stay marked.
    ///
    /// A request this desk already saw decided keeps its decided record when
    /// the list still reports it as pending: that list was read before the
    /// decision landed.
    pub fn replace_all(&mut self, requests: Vec<LeaveRequest>) {
        let requests = requests
            .into_iter()
            .map(|request| match self.decided.get(&request.id) {
                Some(decided) if !request.status.is_terminal() => {
                    debug!("Keeping decided status for leave request {}", request.id);
                    decided.clone()
                }
                _ => request,
            })
            .collect();
        self.book.replace_all(requests);
    }

    pub fn is_in_flight(&self, id: LeaveRequestId) -> bool {
        self.in_flight.contains(&id)
    }

    /// Check a decision locally and mark the request busy.
    ///
    /// The reject-reason rule is checked first so an empty reason never
    /// reaches the network, whatever else is wrong.
    pub fn prepare(&mut self, id: LeaveRequestId, decision: Decision) -> Result<PreparedDecision> {
        if matches!(&decision, Decision::Reject { reason } if reason.trim().is_empty()) {
            return Err(AppError::validation("A reason is required to reject a leave request"));
        }

        let request = self.book.get(id).ok_or(AppError::NotFound)?;
        if self.in_flight.contains(&id) {
            return Err(AppError::invalid_transition("A decision for this request is already being processed"));
        }
        let target = decision.target();
        if !request.status.can_transition_to(target) {
            return Err(AppError::invalid_transition(format!(
                "This request is already {}",
                request.status.label().to_lowercase()
            )));
        }

        self.in_flight.insert(id);
        let payload = decision.payload();
        Ok(PreparedDecision { id, decision, payload })
    }

    /// Apply the server's answer. On failure the previous status stays.
    pub fn finish(&mut self, prepared: &PreparedDecision, result: Result<LeaveRequest>) -> Result<LeaveRequest> {
        self.in_flight.remove(&prepared.id);
        match result {
            Ok(updated) => {
                info!("Leave request {} is now {}", updated.id, updated.status.label());
                self.book.upsert(updated.clone());
                if updated.status.is_terminal() {
                    self.decided.insert(updated.id, updated.clone());
                }
                Ok(updated)
            }
            Err(e) => {
                warn!("Decision on leave request {} failed: {e}", prepared.id);
                Err(e)
            }
        }
    }

    /// Prepare, send and apply in one go.
    pub async fn decide(
        &mut self,
        backend: &dyn HrBackend,
        id: LeaveRequestId,
        decision: Decision,
    ) -> Result<LeaveRequest> {
        let prepared = self.prepare(id, decision)?;
        let result = prepared.execute(backend).await;
        self.finish(&prepared, result)
    }
}
