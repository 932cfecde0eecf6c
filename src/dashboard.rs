//! Dashboard loaders.
//!
//! Each loader fires its queries together and keeps whatever succeeds. A
//! failed query is logged, its slot falls back to an empty default and its
//! name is listed in `failed`.

use tracing::warn;

use crate::api::{HrBackend, LeaveScope};
use crate::error::Result;
use crate::models::{AttendanceRecord, LeaveRequest, LeaveStats, LeaveStatus, OverviewStats};

fn settle<T: Default>(query: &'static str, result: Result<T>, failed: &mut Vec<&'static str>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!("Dashboard query '{query}' failed: {e}");
            failed.push(query);
            T::default()
        }
    }
}

/// Admin and HR overview.
#[derive(Debug, Clone, Default)]
pub struct Overview {
    pub stats: OverviewStats,
    pub today_attendance: Vec<AttendanceRecord>,
    pub today_leave: Vec<LeaveRequest>,
    pub recent_requests: Vec<LeaveRequest>,
    pub failed: Vec<&'static str>,
}

impl Overview {
    pub async fn load(backend: &dyn HrBackend, recent: u32) -> Self {
        let (stats, attendance, today_leave, recent_requests) = tokio::join!(
            backend.overview_stats(),
            backend.today_attendance(),
            backend.list_leave_requests(LeaveScope::Today),
            backend.list_leave_requests(LeaveScope::Last(recent)),
        );

        let mut failed = Vec::new();
        Self {
            stats: settle("overview stats", stats, &mut failed),
            today_attendance: settle("today's attendance", attendance, &mut failed),
            today_leave: settle("today's leave", today_leave, &mut failed),
            recent_requests: settle("recent requests", recent_requests, &mut failed),
            failed,
        }
    }

    pub fn is_partial(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Employee home.
#[derive(Debug, Clone, Default)]
pub struct EmployeeDashboard {
    pub stats: LeaveStats,
    pub history: Vec<AttendanceRecord>,
    pub today: Vec<AttendanceRecord>,
    pub recent_requests: Vec<LeaveRequest>,
    pub failed: Vec<&'static str>,
}

impl EmployeeDashboard {
    pub async fn load(backend: &dyn HrBackend, recent: u32) -> Self {
        let (stats, history, today, mine) = tokio::join!(
            backend.leave_stats(),
            backend.attendance_history(),
            backend.today_attendance(),
            backend.list_leave_requests(LeaveScope::Mine),
        );

        let mut failed = Vec::new();
        let mut recent_requests = settle("my requests", mine, &mut failed);
        recent_requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent_requests.truncate(recent as usize);

        Self {
            stats: settle("leave balance", stats, &mut failed),
            history: settle("attendance history", history, &mut failed),
            today: settle("today's attendance", today, &mut failed),
            recent_requests,
            failed,
        }
    }

    /// Today's record if the actor has checked in and not yet out.
    pub fn open_attendance(&self) -> Option<&AttendanceRecord> {
        self.today.iter().find(|r| r.is_open())
    }

    pub fn is_partial(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Reporting manager home: their own dashboard plus the team queue.
#[derive(Debug, Clone, Default)]
pub struct ManagerDashboard {
    pub own: EmployeeDashboard,
    pub team_pending: Vec<LeaveRequest>,
    pub failed: Vec<&'static str>,
}

impl ManagerDashboard {
    pub async fn load(backend: &dyn HrBackend, recent: u32) -> Self {
        let (own, team) = tokio::join!(
            EmployeeDashboard::load(backend, recent),
            backend.list_leave_requests(LeaveScope::Team),
        );

        let mut failed = own.failed.clone();
        let team_pending = settle("team requests", team, &mut failed)
            .into_iter()
            .filter(|r| r.status == LeaveStatus::Pending)
            .collect();

        Self { own, team_pending, failed }
    }

    pub fn is_partial(&self) -> bool {
        !self.failed.is_empty()
    }
}
