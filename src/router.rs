//! Role-based navigation.
//!
//! Every route names the roles allowed to stay on it. The guard runs once per
//! navigation and again whenever the session changes.

use std::fmt::Display;

use tracing::{debug, info};

use crate::models::Role;

/// The three disjoint view surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Admin,
    ReportingManager,
    Employee,
}

impl Surface {
    pub fn home(&self) -> Route {
        match self {
            Self::Admin => Route::Dashboard,
            Self::ReportingManager => Route::ManagerHome,
            Self::Employee => Route::EmployeeHome,
        }
    }
}

impl Role {
    pub fn surface(&self) -> Surface {
        match self {
            Role::Admin | Role::Hr => Surface::Admin,
            Role::Rm => Surface::ReportingManager,
            Role::Employee => Surface::Employee,
        }
    }

    pub fn home(&self) -> Route {
        self.surface().home()
    }
}

const ADMIN_ROLES: &[Role] = &[Role::Admin, Role::Hr];
const RM_ROLES: &[Role] = &[Role::Rm];
const EMPLOYEE_ROLES: &[Role] = &[Role::Employee];
const ALL_ROLES: &[Role] = &[Role::Admin, Role::Hr, Role::Rm, Role::Employee];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Login,
    Dashboard,
    Employees,
    LeaveTypes,
    Holidays,
    LeaveRequests,
    EmployeeHome,
    EmployeeLeave,
    EmployeeAttendance,
    ManagerHome,
    ManagerApprovals,
    ManagerLeave,
    Notifications,
}

impl Route {
    pub fn from_path(path: &str) -> Option<Self> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        let route = match path {
            "/" | "/login" => Self::Login,
            "/dashboard" => Self::Dashboard,
            "/employees" => Self::Employees,
            "/leave-types" => Self::LeaveTypes,
            "/holidays" => Self::Holidays,
            "/leave-requests" => Self::LeaveRequests,
            "/employee" => Self::EmployeeHome,
            "/employee/leave" => Self::EmployeeLeave,
            "/employee/attendance" => Self::EmployeeAttendance,
            "/employeerm" => Self::ManagerHome,
            "/employeerm/approvals" => Self::ManagerApprovals,
            "/employeerm/leave" => Self::ManagerLeave,
            "/notifications" => Self::Notifications,
            _ => return None,
        };
        Some(route)
    }

    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Dashboard => "/dashboard",
            Self::Employees => "/employees",
            Self::LeaveTypes => "/leave-types",
            Self::Holidays => "/holidays",
            Self::LeaveRequests => "/leave-requests",
            Self::EmployeeHome => "/employee",
            Self::EmployeeLeave => "/employee/leave",
            Self::EmployeeAttendance => "/employee/attendance",
            Self::ManagerHome => "/employeerm",
            Self::ManagerApprovals => "/employeerm/approvals",
            Self::ManagerLeave => "/employeerm/leave",
            Self::Notifications => "/notifications",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Dashboard => "Dashboard",
            Self::Employees => "Employees",
            Self::LeaveTypes => "Leave Types",
            Self::Holidays => "Holidays",
            Self::LeaveRequests => "Leave Requests",
            Self::EmployeeHome | Self::ManagerHome => "Home",
            Self::EmployeeLeave | Self::ManagerLeave => "Apply for Leave",
            Self::EmployeeAttendance => "Attendance",
            Self::ManagerApprovals => "Approvals",
            Self::Notifications => "Notifications",
        }
    }

    /// `None` for the login page, which only unauthenticated actors keep.
    pub fn guard(&self) -> Option<RouteGuard> {
        let allowed = match self {
            Self::Login => return None,
            Self::Dashboard | Self::Employees | Self::LeaveTypes | Self::Holidays | Self::LeaveRequests => {
                ADMIN_ROLES
            }
            Self::EmployeeHome | Self::EmployeeLeave | Self::EmployeeAttendance => EMPLOYEE_ROLES,
            Self::ManagerHome | Self::ManagerApprovals | Self::ManagerLeave => RM_ROLES,
            Self::Notifications => ALL_ROLES,
        };
        Some(RouteGuard::new(allowed))
    }

    /// Where an actor with `role` should end up when asking for this route.
    pub fn evaluate(&self, role: Option<Role>) -> GuardDecision {
        match self.guard() {
            Some(guard) => guard.evaluate(role),
            None => match role {
                Some(role) => GuardDecision::Redirect(role.home()),
                None => GuardDecision::Allow,
            },
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
}

/// Allowed-role set for a protected route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteGuard {
    allowed: &'static [Role],
}

impl RouteGuard {
    pub const fn new(allowed: &'static [Role]) -> Self {
        Self { allowed }
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }

    pub fn evaluate(&self, role: Option<Role>) -> GuardDecision {
        match role {
            None => GuardDecision::Redirect(Route::Login),
            Some(role) if self.allows(role) => GuardDecision::Allow,
            Some(role) => GuardDecision::Redirect(role.home()),
        }
    }
}

const MAX_HISTORY: usize = 16;

/// Current route plus a short back-stack.
#[derive(Debug, Default)]
pub struct Router {
    current: Route,
    history: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Route {
        self.current
    }

    /// Go to `target`, or wherever its guard sends `role`.
    ///
    /// Returns the route actually landed on.
    pub fn navigate(&mut self, target: Route, role: Option<Role>) -> Route {
        let landed = match target.evaluate(role) {
            GuardDecision::Allow => target,
            GuardDecision::Redirect(to) => {
                debug!("Guard redirected {target} to {to}");
                to
            }
        };
        if landed != self.current {
            self.history.push(self.current);
            if self.history.len() > MAX_HISTORY {
                self.history.remove(0);
            }
            self.current = landed;
        }
        landed
    }

    /// Re-run the current route's guard after a session change.
    ///
    /// Returns the new route when the actor had to leave.
    pub fn revalidate(&mut self, role: Option<Role>) -> Option<Route> {
        match self.current.evaluate(role) {
            GuardDecision::Allow => None,
            GuardDecision::Redirect(to) => {
                info!("Session changed, leaving {} for {to}", self.current);
                if role.is_none() {
                    self.history.clear();
                }
                self.current = to;
                Some(to)
            }
        }
    }

    /// Step back to the previous route the actor may still see.
    pub fn back(&mut self, role: Option<Role>) -> Route {
        while let Some(prev) = self.history.pop() {
            if prev.evaluate(role) == GuardDecision::Allow {
                self.current = prev;
                return prev;
            }
        }
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_roundtrip() {
        let routes = [
            Route::Login,
            Route::Dashboard,
            Route::Employees,
            Route::LeaveTypes,
            Route::Holidays,
            Route::LeaveRequests,
            Route::EmployeeHome,
            Route::EmployeeLeave,
            Route::EmployeeAttendance,
            Route::ManagerHome,
            Route::ManagerApprovals,
            Route::ManagerLeave,
            Route::Notifications,
        ];
        for route in routes {
            assert_eq!(Route::from_path(route.to_path()), Some(route));
        }
        assert_eq!(Route::from_path("/employeerm/"), Some(Route::ManagerHome));
        assert_eq!(Route::from_path("/nope"), None);
    }

    #[test]
    fn test_rm_visiting_employee_surface_is_redirected() {
        let mut router = Router::new();
        let target = Route::from_path("/employee").unwrap();
        let landed = router.navigate(target, Some(Role::Rm));
        assert_eq!(landed, Route::ManagerHome);
        assert_eq!(router.current().to_path(), "/employeerm");
    }

    #[test]
    fn test_surfaces_are_disjoint() {
        assert_eq!(Route::Dashboard.evaluate(Some(Role::Hr)), GuardDecision::Allow);
        assert_eq!(Route::Dashboard.evaluate(Some(Role::Admin)), GuardDecision::Allow);
        assert_eq!(
            Route::Dashboard.evaluate(Some(Role::Employee)),
            GuardDecision::Redirect(Route::EmployeeHome)
        );
        assert_eq!(
            Route::ManagerApprovals.evaluate(Some(Role::Admin)),
            GuardDecision::Redirect(Route::Dashboard)
        );
        assert_eq!(
            Route::EmployeeLeave.evaluate(Some(Role::Rm)),
            GuardDecision::Redirect(Route::ManagerHome)
        );
    }

    #[test]
    fn test_unauthenticated_goes_to_login() {
        for route in [Route::Dashboard, Route::EmployeeHome, Route::ManagerHome, Route::Notifications] {
            assert_eq!(route.evaluate(None), GuardDecision::Redirect(Route::Login));
        }
        assert_eq!(Route::Login.evaluate(None), GuardDecision::Allow);
    }

    #[test]
    fn test_login_redirects_authenticated_home() {
        assert_eq!(
            Route::Login.evaluate(Some(Role::Employee)),
            GuardDecision::Redirect(Route::EmployeeHome)
        );
        assert_eq!(Route::Notifications.evaluate(Some(Role::Rm)), GuardDecision::Allow);
    }

    #[test]
    fn test_revalidate_after_logout() {
        let mut router = Router::new();
        router.navigate(Route::Employees, Some(Role::Admin));
        assert_eq!(router.current(), Route::Employees);

        assert_eq!(router.revalidate(Some(Role::Admin)), None);
        assert_eq!(router.revalidate(None), Some(Route::Login));
        assert_eq!(router.current(), Route::Login);
        // Logging out forgets where the previous actor had been.
        assert_eq!(router.back(Some(Role::Admin)), Route::Login);
    }

    #[test]
    fn test_back_skips_forbidden_routes() {
        let mut router = Router::new();
        router.navigate(Route::EmployeeHome, Some(Role::Employee));
        router.navigate(Route::EmployeeLeave, Some(Role::Employee));
        assert_eq!(router.back(Some(Role::Employee)), Route::EmployeeHome);
        // Login sits at the bottom of the stack and is refused once logged in.
        assert_eq!(router.back(Some(Role::Employee)), Route::EmployeeHome);
    }

    #[test]
    fn test_back_returns_to_previous_view() {
        let mut router = Router::new();
        router.navigate(Route::Dashboard, Some(Role::Hr));
        router.navigate(Route::Employees, Some(Role::Hr));
        router.navigate(Route::Notifications, Some(Role::Hr));

        assert_eq!(router.back(Some(Role::Hr)), Route::Employees);
        assert_eq!(router.back(Some(Role::Hr)), Route::Dashboard);
        assert_eq!(router.current(), Route::Dashboard);
    }
}
