use super::*;
use crate::error::AppError;
use crate::models::{DayType, LeaveStatus};
use crate::testing::{Fail, FakeBackend, date, leave_request};

fn valid_draft() -> LeaveDraft {
    LeaveDraft {
        leave_type_id: Some(1),
        start_date: Some(date(2025, 3, 10)),
        end_date: Some(date(2025, 3, 12)),
        reason: "Family trip".to_string(),
        ..Default::default()
    }
}

fn desk_with(requests: Vec<crate::models::LeaveRequest>) -> ApprovalDesk {
    ApprovalDesk::new(LeaveBook::new(requests))
}

#[test]
fn test_draft_requires_fields() {
    let errors = LeaveDraft::default().validate(date(2025, 3, 1)).unwrap_err();

    assert_eq!(errors.get(LeaveField::LeaveType), Some("Leave type is required"));
    assert_eq!(errors.get(LeaveField::StartDate), Some("Start date is required"));
    assert_eq!(errors.get(LeaveField::EndDate), Some("End date is required"));
    assert_eq!(errors.get(LeaveField::Reason), Some("Reason is required"));
    assert_eq!(errors.get(LeaveField::Document), None);
}

#[test]
fn test_whitespace_reason_is_missing() {
    let draft = LeaveDraft {
        reason: "   ".to_string(),
        ..valid_draft()
    };
    let errors = draft.validate(date(2025, 3, 1)).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.get(LeaveField::Reason).is_some());
}

#[test]
fn test_end_before_start() {
    let draft = LeaveDraft {
        end_date: Some(date(2025, 3, 9)),
        ..valid_draft()
    };
    let errors = draft.validate(date(2025, 3, 1)).unwrap_err();
    assert!(errors.get(LeaveField::EndDate).unwrap().contains("on or after"));
}

#[tokio::test]
async fn test_half_day_over_several_days_is_sent() {
    let backend = FakeBackend::new();
    let draft = LeaveDraft {
        day_type: DayType::Half,
        ..valid_draft()
    };

    let request = draft.validate(date(2025, 3, 10)).unwrap();
    assert_eq!(request.day_type, DayType::Half);
    assert_eq!(request.end_date, date(2025, 3, 12));

    submit(&backend, &draft, date(2025, 3, 10)).await.unwrap();
    assert_eq!(backend.call_count("submit_leave_request"), 1);
}

#[test]
fn test_start_date_relative_to_today() {
    let draft = valid_draft();

    let errors = draft.validate(date(2025, 3, 11)).unwrap_err();
    assert_eq!(errors.get(LeaveField::StartDate), Some("Start date cannot be in the past"));

    assert!(draft.validate(date(2025, 3, 10)).is_ok());
    assert!(draft.validate(date(2025, 3, 9)).is_ok());
}

#[test]
fn test_optional_fields_in_form() {
    let draft = LeaveDraft {
        description: "  ".to_string(),
        cover_up_employee_id: Some(8),
        ..valid_draft()
    };
    let request = draft.validate(date(2025, 3, 1)).unwrap();
    assert_eq!(request.description, None);

    let fields = request.form_fields();
    assert!(fields.contains(&("LeaveTypeID", "1".to_string())));
    assert!(fields.contains(&("StartDate", "2025-03-10".to_string())));
    assert!(fields.contains(&("EndDate", "2025-03-12".to_string())));
    assert!(fields.contains(&("CoverUpEMPID", "8".to_string())));
    assert!(!fields.iter().any(|(name, _)| *name == "Description"));
}

#[test]
fn test_bad_document_is_a_field_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("payload.exe");
    std::fs::write(&path, b"MZ").unwrap();

    let draft = LeaveDraft {
        document: Some(path),
        ..valid_draft()
    };
    let errors = draft.validate(date(2025, 3, 1)).unwrap_err();
    assert!(errors.get(LeaveField::Document).unwrap().contains(".exe"));
}

#[tokio::test]
async fn test_submit_before_start_date() {
    let backend = FakeBackend::new();

    let err = submit(&backend, &valid_draft(), date(2025, 3, 11)).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(backend.call_count("submit_leave_request"), 0);

    let created = submit(&backend, &valid_draft(), date(2025, 3, 10)).await.unwrap();
    assert_eq!(created.status, LeaveStatus::Pending);
    assert_eq!(backend.call_count("submit_leave_request"), 1);
}

#[tokio::test]
async fn test_submit_server_rejection() {
    let backend = FakeBackend::new();
    backend.fail("submit_leave_request", Fail::Status(422));

    let err = submit(&backend, &valid_draft(), date(2025, 3, 1)).await.unwrap_err();
    assert!(matches!(err, AppError::Rejected { status: 422, .. }));
}

#[tokio::test]
async fn test_reject_without_reason_skips_network() {
    let backend = FakeBackend::new().with_requests(vec![leave_request(1, LeaveStatus::Pending)]);
    let mut desk = desk_with(vec![leave_request(1, LeaveStatus::Pending)]);

    for reason in ["", "   "] {
        let err = desk
            .decide(&backend, 1, Decision::Reject { reason: reason.to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    assert!(backend.calls().is_empty());
    assert!(!desk.is_in_flight(1));
    assert_eq!(desk.book().get(1).unwrap().status, LeaveStatus::Pending);
}

#[tokio::test]
async fn test_approve_then_second_decision_refused() {
    let backend = FakeBackend::new().with_requests(vec![leave_request(1, LeaveStatus::Pending)]);
    let mut desk = desk_with(vec![leave_request(1, LeaveStatus::Pending)]);

    let approved = desk
        .decide(&backend, 1, Decision::Approve { reason: None })
        .await
        .unwrap();
    assert_eq!(approved.status, LeaveStatus::Approved);
    assert!(approved.decided_at.is_some());
    assert_eq!(desk.book().get(1).unwrap().status, LeaveStatus::Approved);

    let err = desk
        .decide(&backend, 1, Decision::Reject { reason: "Changed my mind".to_string() })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));
    assert_eq!(backend.call_count("reject_leave_request"), 0);
    assert_eq!(desk.book().get(1).unwrap().status, LeaveStatus::Approved);
}

#[tokio::test]
async fn test_older_team_list_does_not_undo_decision() {
    let backend = FakeBackend::new().with_requests(vec![leave_request(2, LeaveStatus::Pending)]);
    let mut desk = desk_with(vec![leave_request(2, LeaveStatus::Pending)]);

    desk.decide(&backend, 2, Decision::Approve { reason: None }).await.unwrap();
    // A team list fetched before the approval arrives afterwards.
    desk.replace_all(vec![leave_request(2, LeaveStatus::Pending), leave_request(3, LeaveStatus::Pending)]);

    assert_eq!(desk.book().get(2).unwrap().status, LeaveStatus::Approved);
    assert_eq!(desk.book().get(3).unwrap().status, LeaveStatus::Pending);
    let err = desk.prepare(2, Decision::Approve { reason: None }).unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));
}

#[tokio::test]
async fn test_reject_records_reason() {
    let backend = FakeBackend::new().with_requests(vec![leave_request(4, LeaveStatus::Pending)]);
    let mut desk = desk_with(vec![leave_request(4, LeaveStatus::Pending)]);

    let rejected = desk
        .decide(
            &backend,
            4,
            Decision::Reject {
                reason: " Team is short-staffed ".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(rejected.status, LeaveStatus::Rejected);
    assert_eq!(rejected.approval_reason.as_deref(), Some("Team is short-staffed"));
}

#[test]
fn test_concurrent_decision_refused_while_in_flight() {
    let mut desk = desk_with(vec![leave_request(2, LeaveStatus::Pending)]);

    let first = desk.prepare(2, Decision::Approve { reason: None }).unwrap();
    let err = desk
        .prepare(2, Decision::Reject { reason: "No".to_string() })
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));

    let mut approved = leave_request(2, LeaveStatus::Approved);
    approved.approval_reason = None;
    desk.finish(&first, Ok(approved)).unwrap();

    assert!(!desk.is_in_flight(2));
    assert_eq!(desk.book().pending_count(), 0);
}

#[tokio::test]
async fn test_failed_decision_keeps_prior_status() {
    let backend = FakeBackend::new().with_requests(vec![leave_request(3, LeaveStatus::Pending)]);
    let mut desk = desk_with(vec![leave_request(3, LeaveStatus::Pending)]);

    backend.fail("approve_leave_request", Fail::Network);
    let err = desk
        .decide(&backend, 3, Decision::Approve { reason: None })
        .await
        .unwrap_err();
    assert!(err.is_network());
    assert_eq!(desk.book().get(3).unwrap().status, LeaveStatus::Pending);
    assert!(!desk.is_in_flight(3));

    backend.clear_failures();
    let approved = desk
        .decide(&backend, 3, Decision::Approve { reason: None })
        .await
        .unwrap();
    assert_eq!(approved.status, LeaveStatus::Approved);
}

#[test]
fn test_unknown_request() {
    let mut desk = ApprovalDesk::default();
    let err = desk.prepare(99, Decision::Approve { reason: None }).unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[test]
fn test_book_orders_and_upserts() {
    let mut book = LeaveBook::new(vec![
        leave_request(1, LeaveStatus::Pending),
        leave_request(3, LeaveStatus::Rejected),
        leave_request(2, LeaveStatus::Pending),
    ]);
    let ids: Vec<_> = book.all().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
    assert_eq!(book.pending_count(), 2);

    book.upsert(leave_request(2, LeaveStatus::Approved));
    assert_eq!(book.len(), 3);
    assert_eq!(book.get(2).unwrap().status, LeaveStatus::Approved);

    book.upsert(leave_request(5, LeaveStatus::Pending));
    assert_eq!(book.all()[0].id, 5);
    assert_eq!(book.by_status(LeaveStatus::Pending).count(), 2);
}
