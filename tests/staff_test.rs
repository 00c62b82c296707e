use medidesk::db;
use medidesk::domain::DomainError;
use medidesk::infrastructure::AppState;
use medidesk::models::leave::{LeaveDto, LeaveType};
use medidesk::models::{BranchInput, StaffInput};
use medidesk::services::leave_service::{self, LeaveAction, LeaveFilter};
use medidesk::services::notification_service::{self, RecipientFilter, RecipientType};
use medidesk::services::staff_service::{
    self, OvertimeAction, OvertimeInput, SalaryFilter, SalaryRequest,
};

const WORKING_DAYS: u32 = 30;

async fn setup_test_state() -> AppState {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    AppState::new(db)
}

async fn create_test_staff(state: &AppState) -> i32 {
    let branch = state
        .branch_repo
        .create(BranchInput {
            name: "Central".into(),
            address: None,
            phone: None,
            email: None,
        })
        .await
        .unwrap();

    staff_service::create_staff(
        state.db(),
        StaffInput {
            branch_id: branch.id,
            name: "Nimali Silva".into(),
            designation: Some("Nurse".into()),
            email: None,
            phone: None,
            basic_salary: 3000.0,
            ot_rate: 20.0,
        },
    )
    .await
    .unwrap()
    .id
}

fn leave(staff_id: i32, leave_type: LeaveType, start: &str, end: &str) -> LeaveDto {
    LeaveDto {
        staff_id,
        leave_type,
        start_date: start.to_string(),
        end_date: end.to_string(),
        reason: Some("Family matters".into()),
    }
}

fn staff_inbox(staff_id: i32) -> RecipientFilter {
    RecipientFilter {
        recipient_type: RecipientType::Staff,
        recipient_id: Some(staff_id),
    }
}

#[tokio::test]
async fn test_apply_leave_counts_days_and_rejects_overlap() {
    let state = setup_test_state().await;
    let staff_id = create_test_staff(&state).await;
    let db = state.db();

    let applied = leave_service::apply_leave(
        db,
        leave(staff_id, LeaveType::Annual, "2026-03-10", "2026-03-12"),
    )
    .await
    .unwrap();
    assert_eq!(applied.status, "pending");
    assert_eq!(applied.days, 3);
    assert_eq!(applied.leave_type, "annual");

    let err = leave_service::apply_leave(
        db,
        leave(staff_id, LeaveType::Sick, "2026-03-12", "2026-03-14"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    let err = leave_service::apply_leave(
        db,
        leave(staff_id, LeaveType::Sick, "2026-03-20", "2026-03-18"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = leave_service::apply_leave(
        db,
        leave(999, LeaveType::Sick, "2026-03-20", "2026-03-21"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));

    // A cancelled request no longer blocks the period
    leave_service::cancel_leave(db, applied.id).await.unwrap();
    leave_service::apply_leave(
        db,
        leave(staff_id, LeaveType::Sick, "2026-03-11", "2026-03-11"),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_manager_decides_pending_only() {
    let state = setup_test_state().await;
    let staff_id = create_test_staff(&state).await;
    let db = state.db();

    let applied = leave_service::apply_leave(
        db,
        leave(staff_id, LeaveType::Casual, "2026-05-04", "2026-05-05"),
    )
    .await
    .unwrap();

    let approved = leave_service::manage_leave(
        db,
        applied.id,
        LeaveAction::Approve,
        Some("Enjoy".into()),
    )
    .await
    .unwrap();
    assert_eq!(approved.status, "approved");
    assert_eq!(approved.manager_comment.as_deref(), Some("Enjoy"));
    assert!(approved.decided_at.is_some());

    let err = leave_service::manage_leave(db, applied.id, LeaveAction::Reject, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidState(_)));

    let err = leave_service::cancel_leave(db, applied.id).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidState(_)));

    let err = leave_service::manage_leave(db, 999, LeaveAction::Approve, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn test_admin_overturns_manager_decision() {
    let state = setup_test_state().await;
    let staff_id = create_test_staff(&state).await;
    let db = state.db();

    let applied = leave_service::apply_leave(
        db,
        leave(staff_id, LeaveType::Sick, "2026-06-01", "2026-06-03"),
    )
    .await
    .unwrap();

    leave_service::manage_leave(db, applied.id, LeaveAction::Reject, Some("Short staffed".into()))
        .await
        .unwrap();
    let overturned = leave_service::admin_manage_leave(
        db,
        applied.id,
        LeaveAction::Approve,
        Some("Medical certificate provided".into()),
    )
    .await
    .unwrap();
    assert_eq!(overturned.status, "approved");
    assert_eq!(overturned.manager_comment.as_deref(), Some("Short staffed"));
    assert_eq!(
        overturned.admin_comment.as_deref(),
        Some("Medical certificate provided")
    );

    // One notification per decision
    let inbox = notification_service::list_notifications(db, staff_inbox(staff_id), false)
        .await
        .unwrap();
    assert_eq!(inbox.len(), 2);
    assert!(inbox.iter().all(|n| n.kind == "leave_decision"));

    let approved = leave_service::list_leaves(
        db,
        LeaveFilter {
            staff_id: Some(staff_id),
            status: Some("approved".into()),
        },
    )
    .await
    .unwrap();
    assert_eq!(approved.len(), 1);
}

#[tokio::test]
async fn test_admin_cannot_decide_cancelled_leave() {
    let state = setup_test_state().await;
    let staff_id = create_test_staff(&state).await;
    let db = state.db();

    let applied = leave_service::apply_leave(
        db,
        leave(staff_id, LeaveType::Casual, "2026-07-01", "2026-07-01"),
    )
    .await
    .unwrap();
    let cancelled = leave_service::cancel_leave(db, applied.id).await.unwrap();
    assert_eq!(cancelled.status, "cancelled");

    let err = leave_service::admin_manage_leave(db, applied.id, LeaveAction::Approve, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidState(_)));
}

#[tokio::test]
async fn test_overtime_is_decided_once() {
    let state = setup_test_state().await;
    let staff_id = create_test_staff(&state).await;
    let db = state.db();

    let err = staff_service::record_overtime(
        db,
        OvertimeInput {
            staff_id,
            work_date: "2026-03-03".into(),
            hours: 0.0,
            reason: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let record = staff_service::record_overtime(
        db,
        OvertimeInput {
            staff_id,
            work_date: "2026-03-03".into(),
            hours: 3.0,
            reason: Some("Night shift cover".into()),
        },
    )
    .await
    .unwrap();
    assert_eq!(record.status, "pending");

    let approved = staff_service::decide_overtime(db, record.id, OvertimeAction::Approve)
        .await
        .unwrap();
    assert_eq!(approved.status, "approved");

    let err = staff_service::decide_overtime(db, record.id, OvertimeAction::Reject)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidState(_)));
}

async fn approved_overtime(db: &sea_orm::DatabaseConnection, staff_id: i32, date: &str, hours: f64) {
    let record = staff_service::record_overtime(
        db,
        OvertimeInput {
            staff_id,
            work_date: date.into(),
            hours,
            reason: None,
        },
    )
    .await
    .unwrap();
    staff_service::decide_overtime(db, record.id, OvertimeAction::Approve)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_salary_includes_overtime_and_no_pay_leave() {
    let state = setup_test_state().await;
    let staff_id = create_test_staff(&state).await;
    let db = state.db();

    approved_overtime(db, staff_id, "2026-03-05", 2.5).await;
    approved_overtime(db, staff_id, "2026-03-19", 1.5).await;
    // Outside the month
    approved_overtime(db, staff_id, "2026-04-01", 8.0).await;
    // Never approved
    staff_service::record_overtime(
        db,
        OvertimeInput {
            staff_id,
            work_date: "2026-03-20".into(),
            hours: 5.0,
            reason: None,
        },
    )
    .await
    .unwrap();

    // Spans the month end: only March 30 and 31 count
    let no_pay = leave_service::apply_leave(
        db,
        leave(staff_id, LeaveType::NoPay, "2026-03-30", "2026-04-02"),
    )
    .await
    .unwrap();
    leave_service::manage_leave(db, no_pay.id, LeaveAction::Approve, None)
        .await
        .unwrap();
    // Paid leave never reduces salary
    let sick = leave_service::apply_leave(
        db,
        leave(staff_id, LeaveType::Sick, "2026-03-10", "2026-03-11"),
    )
    .await
    .unwrap();
    leave_service::manage_leave(db, sick.id, LeaveAction::Approve, None)
        .await
        .unwrap();

    let salary = staff_service::generate_salary(
        db,
        SalaryRequest {
            staff_id,
            month: "2026-03".into(),
            allowances: 100.0,
            deductions: 0.0,
        },
        WORKING_DAYS,
    )
    .await
    .unwrap();

    assert_eq!(salary.status, "pending");
    assert_eq!(salary.ot_hours, 4.0);
    assert_eq!(salary.ot_amount, 80.0);
    assert_eq!(salary.no_pay_days, 2);
    assert_eq!(salary.deductions, 200.0);
    assert_eq!(salary.net_salary, 2980.0);
}

#[tokio::test]
async fn test_pending_salary_is_regenerated_in_place() {
    let state = setup_test_state().await;
    let staff_id = create_test_staff(&state).await;
    let db = state.db();

    let request = |allowances: f64| SalaryRequest {
        staff_id,
        month: "2026-02".into(),
        allowances,
        deductions: 0.0,
    };

    let first = staff_service::generate_salary(db, request(0.0), WORKING_DAYS)
        .await
        .unwrap();
    assert_eq!(first.net_salary, 3000.0);

    let second = staff_service::generate_salary(db, request(250.0), WORKING_DAYS)
        .await
        .unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.net_salary, 3250.0);

    let salaries = staff_service::list_salaries(
        db,
        SalaryFilter {
            staff_id: Some(staff_id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(salaries.len(), 1);
}

#[tokio::test]
async fn test_paid_salary_is_final() {
    let state = setup_test_state().await;
    let staff_id = create_test_staff(&state).await;
    let db = state.db();

    let salary = staff_service::generate_salary(
        db,
        SalaryRequest {
            staff_id,
            month: "2026-01".into(),
            allowances: 0.0,
            deductions: 0.0,
        },
        WORKING_DAYS,
    )
    .await
    .unwrap();

    let paid = staff_service::pay_salary(db, salary.id).await.unwrap();
    assert_eq!(paid.status, "paid");
    assert!(paid.paid_at.is_some());

    let err = staff_service::pay_salary(db, salary.id).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidState(_)));

    let err = staff_service::generate_salary(
        db,
        SalaryRequest {
            staff_id,
            month: "2026-01".into(),
            allowances: 0.0,
            deductions: 0.0,
        },
        WORKING_DAYS,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::InvalidState(_)));

    let inbox = notification_service::list_notifications(db, staff_inbox(staff_id), true)
        .await
        .unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, "salary_paid");
}

#[tokio::test]
async fn test_salary_rejects_bad_month() {
    let state = setup_test_state().await;
    let staff_id = create_test_staff(&state).await;

    let err = staff_service::generate_salary(
        state.db(),
        SalaryRequest {
            staff_id,
            month: "2026-13".into(),
            allowances: 0.0,
            deductions: 0.0,
        },
        WORKING_DAYS,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_admin_overturn_respects_pending_overlap() {
    let state = setup_test_state().await;
    let staff_id = create_test_staff(&state).await;
    let db = state.db();

    let first = leave_service::apply_leave(
        db,
        leave(staff_id, LeaveType::Annual, "2026-08-03", "2026-08-05"),
    )
    .await
    .unwrap();
    leave_service::manage_leave(db, first.id, LeaveAction::Reject, None)
        .await
        .unwrap();

    // The rejected request no longer holds the dates
    leave_service::apply_leave(
        db,
        leave(staff_id, LeaveType::Casual, "2026-08-04", "2026-08-06"),
    )
    .await
    .unwrap();

    let err = leave_service::admin_manage_leave(db, first.id, LeaveAction::Approve, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    let unchanged = leave_service::get_leave(db, first.id).await.unwrap();
    assert_eq!(unchanged.status, "rejected");
}
