//! Leave Service - LeaveManage / AdminLeaveManage
//!
//! A branch manager decides pending requests. An admin may decide pending
//! requests too and may overturn a manager's decision. Each decision writes
//! its own comment column and notifies the staff member.

use sea_orm::*;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::models::leave::{self, Entity as Leave, LeaveDto, LeaveType};
use crate::models::staff::Entity as Staff;
use crate::services::notification_service::{self, NewNotification, RecipientType};
use crate::utils::dates::{self, now_rfc3339};

pub const HOLDING_STATUSES: [&str; 2] = ["pending", "approved"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveAction {
    Approve,
    Reject,
}

impl LeaveAction {
    pub fn status(&self) -> &'static str {
        match self {
            LeaveAction::Approve => "approved",
            LeaveAction::Reject => "rejected",
        }
    }
}

/// Who is deciding a leave request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decider {
    Manager,
    Admin,
}

/// Check whether `decider` may act on a leave currently in `status`.
pub fn can_decide(decider: Decider, status: &str) -> Result<(), DomainError> {
    match (decider, status) {
        (_, "pending") => Ok(()),
        (Decider::Admin, "approved") | (Decider::Admin, "rejected") => Ok(()),
        (Decider::Manager, _) => Err(DomainError::invalid_state(format!(
            "Leave is already {}",
            status
        ))),
        (Decider::Admin, _) => Err(DomainError::invalid_state(format!(
            "A {} leave cannot be decided",
            status
        ))),
    }
}

/// Filter parameters for listing leaves
#[derive(Debug, Default, Clone)]
pub struct LeaveFilter {
    pub staff_id: Option<i32>,
    pub status: Option<String>,
}

pub async fn apply_leave(db: &DatabaseConnection, dto: LeaveDto) -> Result<leave::Model, DomainError> {
    let start = dates::parse_date(&dto.start_date, "start_date")?;
    let end = dates::parse_date(&dto.end_date, "end_date")?;
    if end < start {
        return Err(DomainError::validation("end_date is before start_date"));
    }
    let days = dates::inclusive_days(start, end) as i32;
    let start_str = start.format(dates::DATE_FORMAT).to_string();
    let end_str = end.format(dates::DATE_FORMAT).to_string();

    let staff = Staff::find_by_id(dto.staff_id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Staff"))?;
    if !staff.is_active {
        return Err(DomainError::invalid_state("Staff member is inactive"));
    }

    let overlapping = Leave::find()
        .filter(leave::Column::StaffId.eq(staff.id))
        .filter(leave::Column::Status.is_in(HOLDING_STATUSES))
        .filter(leave::Column::StartDate.lte(end_str.clone()))
        .filter(leave::Column::EndDate.gte(start_str.clone()))
        .one(db)
        .await?;
    if let Some(other) = overlapping {
        return Err(DomainError::conflict(format!(
            "Overlaps leave {} ({} to {})",
            other.id, other.start_date, other.end_date
        )));
    }

    let now = now_rfc3339();

    Ok(leave::ActiveModel {
        staff_id: Set(staff.id),
        leave_type: Set(dto.leave_type.as_str().to_string()),
        start_date: Set(start_str),
        end_date: Set(end_str),
        days: Set(days),
        reason: Set(dto.reason),
        status: Set("pending".to_owned()),
        manager_comment: Set(None),
        admin_comment: Set(None),
        decided_at: Set(None),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

/// LeaveManage: branch manager decision on a pending request
pub async fn manage_leave(
    db: &DatabaseConnection,
    id: i32,
    action: LeaveAction,
    comment: Option<String>,
) -> Result<leave::Model, DomainError> {
    decide(db, id, Decider::Manager, action, comment).await
}

/// AdminLeaveManage: admin decision, may overturn the manager
pub async fn admin_manage_leave(
    db: &DatabaseConnection,
    id: i32,
    action: LeaveAction,
    comment: Option<String>,
) -> Result<leave::Model, DomainError> {
    decide(db, id, Decider::Admin, action, comment).await
}

async fn decide(
    db: &DatabaseConnection,
    id: i32,
    decider: Decider,
    action: LeaveAction,
    comment: Option<String>,
) -> Result<leave::Model, DomainError> {
    let txn = db.begin().await?;

    let existing = Leave::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::not_found("Leave"))?;
    can_decide(decider, &existing.status)?;

    if action == LeaveAction::Approve && existing.status != "approved" {
        let clash = Leave::find()
            .filter(leave::Column::StaffId.eq(existing.staff_id))
            .filter(leave::Column::Id.ne(existing.id))
            .filter(leave::Column::Status.is_in(HOLDING_STATUSES))
            .filter(leave::Column::StartDate.lte(existing.end_date.clone()))
            .filter(leave::Column::EndDate.gte(existing.start_date.clone()))
            .one(&txn)
            .await?;
        if let Some(other) = clash {
            return Err(DomainError::conflict(format!(
                "Overlaps {} leave {} ({} to {})",
                other.status, other.id, other.start_date, other.end_date
            )));
        }
    }

    let staff_id = existing.staff_id;
    let status = action.status();
    let mut active: leave::ActiveModel = existing.into();
    active.status = Set(status.to_owned());
    match decider {
        Decider::Manager => active.manager_comment = Set(comment),
        Decider::Admin => active.admin_comment = Set(comment),
    }
    let now = now_rfc3339();
    active.decided_at = Set(Some(now.clone()));
    active.updated_at = Set(now);
    let updated = active.update(&txn).await?;

    notification_service::notify(
        &txn,
        NewNotification::to(RecipientType::Staff, Some(staff_id), "leave_decision").titled(
            format!("Leave {}", status),
            format!(
                "Your {} leave from {} to {} was {}",
                updated.leave_type, updated.start_date, updated.end_date, status
            ),
        ),
    )
    .await?;

    txn.commit().await?;
    tracing::info!("Leave {} {} by {:?}", updated.id, status, decider);
    Ok(updated)
}

/// Withdraw a request that nobody has decided yet
pub async fn cancel_leave(db: &DatabaseConnection, id: i32) -> Result<leave::Model, DomainError> {
    let existing = Leave::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Leave"))?;
    if existing.status != "pending" {
        return Err(DomainError::invalid_state(format!(
            "Only pending leave can be cancelled (this one is {})",
            existing.status
        )));
    }

    let mut active: leave::ActiveModel = existing.into();
    active.status = Set("cancelled".to_owned());
    active.updated_at = Set(now_rfc3339());
    Ok(active.update(db).await?)
}

pub async fn get_leave(db: &DatabaseConnection, id: i32) -> Result<leave::Model, DomainError> {
    Leave::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Leave"))
}

pub async fn list_leaves(
    db: &DatabaseConnection,
    filter: LeaveFilter,
) -> Result<Vec<leave::Model>, DomainError> {
    let mut condition = Condition::all();
    if let Some(staff_id) = filter.staff_id {
        condition = condition.add(leave::Column::StaffId.eq(staff_id));
    }
    if let Some(status) = filter.status {
        condition = condition.add(leave::Column::Status.eq(status));
    }

    Ok(Leave::find()
        .filter(condition)
        .order_by_desc(leave::Column::StartDate)
        .all(db)
        .await?)
}

/// Approved leave days of `leave_type` falling inside `[from, to]`
pub async fn approved_days_between<C: ConnectionTrait>(
    conn: &C,
    staff_id: i32,
    leave_type: LeaveType,
    from: chrono::NaiveDate,
    to: chrono::NaiveDate,
) -> Result<i64, DomainError> {
    let from_str = from.format(dates::DATE_FORMAT).to_string();
    let to_str = to.format(dates::DATE_FORMAT).to_string();

    let leaves = Leave::find()
        .filter(leave::Column::StaffId.eq(staff_id))
        .filter(leave::Column::Status.eq("approved"))
        .filter(leave::Column::LeaveType.eq(leave_type.as_str()))
        .filter(leave::Column::StartDate.lte(to_str))
        .filter(leave::Column::EndDate.gte(from_str))
        .all(conn)
        .await?;

    let mut days = 0;
    for l in leaves {
        let start = dates::parse_date(&l.start_date, "start_date")?;
        let end = dates::parse_date(&l.end_date, "end_date")?;
        days += dates::overlap_days(start, end, from, to);
    }
    Ok(days)
}
