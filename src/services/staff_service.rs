//! Staff Service - staff records, overtime and monthly salaries

use sea_orm::*;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::models::StaffInput;
use crate::models::branch::Entity as Branch;
use crate::models::leave::LeaveType;
use crate::models::overtime_record::{self, Entity as Overtime};
use crate::models::salary::{self, Entity as Salary};
use crate::models::staff::{self, Entity as Staff};
use crate::services::leave_service;
use crate::services::notification_service::{self, NewNotification, RecipientType};
use crate::utils::dates::{self, now_rfc3339};
use crate::utils::money::round_cents;

// ---------------------------------------------------------------------------
// Staff records
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct StaffFilter {
    pub branch_id: Option<i32>,
    pub include_inactive: bool,
}

pub async fn list_staff(
    db: &DatabaseConnection,
    filter: StaffFilter,
) -> Result<Vec<staff::Model>, DomainError> {
    let mut query = Staff::find();
    if !filter.include_inactive {
        query = query.filter(staff::Column::IsActive.eq(true));
    }
    if let Some(branch_id) = filter.branch_id {
        query = query.filter(staff::Column::BranchId.eq(branch_id));
    }
    Ok(query.order_by_asc(staff::Column::Name).all(db).await?)
}

pub async fn get_staff(db: &DatabaseConnection, id: i32) -> Result<staff::Model, DomainError> {
    Staff::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Staff"))
}

pub async fn create_staff(
    db: &DatabaseConnection,
    input: StaffInput,
) -> Result<staff::Model, DomainError> {
    input.validate()?;
    Branch::find_by_id(input.branch_id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Branch"))?;

    let now = now_rfc3339();
    Ok(staff::ActiveModel {
        branch_id: Set(input.branch_id),
        name: Set(input.name.trim().to_string()),
        designation: Set(input.designation),
        email: Set(input.email),
        phone: Set(input.phone),
        basic_salary: Set(input.basic_salary),
        ot_rate: Set(input.ot_rate),
        is_active: Set(true),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

pub async fn update_staff(
    db: &DatabaseConnection,
    id: i32,
    input: StaffInput,
) -> Result<staff::Model, DomainError> {
    input.validate()?;
    let existing = get_staff(db, id).await?;
    if existing.branch_id != input.branch_id {
        Branch::find_by_id(input.branch_id)
            .one(db)
            .await?
            .ok_or_else(|| DomainError::not_found("Branch"))?;
    }

    let mut active: staff::ActiveModel = existing.into();
    active.branch_id = Set(input.branch_id);
    active.name = Set(input.name.trim().to_string());
    active.designation = Set(input.designation);
    active.email = Set(input.email);
    active.phone = Set(input.phone);
    active.basic_salary = Set(input.basic_salary);
    active.ot_rate = Set(input.ot_rate);
    active.updated_at = Set(now_rfc3339());
    Ok(active.update(db).await?)
}

pub async fn deactivate_staff(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let existing = get_staff(db, id).await?;
    let mut active: staff::ActiveModel = existing.into();
    active.is_active = Set(false);
    active.updated_at = Set(now_rfc3339());
    active.update(db).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Overtime
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct OvertimeInput {
    pub staff_id: i32,
    pub work_date: String,
    pub hours: f64,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OvertimeAction {
    Approve,
    Reject,
}

#[derive(Debug, Default, Clone)]
pub struct OvertimeFilter {
    pub staff_id: Option<i32>,
    pub status: Option<String>,
}

pub async fn record_overtime(
    db: &DatabaseConnection,
    input: OvertimeInput,
) -> Result<overtime_record::Model, DomainError> {
    if !(input.hours > 0.0 && input.hours <= 24.0) {
        return Err(DomainError::validation(
            "Overtime hours must be between 0 and 24",
        ));
    }
    let work_date = dates::parse_date(&input.work_date, "work_date")?;
    let member = get_staff(db, input.staff_id).await?;

    let now = now_rfc3339();
    Ok(overtime_record::ActiveModel {
        staff_id: Set(member.id),
        work_date: Set(work_date.format(dates::DATE_FORMAT).to_string()),
        hours: Set(input.hours),
        reason: Set(input.reason),
        status: Set("pending".to_owned()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

pub async fn decide_overtime(
    db: &DatabaseConnection,
    id: i32,
    action: OvertimeAction,
) -> Result<overtime_record::Model, DomainError> {
    let existing = Overtime::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Overtime record"))?;
    if existing.status != "pending" {
        return Err(DomainError::invalid_state(format!(
            "Overtime record is already {}",
            existing.status
        )));
    }

    let mut active: overtime_record::ActiveModel = existing.into();
    active.status = Set(match action {
        OvertimeAction::Approve => "approved",
        OvertimeAction::Reject => "rejected",
    }
    .to_owned());
    active.updated_at = Set(now_rfc3339());
    Ok(active.update(db).await?)
}

pub async fn list_overtime(
    db: &DatabaseConnection,
    filter: OvertimeFilter,
) -> Result<Vec<overtime_record::Model>, DomainError> {
    let mut query = Overtime::find();
    if let Some(staff_id) = filter.staff_id {
        query = query.filter(overtime_record::Column::StaffId.eq(staff_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(overtime_record::Column::Status.eq(status));
    }
    Ok(query
        .order_by_desc(overtime_record::Column::WorkDate)
        .all(db)
        .await?)
}

// ---------------------------------------------------------------------------
// Salaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SalaryRequest {
    pub staff_id: i32,
    pub month: String,
    #[serde(default)]
    pub allowances: f64,
    #[serde(default)]
    pub deductions: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayInputs {
    pub basic_salary: f64,
    pub ot_rate: f64,
    pub ot_hours: f64,
    pub allowances: f64,
    pub extra_deductions: f64,
    pub no_pay_days: i64,
    pub working_days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayBreakdown {
    pub ot_amount: f64,
    pub deductions: f64,
    pub net_salary: f64,
}

/// Monthly pay. No-pay leave is deducted at `basic / working_days` per
/// day; net pay never goes below zero.
pub fn compute_pay(inputs: PayInputs) -> PayBreakdown {
    let ot_amount = round_cents(inputs.ot_hours * inputs.ot_rate);
    let daily_rate = if inputs.working_days == 0 {
        0.0
    } else {
        inputs.basic_salary / inputs.working_days as f64
    };
    let deductions = round_cents(inputs.extra_deductions + daily_rate * inputs.no_pay_days as f64);
    let gross = inputs.basic_salary + ot_amount + inputs.allowances;

    PayBreakdown {
        ot_amount,
        deductions,
        net_salary: round_cents((gross - deductions).max(0.0)),
    }
}

/// Build (or rebuild while still pending) the salary of a staff member for
/// a `YYYY-MM` month.
pub async fn generate_salary(
    db: &DatabaseConnection,
    request: SalaryRequest,
    working_days: u32,
) -> Result<salary::Model, DomainError> {
    if request.allowances < 0.0 || request.deductions < 0.0 {
        return Err(DomainError::validation(
            "Allowances and deductions cannot be negative",
        ));
    }
    let (first, last) = dates::month_bounds(&request.month)?;
    let month = dates::format_month(first);

    let txn = db.begin().await?;

    let member = Staff::find_by_id(request.staff_id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::not_found("Staff"))?;

    let existing = Salary::find()
        .filter(salary::Column::StaffId.eq(member.id))
        .filter(salary::Column::Month.eq(month.clone()))
        .one(&txn)
        .await?;
    if let Some(ref paid) = existing {
        if paid.status == "paid" {
            return Err(DomainError::invalid_state(format!(
                "Salary for {} is already paid",
                month
            )));
        }
    }

    let ot_hours: f64 = Overtime::find()
        .filter(overtime_record::Column::StaffId.eq(member.id))
        .filter(overtime_record::Column::Status.eq("approved"))
        .filter(overtime_record::Column::WorkDate.gte(first.format(dates::DATE_FORMAT).to_string()))
        .filter(overtime_record::Column::WorkDate.lte(last.format(dates::DATE_FORMAT).to_string()))
        .all(&txn)
        .await?
        .iter()
        .map(|o| o.hours)
        .sum();

    let no_pay_days =
        leave_service::approved_days_between(&txn, member.id, LeaveType::NoPay, first, last)
            .await?;

    let pay = compute_pay(PayInputs {
        basic_salary: member.basic_salary,
        ot_rate: member.ot_rate,
        ot_hours,
        allowances: request.allowances,
        extra_deductions: request.deductions,
        no_pay_days,
        working_days,
    });

    let now = now_rfc3339();
    let mut active: salary::ActiveModel = match existing {
        Some(row) => row.into(),
        None => salary::ActiveModel {
            staff_id: Set(member.id),
            month: Set(month.clone()),
            status: Set("pending".to_owned()),
            paid_at: Set(None),
            created_at: Set(now.clone()),
            ..Default::default()
        },
    };
    active.basic_salary = Set(member.basic_salary);
    active.ot_hours = Set(ot_hours);
    active.ot_amount = Set(pay.ot_amount);
    active.allowances = Set(round_cents(request.allowances));
    active.deductions = Set(pay.deductions);
    active.no_pay_days = Set(no_pay_days as i32);
    active.net_salary = Set(pay.net_salary);
    active.updated_at = Set(now);

    let saved = active.save(&txn).await?.try_into_model()?;
    txn.commit().await?;

    tracing::info!(
        "Salary {} for staff {} generated, net {:.2}",
        saved.month,
        saved.staff_id,
        saved.net_salary
    );
    Ok(saved)
}

pub async fn pay_salary(db: &DatabaseConnection, id: i32) -> Result<salary::Model, DomainError> {
    let txn = db.begin().await?;

    let existing = Salary::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::not_found("Salary"))?;
    if existing.status == "paid" {
        return Err(DomainError::invalid_state("Salary is already paid"));
    }

    let now = now_rfc3339();
    let mut active: salary::ActiveModel = existing.into();
    active.status = Set("paid".to_owned());
    active.paid_at = Set(Some(now.clone()));
    active.updated_at = Set(now);
    let paid = active.update(&txn).await?;

    notification_service::notify(
        &txn,
        NewNotification::to(RecipientType::Staff, Some(paid.staff_id), "salary_paid").titled(
            format!("Salary for {} paid", paid.month),
            format!("Net salary of {:.2} has been paid", paid.net_salary),
        ),
    )
    .await?;

    txn.commit().await?;
    Ok(paid)
}

#[derive(Debug, Default, Clone)]
pub struct SalaryFilter {
    pub staff_id: Option<i32>,
    pub month: Option<String>,
    pub status: Option<String>,
}

pub async fn list_salaries(
    db: &DatabaseConnection,
    filter: SalaryFilter,
) -> Result<Vec<salary::Model>, DomainError> {
    let mut condition = Condition::all();
    if let Some(staff_id) = filter.staff_id {
        condition = condition.add(salary::Column::StaffId.eq(staff_id));
    }
    if let Some(month) = filter.month {
        condition = condition.add(salary::Column::Month.eq(month));
    }
    if let Some(status) = filter.status {
        condition = condition.add(salary::Column::Status.eq(status));
    }

    Ok(Salary::find()
        .filter(condition)
        .order_by_desc(salary::Column::Month)
        .order_by_asc(salary::Column::StaffId)
        .all(db)
        .await?)
}
