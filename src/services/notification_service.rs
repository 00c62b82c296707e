//! Notification Service - direct table writes and read tracking

use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::models::notification::{self, Entity as Notification};
use crate::utils::dates::now_rfc3339;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientType {
    Admin,
    Doctor,
    Patient,
    Staff,
}

impl RecipientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipientType::Admin => "admin",
            RecipientType::Doctor => "doctor",
            RecipientType::Patient => "patient",
            RecipientType::Staff => "staff",
        }
    }
}

/// A notification about to be written
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_type: RecipientType,
    /// `None` addresses every recipient of the type
    pub recipient_id: Option<i32>,
    pub kind: &'static str,
    pub title: String,
    pub message: String,
}

impl NewNotification {
    pub fn to(recipient_type: RecipientType, recipient_id: Option<i32>, kind: &'static str) -> Self {
        Self {
            recipient_type,
            recipient_id,
            kind,
            title: String::new(),
            message: String::new(),
        }
    }

    pub fn titled(mut self, title: impl Into<String>, message: impl Into<String>) -> Self {
        self.title = title.into();
        self.message = message.into();
        self
    }
}

/// Insert a notification row. Takes any connection so callers can write it
/// inside their own transaction.
pub async fn notify<C: ConnectionTrait>(
    conn: &C,
    new: NewNotification,
) -> Result<notification::Model, DomainError> {
    let row = notification::ActiveModel {
        recipient_type: Set(new.recipient_type.as_str().to_string()),
        recipient_id: Set(new.recipient_id),
        kind: Set(new.kind.to_string()),
        title: Set(new.title),
        message: Set(new.message),
        is_read: Set(false),
        read_at: Set(None),
        created_at: Set(now_rfc3339()),
        ..Default::default()
    };

    let saved = row.insert(conn).await?;
    tracing::debug!(
        "Notification {} ({}) queued for {}:{:?}",
        saved.id,
        saved.kind,
        saved.recipient_type,
        saved.recipient_id
    );
    Ok(saved)
}

/// Who is asking for notifications
#[derive(Debug, Clone, Copy)]
pub struct RecipientFilter {
    pub recipient_type: RecipientType,
    /// With an id, rows addressed to that id plus broadcasts for the type.
    /// Without one, every row of the type.
    pub recipient_id: Option<i32>,
}

impl RecipientFilter {
    fn condition(&self) -> Condition {
        let mut condition =
            Condition::all().add(notification::Column::RecipientType.eq(self.recipient_type.as_str()));

        if let Some(id) = self.recipient_id {
            condition = condition.add(
                Condition::any()
                    .add(notification::Column::RecipientId.eq(id))
                    .add(notification::Column::RecipientId.is_null()),
            );
        }

        condition
    }
}

pub async fn list_notifications(
    db: &DatabaseConnection,
    filter: RecipientFilter,
    unread_only: bool,
) -> Result<Vec<notification::Model>, DomainError> {
    let mut condition = filter.condition();
    if unread_only {
        condition = condition.add(notification::Column::IsRead.eq(false));
    }

    Ok(Notification::find()
        .filter(condition)
        .order_by_desc(notification::Column::CreatedAt)
        .order_by_desc(notification::Column::Id)
        .all(db)
        .await?)
}

pub async fn unread_count(db: &DatabaseConnection, filter: RecipientFilter) -> Result<u64, DomainError> {
    Ok(Notification::find()
        .filter(filter.condition().add(notification::Column::IsRead.eq(false)))
        .count(db)
        .await?)
}

/// Mark one notification as read. Marking an already read row is a no-op.
pub async fn mark_read(db: &DatabaseConnection, id: i32) -> Result<notification::Model, DomainError> {
    let row = Notification::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Notification"))?;

    if row.is_read {
        return Ok(row);
    }

    let mut active: notification::ActiveModel = row.into();
    active.is_read = Set(true);
    active.read_at = Set(Some(now_rfc3339()));
    Ok(active.update(db).await?)
}

/// Mark every unread notification visible to the recipient as read.
/// Returns the number of rows touched.
pub async fn mark_all_read(db: &DatabaseConnection, filter: RecipientFilter) -> Result<u64, DomainError> {
    let result = Notification::update_many()
        .col_expr(notification::Column::IsRead, Expr::value(true))
        .col_expr(notification::Column::ReadAt, Expr::value(now_rfc3339()))
        .filter(filter.condition().add(notification::Column::IsRead.eq(false)))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
