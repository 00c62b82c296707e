use axum::{
    Json,
    extract::{Path, Query, State},
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use super::response::{ApiResult, ok};
use crate::services::notification_service::{self, RecipientFilter, RecipientType};

#[derive(Debug, Deserialize)]
pub struct RecipientQuery {
    pub recipient_type: RecipientType,
    pub recipient_id: Option<i32>,
    #[serde(default)]
    pub unread_only: bool,
}

impl RecipientQuery {
    fn filter(&self) -> RecipientFilter {
        RecipientFilter {
            recipient_type: self.recipient_type,
            recipient_id: self.recipient_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

/// GET /api/notifications?recipient_type=doctor&recipient_id=3
#[utoipa::path(
    get,
    path = "/api/notifications",
    params(
        ("recipient_type" = String, Query, description = "admin, doctor, patient or staff"),
        ("recipient_id" = Option<i32>, Query, description = "Recipient; broadcasts are included"),
        ("unread_only" = Option<bool>, Query, description = "Skip read notifications")
    ),
    responses((status = 200, description = "Notifications, newest first"))
)]
pub async fn list_notifications(
    State(db): State<DatabaseConnection>,
    Query(params): Query<RecipientQuery>,
) -> ApiResult {
    let notifications =
        notification_service::list_notifications(&db, params.filter(), params.unread_only)
            .await?;
    ok("Notifications retrieved", notifications)
}

pub async fn unread_count(
    State(db): State<DatabaseConnection>,
    Query(params): Query<RecipientQuery>,
) -> ApiResult {
    let count = notification_service::unread_count(&db, params.filter()).await?;
    ok("Unread count retrieved", CountResponse { count })
}

pub async fn mark_read(State(db): State<DatabaseConnection>, Path(id): Path<i32>) -> ApiResult {
    ok(
        "Notification marked as read",
        notification_service::mark_read(&db, id).await?,
    )
}

pub async fn mark_all_read(
    State(db): State<DatabaseConnection>,
    Query(params): Query<RecipientQuery>,
) -> ApiResult {
    let count = notification_service::mark_all_read(&db, params.filter()).await?;
    ok("Notifications marked as read", CountResponse { count })
}
