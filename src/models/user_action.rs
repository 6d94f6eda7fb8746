use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{ActionDetails, ActionType, user_action_entity as ua};

use super::{Pagination, PaginationParams};

/// 管理员审计日志查询参数
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminActionQuery {
    pub user_id: Option<i64>,
    pub action_type: Option<ActionType>,
    pub limit: Option<u64>,
    pub page: Option<u64>,
}

impl AdminActionQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserActionResponse {
    pub id: i64,
    pub user_id: i64,
    pub action_type: ActionType,
    pub details: ActionDetails,
    pub module: String,
    pub created_at: DateTime<Utc>,
}

impl From<ua::Model> for UserActionResponse {
    fn from(m: ua::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            action_type: m.action_type,
            details: m.details,
            module: m.module,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminActionListResponse {
    pub actions: Vec<UserActionResponse>,
    pub pagination: Pagination,
}
