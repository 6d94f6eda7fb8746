use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{TransactionType, point_transaction_entity as pt};

use super::{Pagination, PaginationParams};

/// 用户流水查询参数
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct TransactionQuery {
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// 返回条数 (默认 100)
    pub limit: Option<u64>,
}

/// 管理员流水查询参数
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminTransactionQuery {
    pub user_id: Option<i64>,
    /// YYYY-MM-DD
    pub start_date: Option<String>,
    /// YYYY-MM-DD，包含当天
    pub end_date: Option<String>,
    pub limit: Option<u64>,
    pub page: Option<u64>,
}

impl AdminTransactionQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: i64,
    pub is_debit: bool,
    pub status: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<pt::Model> for TransactionResponse {
    fn from(m: pt::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            transaction_type: m.transaction_type,
            amount: m.amount,
            is_debit: m.is_debit,
            status: m.status,
            description: m.description,
            admin_id: m.admin_id,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminTransactionListResponse {
    pub transactions: Vec<TransactionResponse>,
    pub pagination: Pagination,
}
