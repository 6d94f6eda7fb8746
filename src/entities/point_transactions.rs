use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 积分流水状态，当前流程只会写入 completed
pub const STATUS_COMPLETED: &str = "completed";

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    #[sea_orm(string_value = "points_award")]
    PointsAward,
    #[sea_orm(string_value = "points_purchase")]
    PointsPurchase,
    #[sea_orm(string_value = "refund")]
    Refund,
    #[sea_orm(string_value = "other")]
    Other,
}

impl TransactionType {
    /// 积分相关查询只返回这几类流水
    pub const LEDGER_TYPES: [TransactionType; 4] = [
        TransactionType::PointsAward,
        TransactionType::PointsPurchase,
        TransactionType::Refund,
        TransactionType::Other,
    ];
}

/// 积分流水，写入后不可修改
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "point_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub transaction_type: TransactionType,
    /// 变动数量（正数），方向由 is_debit 决定
    pub amount: i64,
    pub is_debit: bool,
    pub status: String,
    pub description: String,
    /// 管理员发放时记录操作人
    pub admin_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
