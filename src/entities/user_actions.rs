use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter, FromJsonQueryResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 审计日志来源模块
pub const MODULE_POINTS: &str = "points";

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    #[sea_orm(string_value = "points")]
    Points,
    #[sea_orm(string_value = "points_reward")]
    PointsReward,
    #[sea_orm(string_value = "refund")]
    Refund,
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// 审计详情，按动作区分字段，以 JSON 存储
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, FromJsonQueryResult,
)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionDetails {
    PointsDeducted {
        points: i64,
        previous_points: i64,
        new_points: i64,
        operation: Option<String>,
        reason: Option<String>,
    },
    PointsAwarded {
        points: i64,
        new_points: i64,
        all_points: i64,
        level: i32,
        operation: Option<String>,
        reason: Option<String>,
        /// 管理员发放时的操作人
        awarded_by: Option<i64>,
    },
    PointsRefunded {
        points: i64,
        new_points: i64,
        operation: Option<String>,
        reason: Option<String>,
    },
    AdminAddPoints {
        target_user_id: i64,
        points: i64,
        new_points: i64,
        reason: Option<String>,
    },
}

/// 用户行为审计日志，写入后不可修改
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "user_actions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// 动作所针对的用户（不一定是操作人）
    pub user_id: i64,
    pub action_type: ActionType,
    #[sea_orm(column_type = "Json")]
    pub details: ActionDetails,
    pub module: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
