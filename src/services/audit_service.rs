use crate::entities::{ActionDetails, ActionType, user_action_entity as ua};
use crate::error::AppResult;
use crate::models::{AdminActionListResponse, AdminActionQuery, Pagination, UserActionResponse};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct AuditService {
    pool: DatabaseConnection,
}

impl AuditService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 写入一条审计日志。传入调用方的事务连接，与余额变更一起提交或回滚
    pub async fn record<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        action_type: ActionType,
        details: ActionDetails,
    ) -> Result<ua::Model, DbErr> {
        ua::ActiveModel {
            user_id: Set(user_id),
            action_type: Set(action_type),
            details: Set(details),
            module: Set(ua::MODULE_POINTS.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(conn)
        .await
    }

    /// 管理员分页查询审计日志（倒序）
    pub async fn list_actions(&self, query: &AdminActionQuery) -> AppResult<AdminActionListResponse> {
        let params = query.pagination();

        let mut select = ua::Entity::find();
        if let Some(user_id) = query.user_id {
            select = select.filter(ua::Column::UserId.eq(user_id));
        }
        if let Some(action_type) = query.action_type {
            select = select.filter(ua::Column::ActionType.eq(action_type));
        }

        let total = select.clone().count(&self.pool).await?;

        let actions = select
            .order_by_desc(ua::Column::CreatedAt)
            .order_by_desc(ua::Column::Id)
            .offset(params.get_offset())
            .limit(params.get_limit())
            .all(&self.pool)
            .await?
            .into_iter()
            .map(UserActionResponse::from)
            .collect();

        Ok(AdminActionListResponse {
            actions,
            pagination: Pagination::new(&params, total),
        })
    }
}
