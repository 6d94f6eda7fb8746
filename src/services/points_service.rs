use crate::entities::{
    ActionDetails, ActionType, TransactionType, point_transaction_entity as pt,
    user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::AuditService;
use crate::utils::DateRange;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// 每 25000 累计积分升一级
pub const POINTS_PER_LEVEL: i64 = 25_000;

pub const INSUFFICIENT_POINTS_MESSAGE: &str = "لا يوجد رصيد كافي من النقاط";

/// level = floor(all_points / 25000) + 1
pub fn level_for(all_points: i64) -> i32 {
    i32::try_from(all_points.max(0) / POINTS_PER_LEVEL + 1).unwrap_or(i32::MAX)
}

/// 扣减结果。余额不足属于业务结果而不是错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeductOutcome {
    Deducted { new_points: i64 },
    Insufficient { current_points: i64 },
}

fn ensure_positive(points: i64) -> AppResult<()> {
    if points <= 0 {
        return Err(AppError::ValidationError(
            "points must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

async fn find_user<C: ConnectionTrait>(conn: &C, user_id: i64) -> AppResult<users::Model> {
    users::Entity::find_by_id(user_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

struct NewTransaction {
    user_id: i64,
    transaction_type: TransactionType,
    amount: i64,
    is_debit: bool,
    description: String,
    admin_id: Option<i64>,
}

async fn record_transaction<C: ConnectionTrait>(
    conn: &C,
    tx: NewTransaction,
) -> AppResult<pt::Model> {
    let model = pt::ActiveModel {
        user_id: Set(tx.user_id),
        transaction_type: Set(tx.transaction_type),
        amount: Set(tx.amount),
        is_debit: Set(tx.is_debit),
        status: Set(pt::STATUS_COMPLETED.to_string()),
        description: Set(tx.description),
        admin_id: Set(tx.admin_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(model)
}

fn describe(verb: &str, points: i64, operation: Option<&str>, reason: Option<&str>) -> String {
    match (reason, operation) {
        (Some(reason), _) if !reason.trim().is_empty() => reason.to_string(),
        (_, Some(op)) if !op.trim().is_empty() => format!("{verb} {points} points for {op}"),
        _ => format!("{verb} {points} points"),
    }
}

/// 积分服务
///
/// 每次余额变更都在一个数据库事务内完成：
/// 1. 原子增减余额（扣减带 `points >= n` 条件）
/// 2. 重新读取余额并同步等级
/// 3. 写入积分流水与审计日志
///
/// 任一步失败整体回滚，并发请求不会互相覆盖余额。
#[derive(Clone)]
pub struct PointsService {
    pool: DatabaseConnection,
}

impl PointsService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn get_balance(&self, user_id: i64) -> AppResult<BalanceResponse> {
        let user = find_user(&self.pool, user_id).await?;
        Ok(BalanceResponse {
            points: user.points,
            all_points: user.all_points,
            level: user.level,
        })
    }

    /// 检查余额是否足够，只读
    pub async fn check_balance(
        &self,
        user_id: i64,
        required_points: i64,
    ) -> AppResult<CheckPointsResponse> {
        if required_points < 0 {
            return Err(AppError::ValidationError(
                "requiredPoints must be a non-negative integer".to_string(),
            ));
        }

        let user = find_user(&self.pool, user_id).await?;
        Ok(CheckPointsResponse {
            has_enough: user.points >= required_points,
            current_points: user.points,
        })
    }

    pub async fn deduct(
        &self,
        user_id: i64,
        request: DeductPointsRequest,
    ) -> AppResult<DeductOutcome> {
        ensure_positive(request.points)?;
        let points = request.points;

        let txn = self.pool.begin().await?;
        find_user(&txn, user_id).await?;

        let result = users::Entity::update_many()
            .col_expr(
                users::Column::Points,
                Expr::col(users::Column::Points).sub(points),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(user_id))
            .filter(users::Column::Points.gte(points))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            let current = find_user(&txn, user_id).await?;
            txn.rollback().await?;
            log::info!(
                "Insufficient points for user {user_id}: required {points}, current {}",
                current.points
            );
            return Ok(DeductOutcome::Insufficient {
                current_points: current.points,
            });
        }

        let after = find_user(&txn, user_id).await?;

        record_transaction(
            &txn,
            NewTransaction {
                user_id,
                transaction_type: TransactionType::Other,
                amount: points,
                is_debit: true,
                description: describe(
                    "Deducted",
                    points,
                    request.operation.as_deref(),
                    request.reason.as_deref(),
                ),
                admin_id: None,
            },
        )
        .await?;

        AuditService::record(
            &txn,
            user_id,
            ActionType::Points,
            ActionDetails::PointsDeducted {
                points,
                previous_points: after.points + points,
                new_points: after.points,
                operation: request.operation,
                reason: request.reason,
            },
        )
        .await?;

        txn.commit().await?;

        log::info!(
            "Deducted {points} points from user {user_id}, balance {}",
            after.points
        );
        Ok(DeductOutcome::Deducted {
            new_points: after.points,
        })
    }

    /// 用户自身入账（奖励或退款）
    pub async fn add(&self, user_id: i64, request: AddPointsRequest) -> AppResult<AddPointsResponse> {
        ensure_positive(request.points)?;
        let kind = request.credit_kind();
        if kind == CreditKind::AdminAward {
            return Err(AppError::ValidationError(
                "kind must be one of: award, refund".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;
        let user = self
            .apply_credit(
                &txn,
                user_id,
                kind,
                request.points,
                request.operation,
                request.reason,
                None,
            )
            .await?;
        txn.commit().await?;

        Ok(AddPointsResponse {
            success: true,
            new_points: user.points,
            all_points: user.all_points,
            level: user.level,
        })
    }

    /// 管理员为指定用户发放积分，始终按普通奖励处理。
    /// 目标用户与管理员各自留下一条审计日志。
    pub async fn admin_add(
        &self,
        actor_id: i64,
        request: AdminAddPointsRequest,
    ) -> AppResult<AdminAddPointsResponse> {
        ensure_positive(request.points)?;
        let target_user_id = request.user_id;

        let txn = self.pool.begin().await?;
        let user = self
            .apply_credit(
                &txn,
                target_user_id,
                CreditKind::AdminAward,
                request.points,
                None,
                request.reason.clone(),
                Some(actor_id),
            )
            .await?;

        AuditService::record(
            &txn,
            actor_id,
            ActionType::Admin,
            ActionDetails::AdminAddPoints {
                target_user_id,
                points: request.points,
                new_points: user.points,
                reason: request.reason,
            },
        )
        .await?;

        txn.commit().await?;

        log::info!(
            "Admin {actor_id} added {} points to user {target_user_id}",
            request.points
        );
        Ok(AdminAddPointsResponse {
            success: true,
            user_id: user.id,
            username: user.username,
            new_points: user.points,
            all_points: user.all_points,
            level: user.level,
        })
    }

    /// 用户积分流水（倒序）
    pub async fn list_transactions(
        &self,
        user_id: i64,
        query: &TransactionQuery,
    ) -> AppResult<Vec<TransactionResponse>> {
        let limit = PaginationParams::new(None, query.limit).get_limit();

        let select = pt::Entity::find().filter(pt::Column::UserId.eq(user_id));
        let select = match query.transaction_type {
            Some(t) => select.filter(pt::Column::TransactionType.eq(t)),
            None => select.filter(pt::Column::TransactionType.is_in(TransactionType::LEDGER_TYPES)),
        };

        let list = select
            .order_by_desc(pt::Column::CreatedAt)
            .order_by_desc(pt::Column::Id)
            .limit(limit)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(TransactionResponse::from).collect())
    }

    /// 管理员分页查询积分流水，支持按用户与日期区间筛选
    pub async fn admin_list_transactions(
        &self,
        query: &AdminTransactionQuery,
    ) -> AppResult<AdminTransactionListResponse> {
        let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())?;
        let params = query.pagination();

        let mut select = pt::Entity::find()
            .filter(pt::Column::TransactionType.is_in(TransactionType::LEDGER_TYPES));
        if let Some(user_id) = query.user_id {
            select = select.filter(pt::Column::UserId.eq(user_id));
        }
        if let Some(start) = range.start {
            select = select.filter(pt::Column::CreatedAt.gte(start));
        }
        if let Some(end) = range.end {
            select = select.filter(pt::Column::CreatedAt.lt(end));
        }

        let total = select.clone().count(&self.pool).await?;

        let transactions = select
            .order_by_desc(pt::Column::CreatedAt)
            .order_by_desc(pt::Column::Id)
            .offset(params.get_offset())
            .limit(params.get_limit())
            .all(&self.pool)
            .await?
            .into_iter()
            .map(TransactionResponse::from)
            .collect();

        Ok(AdminTransactionListResponse {
            transactions,
            pagination: Pagination::new(&params, total),
        })
    }

    // -----------------------------
    // 内部辅助方法
    // -----------------------------

    /// 在事务内入账并写流水与审计日志，返回更新后的用户
    #[allow(clippy::too_many_arguments)]
    async fn apply_credit(
        &self,
        txn: &DatabaseTransaction,
        user_id: i64,
        kind: CreditKind,
        points: i64,
        operation: Option<String>,
        reason: Option<String>,
        admin_id: Option<i64>,
    ) -> AppResult<users::Model> {
        // 先确认用户存在，避免对不存在的用户静默更新 0 行
        let before = find_user(txn, user_id).await?;

        let counts_toward_level = !kind.is_refund();
        let fits = before.points.checked_add(points).is_some()
            && (!counts_toward_level || before.all_points.checked_add(points).is_some());
        if !fits {
            return Err(AppError::ValidationError(
                "points would overflow the balance".to_string(),
            ));
        }

        let mut update = users::Entity::update_many()
            .col_expr(
                users::Column::Points,
                Expr::col(users::Column::Points).add(points),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()));
        if counts_toward_level {
            update = update.col_expr(
                users::Column::AllPoints,
                Expr::col(users::Column::AllPoints).add(points),
            );
        }
        update
            .filter(users::Column::Id.eq(user_id))
            .exec(txn)
            .await?;

        let mut user = find_user(txn, user_id).await?;

        if counts_toward_level {
            let level = level_for(user.all_points);
            if level != user.level {
                users::Entity::update_many()
                    .col_expr(users::Column::Level, Expr::value(level))
                    .filter(users::Column::Id.eq(user_id))
                    .exec(txn)
                    .await?;
                if level > user.level {
                    log::info!("User {user_id} reached level {level}");
                }
                user.level = level;
            }
        }

        let (transaction_type, action_type, verb) = if kind.is_refund() {
            (TransactionType::Refund, ActionType::Refund, "Refunded")
        } else {
            (TransactionType::PointsAward, ActionType::PointsReward, "Awarded")
        };

        record_transaction(
            txn,
            NewTransaction {
                user_id,
                transaction_type,
                amount: points,
                is_debit: false,
                description: describe(verb, points, operation.as_deref(), reason.as_deref()),
                admin_id,
            },
        )
        .await?;

        let details = if kind.is_refund() {
            ActionDetails::PointsRefunded {
                points,
                new_points: user.points,
                operation,
                reason,
            }
        } else {
            ActionDetails::PointsAwarded {
                points,
                new_points: user.points,
                all_points: user.all_points,
                level: user.level,
                operation,
                reason,
                awarded_by: admin_id,
            }
        };
        AuditService::record(txn, user_id, action_type, details).await?;

        log::info!(
            "{verb} {points} points to user {user_id}, balance {}",
            user.points
        );
        Ok(user)
    }
}
