use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

use crate::error::AppResult;
use crate::middlewares::{AuthUser, current_user};
use crate::models::*;
use crate::services::{AuditService, DeductOutcome, INSUFFICIENT_POINTS_MESSAGE, PointsService};

fn admin_user(req: &HttpRequest) -> AppResult<AuthUser> {
    let user = current_user(req)?;
    user.require_admin()?;
    Ok(user)
}

#[utoipa::path(
    post,
    path = "/points/check",
    tag = "points",
    request_body = CheckPointsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "余额检查结果", body = CheckPointsResponse),
        (status = 400, description = "请求参数错误"),
        (status = 401, description = "未授权"),
        (status = 404, description = "用户不存在")
    )
)]
pub async fn check_points(
    points_service: web::Data<PointsService>,
    req: HttpRequest,
    request: web::Json<CheckPointsRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match points_service
        .check_balance(user.id, request.required_points)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/points/deduct",
    tag = "points",
    request_body = DeductPointsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "扣减成功", body = DeductPointsResponse),
        (status = 400, description = "积分不足或请求参数错误", body = InsufficientPointsResponse),
        (status = 401, description = "未授权"),
        (status = 404, description = "用户不存在")
    )
)]
pub async fn deduct_points(
    points_service: web::Data<PointsService>,
    req: HttpRequest,
    request: web::Json<DeductPointsRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match points_service.deduct(user.id, request.into_inner()).await {
        Ok(DeductOutcome::Deducted { new_points }) => {
            Ok(HttpResponse::Ok().json(DeductPointsResponse {
                success: true,
                new_points,
            }))
        }
        Ok(DeductOutcome::Insufficient { current_points }) => {
            Ok(HttpResponse::BadRequest().json(InsufficientPointsResponse {
                success: false,
                message: INSUFFICIENT_POINTS_MESSAGE.to_string(),
                current_points,
            }))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/points/add",
    tag = "points",
    request_body = AddPointsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "入账成功", body = AddPointsResponse),
        (status = 400, description = "请求参数错误"),
        (status = 401, description = "未授权"),
        (status = 404, description = "用户不存在")
    )
)]
pub async fn add_points(
    points_service: web::Data<PointsService>,
    req: HttpRequest,
    request: web::Json<AddPointsRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match points_service.add(user.id, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/points/transactions",
    tag = "points",
    params(
        ("type" = Option<TransactionType>, Query, description = "流水类型"),
        ("limit" = Option<u64>, Query, description = "返回条数，默认 100")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "当前用户的积分流水（倒序）", body = [TransactionResponse]),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_transactions(
    points_service: web::Data<PointsService>,
    req: HttpRequest,
    query: web::Query<TransactionQuery>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match points_service.list_transactions(user.id, &query).await {
        Ok(list) => Ok(HttpResponse::Ok().json(list)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/points/balance",
    tag = "points",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "当前余额", body = BalanceResponse),
        (status = 401, description = "未授权"),
        (status = 404, description = "用户不存在")
    )
)]
pub async fn get_balance(
    points_service: web::Data<PointsService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match points_service.get_balance(user.id).await {
        Ok(balance) => Ok(HttpResponse::Ok().json(balance)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/points/admin/add",
    tag = "points-admin",
    request_body = AdminAddPointsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "发放成功", body = AdminAddPointsResponse),
        (status = 400, description = "请求参数错误"),
        (status = 401, description = "未授权"),
        (status = 403, description = "需要管理员权限"),
        (status = 404, description = "目标用户不存在")
    )
)]
pub async fn admin_add_points(
    points_service: web::Data<PointsService>,
    req: HttpRequest,
    request: web::Json<AdminAddPointsRequest>,
) -> Result<HttpResponse> {
    let admin = match admin_user(&req) {
        Ok(admin) => admin,
        Err(e) => return Ok(e.error_response()),
    };

    match points_service.admin_add(admin.id, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/points/admin/transactions",
    tag = "points-admin",
    params(
        ("userId" = Option<i64>, Query, description = "按用户筛选"),
        ("startDate" = Option<String>, Query, description = "开始日期 (YYYY-MM-DD)"),
        ("endDate" = Option<String>, Query, description = "结束日期 (YYYY-MM-DD，包含当天)"),
        ("limit" = Option<u64>, Query, description = "每页数量，默认 100"),
        ("page" = Option<u64>, Query, description = "页码，默认 1")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "积分流水分页列表", body = AdminTransactionListResponse),
        (status = 400, description = "日期格式错误"),
        (status = 401, description = "未授权"),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn admin_get_transactions(
    points_service: web::Data<PointsService>,
    req: HttpRequest,
    query: web::Query<AdminTransactionQuery>,
) -> Result<HttpResponse> {
    if let Err(e) = admin_user(&req) {
        return Ok(e.error_response());
    }

    match points_service.admin_list_transactions(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/points/admin/actions",
    tag = "points-admin",
    params(
        ("userId" = Option<i64>, Query, description = "按用户筛选"),
        ("actionType" = Option<ActionType>, Query, description = "按行为类型筛选"),
        ("limit" = Option<u64>, Query, description = "每页数量，默认 100"),
        ("page" = Option<u64>, Query, description = "页码，默认 1")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "审计日志分页列表", body = AdminActionListResponse),
        (status = 401, description = "未授权"),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn admin_get_actions(
    audit_service: web::Data<AuditService>,
    req: HttpRequest,
    query: web::Query<AdminActionQuery>,
) -> Result<HttpResponse> {
    if let Err(e) = admin_user(&req) {
        return Ok(e.error_response());
    }

    match audit_service.list_actions(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn points_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/points")
            .route("/check", web::post().to(check_points))
            .route("/deduct", web::post().to(deduct_points))
            .route("/add", web::post().to(add_points))
            .route("/transactions", web::get().to(get_transactions))
            .route("/balance", web::get().to(get_balance))
            .route("/admin/add", web::post().to(admin_add_points))
            .route("/admin/transactions", web::get().to(admin_get_transactions))
            .route("/admin/actions", web::get().to(admin_get_actions)),
    );
}
