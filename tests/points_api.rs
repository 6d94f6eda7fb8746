//! HTTP 层集成测试：内存 SQLite + 完整中间件栈

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, Error, test, web};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use points_backend::AppError;
use points_backend::config::CorsConfig;
use points_backend::entities::UserRole;
use points_backend::handlers;
use points_backend::middlewares::{AuthMiddleware, create_cors};
use points_backend::services::{AuditService, PointsService};
use points_backend::test_support::{insert_user, test_db};
use points_backend::utils::JwtService;

const SECRET: &str = "integration-secret";

fn token_for(user_id: i64, role: UserRole) -> String {
    JwtService::new(SECRET, 3600)
        .generate_access_token(user_id, role)
        .unwrap()
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

macro_rules! init_app {
    ($db:expr) => {{
        let db: DatabaseConnection = $db;
        test::init_service(
            App::new()
                .wrap(AuthMiddleware::new(JwtService::new(SECRET, 3600)))
                .wrap(create_cors(&CorsConfig::default()))
                .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                    AppError::ValidationError(err.to_string()).into()
                }))
                .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                    AppError::ValidationError(err.to_string()).into()
                }))
                .app_data(web::Data::new(PointsService::new(db.clone())))
                .app_data(web::Data::new(AuditService::new(db)))
                .service(web::scope("/api/v1").configure(handlers::points_config)),
        )
        .await
    }};
}

/// 中间件拒绝时返回 Err，这里统一转换为 (状态码, JSON)
async fn send<S, R, B>(app: &S, req: R) -> (StatusCode, Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            let body = test::read_body(resp).await;
            (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
            (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
        }
    }
}

#[actix_web::test]
async fn rejects_requests_without_token() {
    let db = test_db().await;
    let app = init_app!(db);

    let req = test::TestRequest::get()
        .uri("/api/v1/points/balance")
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "AUTH_ERROR");

    let req = test::TestRequest::get()
        .uri("/api/v1/points/balance")
        .insert_header(bearer("not-a-jwt"))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn accepts_token_in_query_string() {
    let db = test_db().await;
    let user_id = insert_user(&db, "layla", UserRole::User, 70, 70).await.id;
    let app = init_app!(db);

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/points/balance?token={}",
            token_for(user_id, UserRole::User)
        ))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"points": 70, "allPoints": 70, "level": 1}));
}

#[actix_web::test]
async fn admin_routes_require_admin_role() {
    let db = test_db().await;
    let user_id = insert_user(&db, "omar", UserRole::User, 0, 0).await.id;
    let app = init_app!(db);
    let token = token_for(user_id, UserRole::User);

    let req = test::TestRequest::get()
        .uri("/api/v1/points/admin/transactions")
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let req = test::TestRequest::post()
        .uri("/api/v1/points/admin/add")
        .insert_header(bearer(&token))
        .set_json(json!({"userId": user_id, "points": 100}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn add_then_deduct_over_http() {
    let db = test_db().await;
    let user_id = insert_user(&db, "sara", UserRole::User, 100, 100_000).await.id;
    let app = init_app!(db);
    let token = token_for(user_id, UserRole::User);

    let req = test::TestRequest::post()
        .uri("/api/v1/points/add")
        .insert_header(bearer(&token))
        .set_json(json!({"points": 50, "operation": "bonus"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "newPoints": 150, "allPoints": 100050, "level": 5})
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/points/deduct")
        .insert_header(bearer(&token))
        .set_json(json!({"points": 200}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "لا يوجد رصيد كافي من النقاط");
    assert_eq!(body["currentPoints"], 150);

    let req = test::TestRequest::post()
        .uri("/api/v1/points/check")
        .insert_header(bearer(&token))
        .set_json(json!({"requiredPoints": 150}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"hasEnough": true, "currentPoints": 150}));

    let req = test::TestRequest::post()
        .uri("/api/v1/points/deduct")
        .insert_header(bearer(&token))
        .set_json(json!({"points": 150, "operation": "generate_post"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "newPoints": 0}));

    let req = test::TestRequest::get()
        .uri("/api/v1/points/transactions")
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["type"], "other");
    assert_eq!(list[0]["isDebit"], true);
    assert_eq!(list[1]["type"], "points_award");
}

#[actix_web::test]
async fn malformed_points_are_validation_errors() {
    let db = test_db().await;
    let user_id = insert_user(&db, "nour", UserRole::User, 10, 10).await.id;
    let app = init_app!(db);
    let token = token_for(user_id, UserRole::User);

    for payload in [
        json!({"points": "ten"}),
        json!({"operation": "x"}),
        json!({"points": -3}),
        json!({"points": 0}),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/points/add")
            .insert_header(bearer(&token))
            .set_json(payload.clone())
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/points/transactions")
        .insert_header(bearer(&token))
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn admin_add_and_listings() {
    let db = test_db().await;
    let admin_id = insert_user(&db, "admin", UserRole::Admin, 0, 0).await.id;
    let target_id = insert_user(&db, "khaled", UserRole::User, 0, 0).await.id;
    let app = init_app!(db);
    let token = token_for(admin_id, UserRole::Admin);

    for _ in 0..3 {
        let req = test::TestRequest::post()
            .uri("/api/v1/points/admin/add")
            .insert_header(bearer(&token))
            .set_json(json!({"userId": target_id, "points": 100, "reason": "weekly"}))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["userId"], target_id);
        assert_eq!(body["username"], "khaled");
    }

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/points/admin/transactions?userId={target_id}&limit=2&page=2"
        ))
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["pagination"],
        json!({"total": 3, "page": 2, "limit": 2, "pages": 2})
    );
    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["adminId"], admin_id);
    assert_eq!(transactions[0]["description"], "weekly");

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/points/admin/actions?userId={admin_id}&actionType=admin"
        ))
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["actions"][0]["details"]["action"], "admin_add_points");

    let req = test::TestRequest::get()
        .uri("/api/v1/points/admin/transactions?startDate=2025-13-01")
        .insert_header(bearer(&token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn refund_operation_keeps_level() {
    let db = test_db().await;
    let user_id = insert_user(&db, "hiba", UserRole::User, 10, 24_990).await.id;
    let app = init_app!(db);
    let token = token_for(user_id, UserRole::User);

    let req = test::TestRequest::post()
        .uri("/api/v1/points/add")
        .insert_header(bearer(&token))
        .set_json(json!({"points": 40, "operation": "refund_post"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "newPoints": 50, "allPoints": 24990, "level": 1})
    );

    let req = test::TestRequest::get()
        .uri("/api/v1/points/transactions?type=refund")
        .insert_header(bearer(&token))
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}
