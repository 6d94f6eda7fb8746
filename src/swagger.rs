use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{ActionDetails, ActionType, TransactionType};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::points::check_points,
        handlers::points::deduct_points,
        handlers::points::add_points,
        handlers::points::get_transactions,
        handlers::points::get_balance,
        handlers::points::admin_add_points,
        handlers::points::admin_get_transactions,
        handlers::points::admin_get_actions,
    ),
    components(
        schemas(
            CreditKind,
            CheckPointsRequest,
            CheckPointsResponse,
            DeductPointsRequest,
            DeductPointsResponse,
            InsufficientPointsResponse,
            AddPointsRequest,
            AddPointsResponse,
            AdminAddPointsRequest,
            AdminAddPointsResponse,
            BalanceResponse,
            TransactionType,
            TransactionResponse,
            AdminTransactionListResponse,
            ActionType,
            ActionDetails,
            UserActionResponse,
            AdminActionListResponse,
            Pagination,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "points", description = "Points balance and ledger API"),
        (name = "points-admin", description = "Points administration API"),
    ),
    info(
        title = "Points Ledger API",
        version = "1.0.0",
        description = "Points wallet REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_points_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for path in [
            "/points/check",
            "/points/deduct",
            "/points/add",
            "/points/transactions",
            "/points/balance",
            "/points/admin/add",
            "/points/admin/transactions",
            "/points/admin/actions",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == path), "missing {path}");
        }
    }
}
