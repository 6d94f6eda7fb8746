use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 积分入账类型。退款只恢复可用积分，不计入累计积分与等级
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CreditKind {
    Award,
    Refund,
    /// 仅管理员接口使用
    AdminAward,
}

impl CreditKind {
    pub fn is_refund(self) -> bool {
        matches!(self, CreditKind::Refund)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckPointsRequest {
    #[schema(example = 500)]
    pub required_points: i64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckPointsResponse {
    pub has_enough: bool,
    pub current_points: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeductPointsRequest {
    #[schema(example = 200)]
    pub points: i64,
    #[schema(example = "generate_post")]
    pub operation: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeductPointsResponse {
    pub success: bool,
    pub new_points: i64,
}

/// 余额不足时返回的业务结果（HTTP 400）
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsufficientPointsResponse {
    pub success: bool,
    pub message: String,
    pub current_points: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPointsRequest {
    #[schema(example = 50)]
    pub points: i64,
    #[schema(example = "bonus")]
    pub operation: Option<String>,
    pub reason: Option<String>,
    /// 未传时按 operation 推断：包含 "refund" 视为退款
    pub kind: Option<CreditKind>,
}

impl AddPointsRequest {
    pub fn credit_kind(&self) -> CreditKind {
        self.kind.unwrap_or_else(|| {
            if self
                .operation
                .as_deref()
                .is_some_and(|op| op.contains("refund"))
            {
                CreditKind::Refund
            } else {
                CreditKind::Award
            }
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPointsResponse {
    pub success: bool,
    pub new_points: i64,
    pub all_points: i64,
    pub level: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminAddPointsRequest {
    #[schema(example = 7)]
    pub user_id: i64,
    #[schema(example = 1000)]
    pub points: i64,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminAddPointsResponse {
    pub success: bool,
    pub user_id: i64,
    pub username: String,
    pub new_points: i64,
    pub all_points: i64,
    pub level: i32,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub points: i64,
    pub all_points: i64,
    pub level: i32,
}
