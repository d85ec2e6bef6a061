use serde::Serialize;

/// Entity totals shown on the admin dashboard.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DashboardResponse {
    #[schema(example = 4)]
    pub total_article: u64,
    #[schema(example = 27)]
    pub total_donation: u64,
    #[schema(example = 9)]
    pub total_payment: u64,
}
