use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/donations", donation_routes())
        .nest("/final_donations", final_donation_routes())
        .nest("/articles", article_routes())
        .nest("/payments", payment_routes())
        .nest("/admin", admin_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn donation_routes() -> OpenApiRouter<AppState> {
    use handlers::donation::*;

    OpenApiRouter::new()
        .routes(routes!(list_donations, create_donation))
        .routes(routes!(
            get_donation,
            update_donation,
            patch_donation,
            delete_donation
        ))
        .layer(donation_body_limit())
}

fn final_donation_routes() -> OpenApiRouter<AppState> {
    use handlers::final_donation::*;

    OpenApiRouter::new()
        .routes(routes!(list_final_donations, create_final_donation))
        .routes(routes!(list_my_final_donations))
        .routes(routes!(list_user_final_donations))
}

fn article_routes() -> OpenApiRouter<AppState> {
    use handlers::article::*;

    OpenApiRouter::new()
        .routes(routes!(list_articles, create_article))
        .routes(routes!(get_article, update_article, delete_article))
}

fn payment_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::payment::create_payment))
        .routes(routes!(handlers::payment::payment_status))
}

fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::admin::dashboard))
}
