//! HTTP routes.

pub mod admin;
pub mod public;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::state::AppState;
use crate::tenancy::resolve_host_tenant;

/// Host-routed public pages plus the path-routed fallback.
pub fn public_routes(state: AppState) -> Router<AppState> {
    let host_routed = Router::new()
        .route(
            "/webinars/{slug}",
            get(public::show_webinar).post(public::submit_registration),
        )
        .route_layer(middleware::from_fn_with_state(state, resolve_host_tenant));

    Router::new().merge(host_routed).route(
        "/client/{tenant_slug}/webinars/{slug}",
        get(public::show_client_webinar).post(public::submit_client_registration),
    )
}

/// Bearer-protected admin API, mounted under `/admin`.
pub fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/tenants",
            post(admin::create_tenant).get(admin::list_tenants),
        )
        .route(
            "/tenants/{id}",
            get(admin::get_tenant).delete(admin::delete_tenant),
        )
        .route(
            "/tenants/{id}/webinars",
            post(admin::create_webinar).get(admin::list_webinars),
        )
        .route(
            "/webinars/{id}",
            get(admin::get_webinar)
                .patch(admin::update_webinar)
                .delete(admin::delete_webinar),
        )
        .route("/webinars/{id}/submissions", get(admin::list_submissions))
        .route(
            "/webinars/{id}/submissions/export",
            get(admin::export_submissions),
        )
        .route("/webinars/{id}/stats", get(admin::webinar_stats))
        .route(
            "/webinars/{id}/dispatch",
            get(admin::pending_dispatch).post(admin::run_dispatch),
        )
        .route("/video/webinars", get(admin::upcoming_video_webinars))
        .route_layer(middleware::from_fn_with_state(state, admin::require_admin))
}
