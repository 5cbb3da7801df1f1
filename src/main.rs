use axum::{
    routing::{get, patch, post},
    Router,
};
use std::net::SocketAddr;
use talentflow_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware, routes, AppState,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let hr_api = Router::new()
        .route(
            "/api/automation",
            get(routes::automation::list_triggers).post(routes::automation::create_trigger),
        )
        .route(
            "/api/automation/:id",
            get(routes::automation::get_trigger)
                .patch(routes::automation::update_trigger)
                .delete(routes::automation::delete_trigger),
        )
        .route(
            "/api/automation/:id/toggle",
            patch(routes::automation::toggle_trigger),
        )
        .route(
            "/api/notifications/bulk",
            post(routes::notifications::send_bulk),
        )
        .route(
            "/api/candidates",
            get(routes::candidates::list_candidates).post(routes::candidates::create_candidate),
        )
        .route(
            "/api/candidates/count",
            get(routes::candidates::count_candidates),
        )
        .route(
            "/api/candidates/funnel",
            get(routes::candidates::funnel_stats),
        )
        .route(
            "/api/candidates/:id/status",
            post(routes::candidates::update_candidate_status),
        )
        .route(
            "/api/vacancies",
            get(routes::vacancies::list_vacancies).post(routes::vacancies::create_vacancy),
        )
        .route("/api/vacancies/:id", get(routes::vacancies::get_vacancy))
        .route(
            "/api/courses",
            get(routes::courses::list_courses).post(routes::courses::create_course),
        )
        .route(
            "/api/courses/:id",
            get(routes::courses::get_course).delete(routes::courses::delete_course),
        )
        .layer(axum::middleware::from_fn(
            middleware::auth::require_hr_or_admin,
        ))
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::new_rps_state(config.integration_rps),
            middleware::rate_limit::rps_middleware,
        ));

    let student_api = Router::new()
        .route("/api/student/courses", get(routes::student::list_courses))
        .route("/api/student/me", get(routes::student::me))
        .route(
            "/api/student/select-course",
            post(routes::student::select_course),
        )
        .route("/api/student/quiz/submit", post(routes::student::submit_quiz))
        .route("/api/student/offer/accept", post(routes::student::accept_offer))
        .route(
            "/api/student/offer/decline",
            post(routes::student::decline_offer),
        )
        .route(
            "/api/notifications",
            get(routes::notifications::list_notifications),
        )
        .layer(axum::middleware::from_fn(
            middleware::auth::require_bearer_auth,
        ))
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::new_rps_state(config.public_rps),
            middleware::rate_limit::rps_middleware,
        ));

    let catalog_api = Router::new()
        .route(
            "/api/properties",
            get(routes::properties::list_properties).post(routes::properties::create_property),
        )
        .route(
            "/api/properties/:id",
            get(routes::properties::get_property).put(routes::properties::update_property),
        )
        .route("/api/areas", get(routes::catalog::list_areas))
        .route("/api/users", get(routes::catalog::list_catalog_users))
        .layer(axum::middleware::from_fn(
            middleware::auth::require_bearer_auth,
        ))
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::new_rps_state(config.public_rps),
            middleware::rate_limit::rps_middleware,
        ));

    let app = base_routes
        .merge(hr_api)
        .merge(student_api)
        .merge(catalog_api)
        .with_state(app_state)
        .layer(middleware::cors::permissive_cors())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
