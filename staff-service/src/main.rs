use std::{net::SocketAddr, sync::Arc};

use sqlx::sqlite::SqlitePoolOptions;
use staff_service::{
    api::{
        handler::{report, staff},
        router::staff_routes,
        state::StaffAppState,
    },
    config::{AppConfig, ReportSettings},
    domain::{
        search::SearchCriteria, service::StaffDirectoryService, staff::StaffInput,
    },
    infrastructure::{
        report::{ExcelReportRenderer, PdfReportRenderer},
        staff::SqliteStaffRepository,
    },
};
use tokio::net::TcpListener;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        staff::find_all,
        staff::find_by_id,
        staff::create,
        staff::update,
        staff::delete,
        staff::search,
        report::export_excel,
        report::export_pdf,
    ),
    components(schemas(StaffInput, SearchCriteria, shared::types::StaffRecord)),
    tags(
        (name = "Staff", description = "Staff records management"),
        (name = "Reports", description = "Spreadsheet and PDF exports"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let _guard = shared::telemetry::init_telemetry("staff-service");

    let config = AppConfig::from_env().expect("Invalid service configuration");
    let report_settings =
        ReportSettings::load(&config.report_config_path).expect("Failed to load report config");

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .expect("Failed to open the SQLite database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    let staff_service = Arc::new(StaffDirectoryService::new(
        Arc::new(SqliteStaffRepository::new(pool.clone())),
        Arc::new(ExcelReportRenderer::new(&report_settings)),
        Arc::new(PdfReportRenderer::new(&report_settings)),
    ));

    let state = Arc::new(StaffAppState { staff_service });

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(2)
        .burst_size(20)
        .key_extractor(SmartIpKeyExtractor)
        .use_headers()
        .finish()
        .expect("Failed to build governor config");

    let app = staff_routes(state)
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Rate limiting (per-IP, 2 req/s with burst of 20)
        .layer(GovernorLayer::new(governor_conf))
        // The web frontend is served from a different origin
        .layer(CorsLayer::permissive())
        // tracing log (turn request into info level)
        .layer(
            TraceLayer::new_for_http()
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(tower_http::LatencyUnit::Millis),
                ),
        );

    let port = config.port;
    tracing::info!("staff-service listening on 0.0.0.0:{port}");

    let listener = TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("Failed to bind");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shared::shutdown::shutdown_signal())
    .await
    .expect("Oppsie! Server crashed!");

    pool.close().await;
    tracing::info!("staff-service shut down");
}
