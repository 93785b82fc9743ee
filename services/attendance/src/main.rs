use std::sync::Arc;

use chrono::Duration;
use sea_orm::Database;
use tracing::info;

use rollcall_core::clock::{Clock, SystemClock};
use rollcall_core::tracing::init_tracing;

use rollcall_attendance::config::AttendanceConfig;
use rollcall_attendance::display::{DISPLAY_PERIOD, TerminalRenderer, run_display};
use rollcall_attendance::domain::code_generator::CodeGenerator;
use rollcall_attendance::infra::admins::FileAdminRegistry;
use rollcall_attendance::router::build_router;
use rollcall_attendance::state::AppState;

#[tokio::main]
async fn main() {
    let config = AttendanceConfig::from_env();
    init_tracing(config.log_format);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let generator = CodeGenerator::new(Duration::seconds(config.code_ttl_secs), clock.clone())
        .expect("invalid CODE_TTL_SECS");
    let generator = Arc::new(generator);

    let admins = FileAdminRegistry::load(&config.admins_file, &config.admin_ids)
        .await
        .expect("failed to load admin list");

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    if config.display_console {
        let source = generator.clone();
        tokio::spawn(async move {
            let renderer = TerminalRenderer::new(std::io::stdout());
            run_display(source.as_ref(), renderer, DISPLAY_PERIOD).await;
        });
    }

    let state = AppState {
        db,
        generator,
        admins: Arc::new(admins),
        clock,
        utc_offset: config.utc_offset,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.attendance_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!(
        code_ttl_secs = config.code_ttl_secs,
        utc_offset = %config.utc_offset,
        "attendance service listening on {addr}"
    );
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .expect("server error");
}
