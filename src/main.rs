use research_assistant::server::repository::{GroupRepository, PaperRepository};
use research_assistant::server::router;
use research_assistant::server::service::LibraryService;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Initialise tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "devserver=debug,research_assistant=debug,tower_http=debug".into()
            }),
        )
        .init();

    // ── Dependency wiring ─────────────────────────────────────────────────────
    let service = LibraryService::new(PaperRepository::new(), GroupRepository::new());
    let app = router(service);

    // ── Listen ────────────────────────────────────────────────────────────────
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Development API listening on http://{addr}/api");

    axum::serve(listener, app).await?;
    Ok(())
}
