use task_offload_api::server::build_router;
use task_offload_api::tasks::executor::TaskExecutor;
use task_offload_api::tasks::registry::TaskRegistry;
use task_offload_api::users::store::UserStore;

use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut bind_addr: SocketAddr = "127.0.0.1:3000".parse()?;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                bind_addr = args[i + 1].parse()?;
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    // 1. Shared components (one instance each for the process lifetime):
    let registry = TaskRegistry::new();
    let executor = TaskExecutor::new(registry.clone());
    let users = UserStore::new();

    // 2. HTTP router:
    let app = build_router(registry, executor, users);

    // 3. Serve:
    tracing::info!("HTTP server listening on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
