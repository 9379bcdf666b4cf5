use dotenvy::dotenv;

use expediente::config::server::ServerConfig;
use expediente::logging::init_tracing;
use expediente::router::init_router;
use expediente::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    init_tracing();

    let state = init_app_state().await;
    let app = init_router(state);

    let server_config = ServerConfig::from_env();
    let listener = tokio::net::TcpListener::bind(server_config.addr())
        .await
        .expect("Failed to bind server address");
    println!("🚀 Server running on http://{}", server_config.addr());
    println!(
        "📚 Swagger UI available at http://{}/swagger-ui",
        server_config.addr()
    );
    println!(
        "📖 Scalar UI available at http://{}/scalar",
        server_config.addr()
    );
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
