use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use movie_recommender::{
    create_router,
    services::{OpenAiProvider, RecommendationService},
    AppState, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_recommender=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let provider = OpenAiProvider::from_config(&config)?;
    let recommender = RecommendationService::new(Arc::new(provider), config.openai_temperature);
    let state = Arc::new(AppState::new(Arc::new(recommender)));

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(
        addr = %config.bind_addr(),
        model = %config.openai_model,
        "Server running"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
