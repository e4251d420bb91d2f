use crate::{
    channels::{list_channels, Channel, ChannelPage, ChannelQuery, Metric, Period},
    config::Config,
    enrich::Enricher,
    metadata::{Cancellation, ChannelMetadata, MetadataResolver, ResolveRequest},
    platform::{normalize_handle, parse_platform_filter, Platform},
};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::signal;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unexpected error: {0:?}")]
    Other(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct SharedState {
    pub resolver: Arc<MetadataResolver>,
    pub catalogue: Arc<Vec<Channel>>,
    pub enricher: Arc<Enricher>,
    pub config: Arc<Config>,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/channels", get(channels))
        .route("/api/channels/resolve", get(resolve))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO))
                .on_response(tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO)),
        )
        .with_state(Arc::new(state))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::warn!("shutting down");
}

async fn start_app(state: SharedState) -> anyhow::Result<()> {
    let listen = state.config.server.listen.clone();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    log::info!("listening on {listen}");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

pub fn start_daemon(state: SharedState) -> anyhow::Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async { start_app(state).await })
}

#[derive(Debug)]
struct HttpError(AppError);

impl IntoResponse for HttpError {
    fn into_response(self) -> axum::response::Response {
        match self.0 {
            AppError::InvalidRequest(_) => (
                axum::http::StatusCode::BAD_REQUEST,
                Json(json!({"error": self.0.to_string()})),
            ),
            AppError::Other(_) => {
                log::error!("{self:?}");
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": self.0.to_string()})),
                )
            }
        }
        .into_response()
    }
}

impl<E> From<E> for HttpError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListChannelsRequest {
    pub platform: Option<String>,
    pub period: Option<String>,
    pub metric: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,

    /// Skip metadata resolution and return catalogue values as-is.
    #[serde(default)]
    pub no_enrich: bool,
}

async fn channels(
    State(state): State<Arc<SharedState>>,
    Query(payload): Query<ListChannelsRequest>,
) -> Result<Json<ChannelPage>, HttpError> {
    log::debug!("payload: {payload:?}");

    let listing = &state.config.listing;
    let query = ChannelQuery {
        platform: parse_platform_filter(payload.platform.as_deref())
            .map_err(|e| AppError::InvalidRequest(e.to_string()))?,
        period: Period::parse_lenient(payload.period.as_deref()),
        metric: Metric::parse_lenient(payload.metric.as_deref()),
        page: payload.page.unwrap_or(1),
        per_page: payload.per_page.unwrap_or(listing.default_per_page),
    };

    let mut page = list_channels(&state.catalogue, &query, listing.max_per_page);

    if !payload.no_enrich {
        tokio::task::block_in_place(|| {
            state.enricher.enrich(&state.resolver, &mut page.channels, &Cancellation::new())
        });
    }

    Ok(Json(page))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolveChannelRequest {
    pub platform: String,
    pub handle: String,
    pub fallback_url: Option<String>,
    pub fallback_profile_image: Option<String>,
}

async fn resolve(
    State(state): State<Arc<SharedState>>,
    Query(payload): Query<ResolveChannelRequest>,
) -> Result<Json<ChannelMetadata>, HttpError> {
    log::debug!("payload: {payload:?}");

    let platform = payload
        .platform
        .parse::<Platform>()
        .map_err(|e| AppError::InvalidRequest(e.to_string()))?;
    if normalize_handle(&payload.handle).is_empty() {
        return Err(AppError::InvalidRequest("handle must not be empty".into()).into());
    }

    let req = ResolveRequest::new(platform, payload.handle)
        .with_fallbacks(payload.fallback_url, payload.fallback_profile_image);
    let resolver = state.resolver.clone();

    let meta = tokio::task::block_in_place(move || resolver.resolve(&req));
    Ok(Json(meta))
}
