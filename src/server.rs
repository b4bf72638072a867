use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tokio::sync::{broadcast, Mutex};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tower_http::services::{ServeDir, ServeFile};
use tracing_subscriber::EnvFilter;

use crate::api::{AnalyzeRequest, AnalyzeResponse, EstimateRequest, EstimateResponse};
use ads_analyzer::analyze_with_config;
use ads_analyzer::config::AnalyzerConfig;
use ads_analyzer::estimate::simulate;
use ads_analyzer::meta_api::MetaAdsClient;
use ads_analyzer::recommend::{evaluate_rules, objective_guidance};
use ads_analyzer::scraper;

#[derive(Clone)]
struct AppState {
    client: Option<MetaAdsClient>,
    config: AnalyzerConfig,
    channels: Arc<Mutex<HashMap<String, broadcast::Sender<StreamEvent>>>>,
}

#[derive(Clone, Serialize)]
struct StreamEvent {
    event: String,
    message: String,
    timestamp_ms: u128,
}

#[derive(serde::Deserialize)]
struct StreamQuery {
    request_id: String,
}

static REQUEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub async fn serve(args: crate::ServeArgs) -> Result<(), String> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    let (config, config_path) = AnalyzerConfig::load(None)?;
    if let Some(path) = config_path {
        tracing::info!("loaded analyzer config from {}", path.display());
    }

    let client = MetaAdsClient::from_env(&config.meta);
    if client.is_none() {
        tracing::warn!(
            "META_ACCESS_TOKEN / META_AD_ACCOUNT_ID not set, analysis endpoints disabled"
        );
    }

    let state = AppState {
        client,
        config,
        channels: Arc::new(Mutex::new(HashMap::new())),
    };

    let web_root = args.web_root;
    let index_path = format!("{}/index.html", web_root.trim_end_matches('/'));
    let static_service = ServeDir::new(web_root).not_found_service(ServeFile::new(index_path));

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/estimate", post(estimate_handler))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/analyze/stream", get(stream_handler))
        .nest_service("/", static_service)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;

    tracing::info!("listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|err| format!("failed to bind server: {}", err))?,
        app,
    )
    .await
    .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn estimate_handler(
    State(state): State<AppState>,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>, (StatusCode, String)> {
    let url = request.url().map_err(|err| (StatusCode::BAD_REQUEST, err))?;
    let mut metadata = scraper::scrape(&url).await;
    request
        .apply_overrides(&mut metadata)
        .map_err(|err| (StatusCode::BAD_REQUEST, err))?;

    let bundle = simulate(metadata);
    let insight = bundle.to_insight();
    let recommendations = evaluate_rules(&insight, None, &state.config.rules);

    Ok(Json(EstimateResponse::from_bundle(bundle, recommendations)))
}

async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, String)> {
    let ad_id = request.ad_id().map_err(|err| (StatusCode::BAD_REQUEST, err))?;
    let range = request.range().map_err(|err| (StatusCode::BAD_REQUEST, err))?;
    let request_id = request
        .request_id
        .clone()
        .unwrap_or_else(generate_request_id);
    let client = state.client.clone().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "Meta API credentials are not configured".to_string(),
        )
    })?;

    let channel = get_or_create_channel(&state, &request_id).await;
    send_event(&channel, "start", "Fetching ad insights");

    let summary = client.insights_summary(&ad_id, range).await.map_err(|err| {
        send_event(&channel, "error", "Insight fetch failed");
        (StatusCode::BAD_GATEWAY, err.to_string())
    })?;

    let mut warnings = Vec::new();

    send_event(&channel, "series", "Fetching daily series");
    let daily = match client.insights_daily(&ad_id, range).await {
        Ok(rows) => rows,
        Err(err) => {
            tracing::warn!("daily insights unavailable for {}: {}", ad_id, err);
            warnings.push(format!("daily insights unavailable: {}", err));
            Vec::new()
        }
    };

    send_event(&channel, "demographics", "Fetching demographic breakdowns");
    let breakdowns = match client.insights_demographics(&ad_id, range).await {
        Ok(rows) => rows,
        Err(err) => {
            tracing::warn!("demographic insights unavailable for {}: {}", ad_id, err);
            warnings.push(format!("demographic insights unavailable: {}", err));
            Vec::new()
        }
    };

    send_event(&channel, "analyzing", "Scoring performance");
    let analysis = analyze_with_config(summary.as_ref(), &daily, &breakdowns, &state.config)
        .ok_or_else(|| {
            send_event(&channel, "error", "No insight data");
            (
                StatusCode::NOT_FOUND,
                format!("no insight data for ad {}", ad_id),
            )
        })?;

    let guidance = request
        .objective
        .as_deref()
        .map(objective_guidance)
        .unwrap_or_default();

    send_event(&channel, "done", "Analysis complete");
    schedule_cleanup(state.channels.clone(), request_id.clone());

    Ok(Json(AnalyzeResponse::from_analysis(
        analysis, ad_id, guidance, warnings, request_id,
    )))
}

async fn stream_handler(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>, StatusCode>
{
    let sender = get_or_create_channel(&state, &query.request_id).await;
    let receiver = sender.subscribe();
    let stream = BroadcastStream::new(receiver).filter_map(|event| match event {
        Ok(event) => {
            let data = serde_json::to_string(&event).unwrap_or_default();
            Some(Ok(Event::default().data(data)))
        }
        Err(_) => None,
    });

    send_event(&sender, "connected", "Streaming analysis progress");
    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(8))))
}

async fn get_or_create_channel(
    state: &AppState,
    request_id: &str,
) -> broadcast::Sender<StreamEvent> {
    let mut guard = state.channels.lock().await;
    if let Some(sender) = guard.get(request_id) {
        return sender.clone();
    }
    let (sender, _) = broadcast::channel(32);
    guard.insert(request_id.to_string(), sender.clone());
    sender
}

fn send_event(sender: &broadcast::Sender<StreamEvent>, event: &str, message: &str) {
    let _ = sender.send(StreamEvent {
        event: event.to_string(),
        message: message.to_string(),
        timestamp_ms: now_ms(),
    });
}

fn schedule_cleanup(
    channels: Arc<Mutex<HashMap<String, broadcast::Sender<StreamEvent>>>>,
    request_id: String,
) {
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(10)).await;
        let mut guard = channels.lock().await;
        guard.remove(&request_id);
    });
}

fn generate_request_id() -> String {
    let counter = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("req-{}-{}", now_ms(), counter)
}

fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis())
        .unwrap_or(0)
}
