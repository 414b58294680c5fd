use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

use crate::api::{
    ApiAnalyzeRequest, ApiAnalyzeResponse, ApiHealthResponse, ApiOptimizeRequest,
    ApiOptimizeResponse, ApiScoreRequest, ApiScoreResponse,
};
use tone_of_voice::config::ToneConfig;
use tone_of_voice::llm::{CompletionOptions, GenerationBackend, OpenAiCompatibleBackend};
use tone_of_voice::{optimize, score, signature_schema, AnalyzeError, Analyzer};

#[derive(Clone)]
struct AppState {
    analyzer: Arc<Analyzer>,
    backend: Option<Arc<dyn GenerationBackend>>,
    options: CompletionOptions,
}

pub async fn serve(args: crate::ServeArgs, config: ToneConfig) -> Result<(), String> {
    let backend = OpenAiCompatibleBackend::from_config(&config.backend)
        .map(|backend| Arc::new(backend) as Arc<dyn GenerationBackend>);
    if backend.is_none() {
        info!(
            key = %config.backend.api_key_env,
            "no API key set: /analyze is unavailable and /optimize uses the heuristic rewrite"
        );
    }

    let state = AppState {
        analyzer: Arc::new(Analyzer::new(&config.analysis)),
        backend,
        options: config.backend.completion_options(),
    };

    let api = Router::new()
        .route("/health", get(health))
        .route("/schema", get(schema))
        .route("/analyze", post(analyze_handler))
        .route("/optimize", post(optimize_handler))
        .route("/score", post(score_handler));

    let mut app = Router::new().merge(api.clone()).nest("/api", api);
    if let Some(web_root) = args.web_root {
        let index_path = format!("{}/index.html", web_root.trim_end_matches('/'));
        let static_service = ServeDir::new(web_root).not_found_service(ServeFile::new(index_path));
        app = app.fallback_service(static_service);
    }
    let app = app.with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;

    info!(%addr, "listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await.map_err(|err| {
        format!("failed to bind server: {}", err)
    })?, app)
    .await
    .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(ApiHealthResponse {
        ok: true,
        schema: signature_schema().clone(),
    })
}

async fn schema() -> impl IntoResponse {
    Json(signature_schema().clone())
}

async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiAnalyzeRequest>,
) -> Result<Json<ApiAnalyzeResponse>, (StatusCode, String)> {
    let corpus = request.corpus();
    // fail on an empty corpus before checking the backend
    state
        .analyzer
        .metrics_engine()
        .normalize(&corpus)
        .map_err(error_response)?;

    let backend = state.backend.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "signature synthesis not configured: set the backend API key".to_string(),
        )
    })?;

    let analysis = state
        .analyzer
        .analyze(
            backend.as_ref(),
            &corpus,
            request.lang.as_deref(),
            request.brand.as_deref(),
            &state.options,
        )
        .await
        .map_err(error_response)?;

    Ok(Json(ApiAnalyzeResponse::from_analysis(analysis)))
}

async fn optimize_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiOptimizeRequest>,
) -> Result<Json<ApiOptimizeResponse>, (StatusCode, String)> {
    let (signature, request) = request
        .into_parts()
        .map_err(|err| (StatusCode::BAD_REQUEST, err))?;
    let result = optimize(state.backend.as_deref(), &signature, &request, &state.options).await;
    Ok(Json(result.into()))
}

async fn score_handler(
    Json(request): Json<ApiScoreRequest>,
) -> Result<Json<ApiScoreResponse>, (StatusCode, String)> {
    let policy = request
        .policy()
        .map_err(|err| (StatusCode::BAD_REQUEST, err))?;
    Ok(Json(score(&request.text, &policy).into()))
}

fn error_response(err: AnalyzeError) -> (StatusCode, String) {
    match err {
        AnalyzeError::EmptyCorpus => (StatusCode::BAD_REQUEST, err.to_string()),
        AnalyzeError::Synthesis(_) => (StatusCode::BAD_GATEWAY, err.to_string()),
    }
}
