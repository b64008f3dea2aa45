use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Form, Json, Router,
};
use repo_sync::{GitSyncClient, LocalOnlySync, SyncClient};
use server_api::{SessionController, SessionError, SessionReport, SessionState};
use shared::{
    domain::RatingTable,
    error::{ApiError, ErrorCode},
    protocol::{Notice, RatingForm, SubmissionResponse},
};
use storage::FileStore;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod presenter;

use app_state::AppState;
use config::{load_settings, Settings};
use presenter::{render_page, PageView};

const MAX_FORM_BYTES: usize = 64 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let session = build_session(&settings).await?;
    let app = build_router(Arc::new(AppState::new(session)));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, repo = %settings.repo_path.display(), sync = settings.sync_enabled, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_session(settings: &Settings) -> anyhow::Result<SessionController> {
    let store = Arc::new(FileStore::in_repo(&settings.repo_path, &settings.data_file)?);

    let sync: Arc<dyn SyncClient> = if settings.sync_enabled {
        Arc::new(GitSyncClient::new(
            settings.repo_path.clone(),
            settings.remote_url(),
        ))
    } else {
        Arc::new(LocalOnlySync)
    };

    // A missing checkout only degrades syncing; the form still works locally.
    if let Err(error) = sync.ensure_checkout().await {
        warn!(
            %error,
            repo = %settings.repo_path.display(),
            "could not prepare the ratings checkout; submissions will stay local until it exists"
        );
    }

    Ok(SessionController::new(store, sync).with_commit_message(settings.commit_message.clone()))
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index).post(submit_form))
        .route("/api/ratings", get(api_list_ratings).post(api_submit))
        .route("/healthz", get(healthz))
        .layer(RequestBodyLimitLayer::new(MAX_FORM_BYTES))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn index(State(state): State<Arc<AppState>>) -> (StatusCode, Html<String>) {
    match state.session.current_table().await {
        Ok(table) => (
            StatusCode::OK,
            Html(render_page(&PageView {
                table: &table,
                notices: &[],
                form: &RatingForm::default(),
            })),
        ),
        Err(e) => {
            error!(error = %e, "failed to load ratings for display");
            let notices = [Notice::error(
                SessionError::Store(e).user_message(),
            )];
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_page(&PageView {
                    table: &RatingTable::new(),
                    notices: &notices,
                    form: &RatingForm::default(),
                })),
            )
        }
    }
}

async fn submit_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RatingForm>,
) -> (StatusCode, Html<String>) {
    let report = run_submission(&state, &form).await;
    let status = status_for(&report);

    // Keep what the user typed when it was rejected so it can be corrected.
    let echo = if report.error().is_some() {
        form
    } else {
        RatingForm::default()
    };

    let html = render_page(&PageView {
        table: &report.table,
        notices: &report.notices,
        form: &echo,
    });
    (status, Html(html))
}

async fn api_list_ratings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RatingTable>, (StatusCode, Json<ApiError>)> {
    let table = state.session.current_table().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new(ErrorCode::Internal, e.to_string())),
        )
    })?;
    Ok(Json(table))
}

async fn api_submit(
    State(state): State<Arc<AppState>>,
    form: Result<Json<RatingForm>, JsonRejection>,
) -> Result<Json<SubmissionResponse>, (StatusCode, Json<ApiError>)> {
    let Json(form) = form.map_err(|rejection| {
        (
            rejection.status(),
            Json(ApiError::new(ErrorCode::Validation, rejection.body_text())),
        )
    })?;
    let report = run_submission(&state, &form).await;
    if let Some(err) = report.error() {
        return Err((status_for(&report), Json(ApiError::from(err))));
    }

    let appended = report.appended();
    let synced = report.trace.contains(&SessionState::Synced);
    let sync_error = report
        .sync_error()
        .map(|e| ApiError::new(ErrorCode::Sync, e.to_string()));

    Ok(Json(SubmissionResponse {
        appended,
        synced,
        sync_error,
        notices: report.notices,
        table: report.table,
    }))
}

async fn run_submission(state: &AppState, form: &RatingForm) -> SessionReport {
    let _guard = state.submit_lock.lock().await;
    state.session.submit(form).await
}

fn status_for(report: &SessionReport) -> StatusCode {
    match report.error() {
        Some(SessionError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(SessionError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        None => StatusCode::OK,
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
