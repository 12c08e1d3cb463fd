use crate::backup::{export_document, parse_document, to_pretty_json};
use crate::errors::AppError;
use crate::models::{
    AddTaskRequest, AppData, CHUNKS_PER_TASK, ImportResponse, MINUTES_PER_CHUNK, ProgressRequest,
    SessionResponse, StatsResponse, SuggestionRequest, SuggestionResponse, TasksResponse,
};
use crate::registry::{TaskRegistry, clamp_progress, next_progress};
use crate::rollover::{Rollover, run_rollover};
use crate::state::AppState;
use crate::stats::{StatsQuery, build_stats};
use crate::storage::{persist_data, persist_log, persist_tasks};
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse},
};
use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

/// Runs the day rollover for a new session and persists whatever changed.
pub async fn open_session(state: &AppState, today: NaiveDate) -> Result<Rollover, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let outcome = run_rollover(&mut next, today);

    match &outcome {
        Rollover::FirstVisit => info!("first visit recorded for {today}"),
        Rollover::SameDay => debug!("session continues on {today}"),
        Rollover::DayChanged { previous, archived: Some(entry) } => info!(
            "closed {previous}: {} chunks, {} tasks completed",
            entry.completed_chunks, entry.completed_tasks
        ),
        Rollover::DayChanged { previous, archived: None } => {
            info!("closed {previous} without progress")
        }
    }

    if outcome.changed() {
        persist_data(&state.store, &next).await?;
        *data = next;
    }
    Ok(outcome)
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let today = Local::now().date_naive();
    open_session(&state, today).await?;
    Ok(Html(render_index(&today.to_string())))
}

pub async fn start_session(State(state): State<AppState>) -> Result<Json<SessionResponse>, AppError> {
    let today = Local::now().date_naive();
    let outcome = open_session(&state, today).await?;

    let (rolled_over, archived) = match outcome {
        Rollover::DayChanged { archived, .. } => (true, archived),
        Rollover::FirstVisit | Rollover::SameDay => (false, None),
    };
    Ok(Json(SessionResponse {
        date: today.to_string(),
        rolled_over,
        archived,
    }))
}

pub async fn list_tasks(State(state): State<AppState>) -> Json<TasksResponse> {
    let data = state.data.lock().await;
    Json(tasks_response(&data))
}

pub async fn add_task(
    State(state): State<AppState>,
    Json(payload): Json<AddTaskRequest>,
) -> Result<Json<TasksResponse>, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    if next.tasks.add(&payload.title).is_some() {
        persist_tasks(&state.store, &next).await?;
        *data = next;
    } else {
        debug!("ignored task title {:?}", payload.title);
    }

    Ok(Json(tasks_response(&data)))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TasksResponse>, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    if let Some(task) = next.tasks.delete(&id) {
        persist_tasks(&state.store, &next).await?;
        info!("deleted task {:?}", task.title);
        *data = next;
    }

    Ok(Json(tasks_response(&data)))
}

pub async fn set_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ProgressRequest>,
) -> Result<Json<TasksResponse>, AppError> {
    let count = clamp_progress(payload.count);
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    if next.tasks.update_progress(&id, count).is_some() {
        persist_tasks(&state.store, &next).await?;
        *data = next;
    }

    Ok(Json(tasks_response(&data)))
}

pub async fn click_chunk(
    State(state): State<AppState>,
    Path((id, position)): Path<(String, u32)>,
) -> Result<Json<TasksResponse>, AppError> {
    if position >= CHUNKS_PER_TASK {
        return Err(AppError::bad_request(format!(
            "chunk position must be below {CHUNKS_PER_TASK}"
        )));
    }

    let mut data = state.data.lock().await;
    if let Some(current) = data.tasks.get(&id).map(|task| task.checked) {
        let mut next = data.clone();
        next.tasks.update_progress(&id, next_progress(current, position));
        persist_tasks(&state.store, &next).await?;
        *data = next;
    }

    Ok(Json(tasks_response(&data)))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Json<StatsResponse> {
    let data = state.data.lock().await;
    Json(build_stats(&data.history, data.tasks.tasks(), query.period))
}

pub async fn export_backup(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let data = state.data.lock().await;
    let document = export_document(data.tasks.tasks(), &data.history);
    let body = to_pretty_json(&document).map_err(AppError::internal)?;
    let disposition = format!(
        "attachment; filename=\"chunk-tracker-backup-{}.json\"",
        today_string()
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/json; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

pub async fn import_backup(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ImportResponse>, AppError> {
    let document = parse_document(&body).inspect_err(|err| warn!("rejected backup: {err}"))?;

    let mut data = state.data.lock().await;
    let next = AppData {
        tasks: TaskRegistry::from_tasks(document.tasks),
        history: document.history,
        last_visit_date: data.last_visit_date,
    };
    persist_log(&state.store, &next).await?;
    *data = next;

    info!(
        "imported backup with {} tasks and {} history entries",
        data.tasks.len(),
        data.history.len()
    );
    Ok(Json(ImportResponse {
        ok: true,
        message: "Data imported successfully!".to_string(),
    }))
}

pub async fn suggest(
    State(state): State<AppState>,
    Json(payload): Json<SuggestionRequest>,
) -> Result<Json<SuggestionResponse>, AppError> {
    let ticket = state.tracker.begin();
    let result = state.suggestions.suggest(&payload.topic).await;

    if !state.tracker.is_current(ticket) {
        debug!("discarding suggestions for superseded request");
        return Ok(Json(SuggestionResponse {
            suggestions: Vec::new(),
            stale: true,
        }));
    }

    let suggestions = result.inspect_err(|err| warn!("suggestion request failed: {err}"))?;
    Ok(Json(SuggestionResponse {
        suggestions,
        stale: false,
    }))
}

pub async fn dismiss_suggestions(State(state): State<AppState>) -> Json<SuggestionResponse> {
    state.tracker.dismiss();
    Json(SuggestionResponse {
        suggestions: Vec::new(),
        stale: true,
    })
}

fn tasks_response(data: &AppData) -> TasksResponse {
    TasksResponse {
        date: today_string(),
        chunks_per_task: CHUNKS_PER_TASK,
        minutes_per_chunk: MINUTES_PER_CHUNK,
        tasks: data.tasks.tasks().to_vec(),
    }
}

fn today_string() -> String {
    Local::now().date_naive().to_string()
}
