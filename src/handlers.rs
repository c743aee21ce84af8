use crate::errors::{AppError, StoreError};
use crate::models::{
    ChartPoint, DarkModePayload, DayView, EditTaskRequest, NewTaskRequest, Task, WeekQuery,
    WeekResponse, WelcomeResponse,
};
use crate::state::AppState;
use crate::week::{
    bucket_tasks_by_day, compute_progress, compute_week, compute_week_at, completed_per_day, day_id,
    reconcile_selection, short_day_name, today, week_label, Week, WEEK_LEN,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::error;

pub async fn list_tasks(State(state): State<AppState>) -> Json<Vec<Task>> {
    let store = state.tasks.lock().await;
    Json(store.tasks().to_vec())
}

pub async fn add_task(
    State(state): State<AppState>,
    Json(payload): Json<NewTaskRequest>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::bad_request("title must not be blank"));
    }
    let day = payload.date.as_deref().map(parse_date).transpose()?;

    let day_key = day.map(day_id);
    let task = with_store(&state.tasks, move |store| store.add_task(payload.title, day_key)).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn toggle_task(State(state): State<AppState>, Path(id): Path<f64>) -> Result<StatusCode, AppError> {
    with_store(&state.tasks, move |store| store.toggle_task(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn edit_task(
    State(state): State<AppState>,
    Path(id): Path<f64>,
    Json(payload): Json<EditTaskRequest>,
) -> Result<StatusCode, AppError> {
    with_store(&state.tasks, move |store| store.edit_task(id, payload.title)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_task(State(state): State<AppState>, Path(id): Path<f64>) -> Result<StatusCode, AppError> {
    with_store(&state.tasks, move |store| store.delete_task(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_week(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeekResponse>, AppError> {
    let offset = query.offset.unwrap_or(0);
    let today = today();
    let selected = match query.selected.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => today,
    };

    let week = checked_week(compute_week_at(today, offset))?;
    let selected = reconcile_selection(selected, &week);

    let store = state.tasks.lock().await;
    let buckets = bucket_tasks_by_day(store.tasks(), &week);
    let mut selected_progress = 0;
    let days = buckets
        .into_iter()
        .map(|bucket| {
            let progress = compute_progress(&bucket.tasks);
            if bucket.date == selected {
                selected_progress = progress;
            }
            DayView {
                date: bucket.date.to_string(),
                name: short_day_name(bucket.date),
                done_count: bucket.tasks.iter().filter(|task| task.done).count(),
                tasks: bucket.tasks.into_iter().cloned().collect(),
                progress,
            }
        })
        .collect();

    Ok(Json(WeekResponse {
        offset,
        label: week_label(&week),
        start_date: week[0].to_string(),
        end_date: week[WEEK_LEN - 1].to_string(),
        selected: selected.to_string(),
        selected_progress,
        days,
    }))
}

pub async fn get_chart(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<Vec<ChartPoint>>, AppError> {
    let week = checked_week(compute_week(query.offset.unwrap_or(0)))?;
    let store = state.tasks.lock().await;
    Ok(Json(completed_per_day(store.tasks(), &week)))
}

pub async fn get_dark_mode(State(state): State<AppState>) -> Json<DarkModePayload> {
    let preferences = state.preferences.lock().await;
    Json(DarkModePayload {
        dark_mode: preferences.dark_mode(),
    })
}

pub async fn set_dark_mode(
    State(state): State<AppState>,
    Json(payload): Json<DarkModePayload>,
) -> Result<Json<DarkModePayload>, AppError> {
    let enabled = payload.dark_mode;
    with_store(&state.preferences, move |preferences| preferences.set_dark_mode(enabled)).await?;
    Ok(Json(payload))
}

pub async fn get_welcome(State(state): State<AppState>) -> Result<Json<WelcomeResponse>, AppError> {
    let preferences = state.preferences.lock().await;
    Ok(Json(WelcomeResponse {
        seen: preferences.welcome_seen().map_err(store_failure)?,
    }))
}

pub async fn dismiss_welcome(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    with_store(&state.preferences, |preferences| preferences.dismiss_welcome()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Runs a storage write on the blocking pool while holding the store lock.
async fn with_store<S, R, F>(store: &Arc<Mutex<S>>, op: F) -> Result<R, AppError>
where
    S: Send + 'static,
    R: Send + 'static,
    F: FnOnce(&mut S) -> Result<R, StoreError> + Send + 'static,
{
    let store = Arc::clone(store);
    let result = tokio::task::spawn_blocking(move || op(&mut store.blocking_lock()))
        .await
        .map_err(AppError::internal)?;
    result.map_err(store_failure)
}

fn store_failure(err: StoreError) -> AppError {
    error!("storage failure: {err}");
    AppError::from(err)
}

fn checked_week(week: Option<Week>) -> Result<Week, AppError> {
    week.ok_or_else(|| AppError::bad_request("offset out of range"))
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::bad_request("date must be formatted as YYYY-MM-DD"))
}
