use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::constants::{
    DEFAULT_HABIT_COLOR, ERR_HABIT_NAME_REQUIRED, ERR_LOG_FIELDS, MIN_NAME_LEN,
};
use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::{Frequency, Goal, Habit};
use crate::routes::{ok, ApiResponse};
use crate::store::{Entity, Index};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateHabitRequest {
    pub name: Option<String>,
    pub color: Option<String>,
    pub frequency: Option<Frequency>,
    pub goal: Option<Goal>,
}

/// Partial update body; there is deliberately no `logs` field, so a
/// client submitting logs here cannot overwrite history
#[derive(Debug, Deserialize)]
pub struct UpdateHabitRequest {
    pub name: Option<String>,
    pub color: Option<String>,
    pub frequency: Option<Frequency>,
    pub goal: Option<Goal>,
}

#[derive(Debug, Deserialize)]
pub struct LogRequest {
    pub date: Option<String>,
    pub value: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct HabitListResponse {
    pub items: Vec<Habit>,
    pub next: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    pub id: String,
    pub deleted: bool,
}

/// The per-user listing index, `habits:<userId>`
fn user_habits_index(db: &Db, user_id: &str) -> Index {
    Index::new(db.clone(), format!("habits:{}", user_id))
}

/// Load a habit and assert the caller owns it
///
/// Every mutating/reading habit route goes through this, so the ownership
/// check cannot be forgotten on a new route. Missing habit wins over the
/// ownership check: a caller probing foreign IDs learns nothing beyond 404.
async fn load_owned(db: &Db, habit_id: &str, user_id: &str) -> Result<Habit> {
    if !Entity::<Habit>::exists(db, habit_id).await? {
        return Err(AppError::NotFound("Habit"));
    }
    let habit = Entity::<Habit>::get_state(db, habit_id).await?;
    if habit.user_id != user_id {
        return Err(AppError::Forbidden);
    }
    Ok(habit)
}

fn validate_name(name: &str) -> Result<()> {
    if name.len() < MIN_NAME_LEN {
        return Err(AppError::Validation(
            "Habit name must be at least 2 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_color(color: &str) -> Result<()> {
    if !Habit::validate_color(color) {
        return Err(AppError::Validation(
            "Color must be a # followed by 6 hex digits".to_string(),
        ));
    }
    Ok(())
}

/// List the caller's habits in listing-index order (insertion order)
pub async fn list_habits(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<HabitListResponse>>> {
    let ids = user_habits_index(&state.db, &auth.id).list().await?;

    let mut items = Vec::with_capacity(ids.len());
    for id in &ids {
        items.push(Entity::<Habit>::get_state(&state.db, id).await?);
    }

    Ok(ok(HabitListResponse { items, next: None }))
}

/// Create a habit owned by the caller
pub async fn create_habit(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateHabitRequest>,
) -> Result<Json<ApiResponse<Habit>>> {
    let Some(name) = payload.name else {
        return Err(AppError::Validation(ERR_HABIT_NAME_REQUIRED.to_string()));
    };
    let name = name.trim().to_string();
    validate_name(&name)?;

    let color = payload
        .color
        .unwrap_or_else(|| DEFAULT_HABIT_COLOR.to_string());
    validate_color(&color)?;

    let frequency = payload.frequency.unwrap_or_default();
    frequency.validate().map_err(AppError::Validation)?;

    if let Some(goal) = &payload.goal {
        goal.validate().map_err(AppError::Validation)?;
    }

    let habit = Habit {
        id: Uuid::new_v4().to_string(),
        user_id: auth.id.clone(),
        name,
        color,
        frequency,
        logs: Vec::new(),
        goal: payload.goal,
        created_at: Utc::now().timestamp_millis(),
    };

    Entity::<Habit>::create(&state.db, habit.clone()).await?;
    user_habits_index(&state.db, &auth.id).add(&habit.id).await?;

    tracing::info!("Habit created: {} (user {})", habit.id, auth.id);

    Ok(ok(habit))
}

/// Update a habit's fields; progress logs are untouchable through this
/// path (only `log_habit` may change them)
pub async fn update_habit(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateHabitRequest>,
) -> Result<Json<ApiResponse<Habit>>> {
    load_owned(&state.db, &id, &auth.id).await?;

    let name = match payload.name {
        Some(name) => {
            let name = name.trim().to_string();
            validate_name(&name)?;
            Some(name)
        }
        None => None,
    };
    if let Some(color) = &payload.color {
        validate_color(color)?;
    }
    if let Some(frequency) = &payload.frequency {
        frequency.validate().map_err(AppError::Validation)?;
    }
    if let Some(goal) = &payload.goal {
        goal.validate().map_err(AppError::Validation)?;
    }

    let updated = Entity::<Habit>::mutate(&state.db, &id, move |mut habit| {
        if let Some(name) = name {
            habit.name = name;
        }
        if let Some(color) = payload.color {
            habit.color = color;
        }
        if let Some(frequency) = payload.frequency {
            habit.frequency = frequency;
        }
        if let Some(goal) = payload.goal {
            habit.goal = Some(goal);
        }
        habit
    })
    .await?;

    Ok(ok(updated))
}

/// Upsert a progress log entry for one calendar day
pub async fn log_habit(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<LogRequest>,
) -> Result<Json<ApiResponse<Habit>>> {
    let (Some(date), Some(value)) = (payload.date, payload.value) else {
        return Err(AppError::Validation(ERR_LOG_FIELDS.to_string()));
    };
    if !Habit::validate_date(&date) {
        return Err(AppError::Validation(
            "Date must be a valid YYYY-MM-DD day".to_string(),
        ));
    }

    load_owned(&state.db, &id, &auth.id).await?;

    let updated = Entity::<Habit>::mutate(&state.db, &id, move |mut habit| {
        habit.upsert_log(&date, value);
        habit
    })
    .await?;

    Ok(ok(updated))
}

/// Delete a habit and drop it from the caller's listing index
pub async fn delete_habit(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeleteHabitResponse>>> {
    load_owned(&state.db, &id, &auth.id).await?;

    let deleted = Entity::<Habit>::delete(&state.db, &id).await?;
    if !deleted {
        return Err(AppError::NotFound("Habit"));
    }
    user_habits_index(&state.db, &auth.id).remove(&id).await?;

    tracing::info!("Habit deleted: {} (user {})", id, auth.id);

    Ok(ok(DeleteHabitResponse { id, deleted }))
}
