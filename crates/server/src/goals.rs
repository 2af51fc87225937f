//! Goal API endpoints

use api_types::goal::{
    GoalCompletedUpdate, GoalFundingResponse, GoalFundingView, GoalListResponse, GoalNew,
    GoalReorder, GoalView, ReorderDirection as ApiDirection,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_goal(goal: engine::Goal) -> GoalView {
    GoalView {
        id: goal.id,
        name: goal.name,
        target_amount_minor: goal.target_amount_minor,
        priority: goal.priority,
        is_completed: goal.is_completed,
        deadline: goal.deadline,
    }
}

fn map_funded(funded: engine::FundedGoal) -> GoalFundingView {
    GoalFundingView {
        id: funded.goal.id,
        name: funded.goal.name,
        target_amount_minor: funded.goal.target_amount_minor,
        saved_amount_minor: funded.saved_amount_minor,
        priority: funded.goal.priority,
        is_completed: funded.goal.is_completed,
        deadline: funded.goal.deadline,
    }
}

fn map_direction(direction: ApiDirection) -> engine::ReorderDirection {
    match direction {
        ApiDirection::Up => engine::ReorderDirection::Up,
        ApiDirection::Down => engine::ReorderDirection::Down,
    }
}

/// Goals with their funded amounts, recomputed from the current vault
/// balance on every call.
pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<GoalFundingResponse>, ServerError> {
    let funded = state.engine.goals_with_funding(&user.username).await?;

    Ok(Json(GoalFundingResponse {
        goals: funded.into_iter().map(map_funded).collect(),
    }))
}

pub async fn goal_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<GoalNew>,
) -> Result<(StatusCode, Json<GoalView>), ServerError> {
    let mut cmd = engine::GoalNewCmd::new(
        user.username.clone(),
        payload.name,
        payload.target_amount_minor,
    );
    if let Some(deadline) = payload.deadline {
        cmd = cmd.deadline(deadline);
    }

    let goal = state.engine.add_goal(cmd).await?;

    Ok((StatusCode::CREATED, Json(map_goal(goal))))
}

pub async fn set_completed(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GoalCompletedUpdate>,
) -> Result<Json<GoalView>, ServerError> {
    let goal = state
        .engine
        .set_goal_completed(&user.username, id, payload.is_completed)
        .await?;

    Ok(Json(map_goal(goal)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.remove_goal(&user.username, id).await?;

    Ok(StatusCode::OK)
}

pub async fn reorder(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<GoalReorder>,
) -> Result<Json<GoalListResponse>, ServerError> {
    let goals = state
        .engine
        .reorder_goal(
            &user.username,
            payload.goal_id,
            map_direction(payload.direction),
        )
        .await?;

    Ok(Json(GoalListResponse {
        goals: goals.into_iter().map(map_goal).collect(),
    }))
}
