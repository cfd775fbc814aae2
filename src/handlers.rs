use crate::calendar::color_tier;
use crate::errors::AppError;
use crate::models::{ClickRequest, ClickResponse, Direction, MonthResponse, NavigateRequest};
use crate::session::ClickRejection;
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Json,
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.session.lock().await.snapshot();
    Html(render_index(&snapshot))
}

pub async fn get_month(State(state): State<AppState>) -> Json<MonthResponse> {
    Json(state.session.lock().await.snapshot())
}

pub async fn navigate(
    State(state): State<AppState>,
    Json(payload): Json<NavigateRequest>,
) -> Result<Json<MonthResponse>, AppError> {
    let direction = match payload.direction.trim() {
        "prev" => Direction::Previous,
        "next" => Direction::Next,
        _ => return Err(AppError::bad_request("direction must be 'prev' or 'next'")),
    };

    state.navigate(direction).await;
    Ok(Json(state.session.lock().await.snapshot()))
}

pub async fn month_prev(State(state): State<AppState>) -> Redirect {
    state.navigate(Direction::Previous).await;
    Redirect::to("/")
}

pub async fn month_next(State(state): State<AppState>) -> Redirect {
    state.navigate(Direction::Next).await;
    Redirect::to("/")
}

pub async fn click(
    State(state): State<AppState>,
    Json(payload): Json<ClickRequest>,
) -> Result<Json<ClickResponse>, AppError> {
    let response = apply_click(&state, payload.day).await?;
    Ok(Json(response))
}

pub async fn click_day(
    State(state): State<AppState>,
    Path(day): Path<u32>,
) -> Result<Redirect, AppError> {
    apply_click(&state, day).await?;
    Ok(Redirect::to("/"))
}

async fn apply_click(state: &AppState, day: u32) -> Result<ClickResponse, AppError> {
    let (ticket, _commit) = state.click(day).await.map_err(|rejection| match rejection {
        ClickRejection::Loading => AppError::conflict("month is still loading"),
        ClickRejection::OutsideMonth => {
            AppError::bad_request(format!("day {day} is not part of the displayed month"))
        }
    })?;

    Ok(ClickResponse {
        tier: color_tier(ticket.quantity),
        date_key: ticket.date_key,
        quantity: ticket.quantity,
    })
}
