use axum::{extract::State, routing::get, Json, Router};
use crate::controllers::dashboard_controller::DashboardController;
use crate::services::summary_service::Dashboard;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}

async fn get_dashboard(State(state): State<AppState>) -> Result<Json<Dashboard>, AppError> {
    let controller = DashboardController::new(state.entries.clone());
    let dashboard = controller.dashboard(state.today()).await?;
    Ok(Json(dashboard))
}
