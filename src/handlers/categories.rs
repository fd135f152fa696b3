use axum::extract::State;
use axum::response::Json;

use crate::db::queries::categories;
use crate::error::AppResult;
use crate::models::Category;
use crate::state::AppState;

pub async fn index(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let conn = state.db.get()?;
    Ok(Json(categories::list_categories(&conn)?))
}
