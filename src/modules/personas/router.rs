use crate::modules::personas::controller::{
    create_persona, delete_persona, estadisticas, get_persona_by_id, get_personas, update_persona,
};
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn init_personas_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_personas).post(create_persona))
        .route("/estadisticas", get(estadisticas))
        .route(
            "/{id}",
            get(get_persona_by_id).put(update_persona).delete(delete_persona),
        )
}
