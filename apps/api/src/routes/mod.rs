pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::classification::handlers as classify_handlers;
use crate::contacts::handlers as contact_handlers;
use crate::personas::handlers as persona_handlers;
use crate::state::AppState;
use crate::users;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Users
        .route("/api/v1/users", post(users::handle_create_user))
        .route("/api/v1/users/:id", get(users::handle_get_user))
        // Contacts
        .route(
            "/api/v1/contacts/upload",
            post(contact_handlers::handle_upload_contacts),
        )
        .route("/api/v1/contacts", get(contact_handlers::handle_list_contacts))
        .route("/api/v1/groups", get(contact_handlers::handle_list_groups))
        // Classification
        .route(
            "/api/v1/classify",
            post(classify_handlers::handle_classify_title),
        )
        // Personas
        .route("/api/v1/dashboard", get(persona_handlers::handle_dashboard))
        .route(
            "/api/v1/personas/generate",
            post(persona_handlers::handle_generate_persona),
        )
        .with_state(state)
}
