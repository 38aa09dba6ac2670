pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::applications::handlers as applications;
use crate::catalog::handlers as catalog;
use crate::ledger::handlers as ledger;
use crate::postings::handlers as postings;
use crate::readiness::handlers as readiness;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Boards
        .route("/api/v1/jobs", get(postings::handle_list_jobs))
        .route("/api/v1/jobs/:id", get(postings::handle_get_job))
        .route("/api/v1/internships", get(postings::handle_list_internships))
        .route(
            "/api/v1/internships/:id",
            get(postings::handle_get_internship),
        )
        // Readiness
        .route("/api/v1/readiness", get(readiness::handle_get_readiness))
        // Applications
        .route(
            "/api/v1/applications",
            post(applications::handle_submit_application)
                .get(applications::handle_list_applications),
        )
        .route(
            "/api/v1/applications/:id/status",
            patch(applications::handle_update_status),
        )
        // Skill ledger
        .route("/api/v1/ledger", get(ledger::handle_get_ledger))
        .route(
            "/api/v1/ledger/completions",
            post(ledger::handle_record_completion),
        )
        // Catalog
        .route("/api/v1/courses", get(catalog::handle_list_courses))
        .route("/api/v1/events", get(catalog::handle_list_events))
        .with_state(state)
}
