//! Crew roster routes

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::domain::updates::NewWorkerInput;
use crate::domain::{AddWorkerRequest, PartialUpdate, QuoteSnapshot};
use crate::engine::merge::{merge, remove_worker};
use crate::error::{ApiError, ApiResult};

/// POST /workers
pub async fn add_worker(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddWorkerRequest>,
) -> ApiResult<impl IntoResponse> {
    let (update, rejected) = PartialUpdate {
        add_worker: Some(NewWorkerInput {
            name: req.name,
            daily_rate: req.daily_rate,
        }),
        ..Default::default()
    }
    .sanitize();

    if let Some(rejection) = rejected.first() {
        return Err(ApiError::bad_request(format!(
            "{}: {}",
            rejection.field, rejection.reason
        )));
    }

    let config = state.session.update(|current| merge(current, &update, ""))?;
    tracing::info!(workers = config.workers.len(), "Worker added");
    Ok(DataResponse::new(QuoteSnapshot::new(&config)))
}

/// DELETE /workers/:worker
///
/// `worker` is an id, or a name matched ignoring case.
pub async fn delete_worker(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let config = state.session.update_if(|current| {
        let mut next = current.clone();
        remove_worker(&mut next.workers, &key).map(|_| next)
    })?;

    let config = config.ok_or_else(|| ApiError::not_found(format!("No worker matches '{}'", key)))?;
    tracing::info!(workers = config.workers.len(), "Worker removed");
    Ok(DataResponse::new(QuoteSnapshot::new(&config)))
}
