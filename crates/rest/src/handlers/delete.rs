//! Delete interaction handler.
//!
//! Implements the FHIR [delete interaction](https://hl7.org/fhir/http.html#delete):
//! `DELETE [base]/[type]/[id]`

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use tracing::debug;

use super::RoutedResource;
use crate::error::{RestError, RestResult};
use crate::state::AppState;

/// Handler for the delete interaction.
///
/// # Response
///
/// - `204 No Content` - the resource was removed
/// - `404 Not Found` - no resource with this id, including one already deleted
pub async fn delete_handler<T: RoutedResource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> RestResult<StatusCode> {
    debug!(resource_type = T::RESOURCE_TYPE, id = %id, "Processing delete request");

    if T::handler(state.handlers()).delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(RestError::not_found(T::RESOURCE_TYPE, &id))
    }
}
