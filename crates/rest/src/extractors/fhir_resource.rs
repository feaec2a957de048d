//! FHIR resource extractor.
//!
//! Reads a JSON resource from the request body. The resource type is implied
//! by the route, so `resourceType` may be omitted; matching it against the
//! route is left to the handler.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use mime::Mime;
use serde_json::Value;

use crate::error::RestError;

/// Axum extractor for FHIR resources.
///
/// # Example
///
/// ```rust,ignore
/// use erezept_rest::extractors::FhirResource;
///
/// async fn create_handler(FhirResource(resource): FhirResource) {
///     println!("Resource type: {:?}", resource.get("resourceType"));
/// }
/// ```
#[derive(Debug)]
pub struct FhirResource(pub Value);

impl FhirResource {
    /// Returns the resource type, if the body names one.
    pub fn resource_type(&self) -> Option<&str> {
        self.0.get("resourceType").and_then(|v| v.as_str())
    }

    /// Returns the resource ID if present.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(|v| v.as_str())
    }

    /// Consumes the extractor and returns the inner Value.
    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// Error type for FHIR resource extraction failures.
#[derive(Debug)]
pub enum FhirResourceRejection {
    /// JSON parsing failed.
    InvalidJson(String),
    /// The body is valid JSON but not an object.
    NotAnObject,
    /// The body exceeds the configured limit.
    TooLarge(String),
    /// Unsupported content type.
    UnsupportedMediaType(String),
}

impl From<FhirResourceRejection> for RestError {
    fn from(rejection: FhirResourceRejection) -> Self {
        match rejection {
            FhirResourceRejection::InvalidJson(msg) => RestError::BadRequest {
                message: format!("Invalid JSON: {}", msg),
            },
            FhirResourceRejection::NotAnObject => RestError::BadRequest {
                message: "Resource must be a JSON object".to_string(),
            },
            FhirResourceRejection::TooLarge(msg) => RestError::PayloadTooLarge { message: msg },
            FhirResourceRejection::UnsupportedMediaType(ct) => {
                RestError::UnsupportedMediaType { content_type: ct }
            }
        }
    }
}

impl IntoResponse for FhirResourceRejection {
    fn into_response(self) -> Response {
        RestError::from(self).into_response()
    }
}

/// True for `application/json`, `application/fhir+json` and other `+json`
/// media types.
pub fn is_json_content_type(content_type: &str) -> bool {
    content_type
        .parse::<Mime>()
        .map(|mime| mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON))
        .unwrap_or(false)
}

impl<S> FromRequest<S> for FhirResource
where
    S: Send + Sync,
{
    type Rejection = FhirResourceRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if let Some(content_type) = &content_type {
            if !is_json_content_type(content_type) {
                return Err(FhirResourceRejection::UnsupportedMediaType(
                    content_type.clone(),
                ));
            }
        }

        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                FhirResourceRejection::TooLarge(e.body_text())
            } else {
                FhirResourceRejection::InvalidJson(e.body_text())
            }
        })?;

        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| FhirResourceRejection::InvalidJson(e.to_string()))?;

        if !value.is_object() {
            return Err(FhirResourceRejection::NotAnObject);
        }

        Ok(FhirResource(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type() {
        let resource = FhirResource(serde_json::json!({
            "resourceType": "Patient",
            "id": "123"
        }));

        assert_eq!(resource.resource_type(), Some("Patient"));
        assert_eq!(resource.id(), Some("123"));
    }

    #[test]
    fn test_json_content_types() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("application/fhir+json"));
        assert!(is_json_content_type("application/fhir+json; charset=utf-8"));
        assert!(!is_json_content_type("application/fhir+xml"));
        assert!(!is_json_content_type("text/plain"));
    }

    #[test]
    fn test_rejection_maps_to_rest_error() {
        let err: RestError = FhirResourceRejection::NotAnObject.into();
        assert!(matches!(err, RestError::BadRequest { .. }));

        let err: RestError =
            FhirResourceRejection::UnsupportedMediaType("text/plain".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
