//! Response header generation.

use axum::http::{HeaderMap, HeaderValue, header};
use chrono::DateTime;
use erezept_fhir::FhirResource;

/// Content type of every resource response.
pub const FHIR_JSON: &str = "application/fhir+json";

/// Builder for resource response headers: ETag, Last-Modified, Location and
/// Content-Type.
#[derive(Debug)]
pub struct ResourceHeaders {
    etag: Option<String>,
    last_modified: Option<String>,
    location: Option<String>,
    content_type: String,
}

impl Default for ResourceHeaders {
    fn default() -> Self {
        Self {
            etag: None,
            last_modified: None,
            location: None,
            content_type: FHIR_JSON.to_string(),
        }
    }
}

impl ResourceHeaders {
    /// Creates a new ResourceHeaders builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives ETag and Last-Modified from the resource's `meta`.
    pub fn for_resource<R: FhirResource>(resource: &R) -> Self {
        let mut headers = Self::new();
        if let Some(version_id) = resource.version_id() {
            headers = headers.with_version(version_id);
        }
        if let Some(last_updated) = resource.meta().and_then(|meta| meta.last_updated.as_deref()) {
            headers.last_modified = http_date(last_updated);
        }
        headers
    }

    /// Sets the ETag from a version ID.
    pub fn with_version(mut self, version_id: &str) -> Self {
        self.etag = Some(format!("W/\"{}\"", version_id));
        self
    }

    /// Sets the Location URL.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Converts to an Axum HeaderMap.
    pub fn to_header_map(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(value) = HeaderValue::from_str(&self.content_type) {
            headers.insert(header::CONTENT_TYPE, value);
        }

        if let Some(value) = self.etag.as_deref().and_then(|v| HeaderValue::from_str(v).ok()) {
            headers.insert(header::ETAG, value);
        }

        if let Some(value) = self
            .last_modified
            .as_deref()
            .and_then(|v| HeaderValue::from_str(v).ok())
        {
            headers.insert(header::LAST_MODIFIED, value);
        }

        if let Some(value) = self.location.as_deref().and_then(|v| HeaderValue::from_str(v).ok()) {
            headers.insert(header::LOCATION, value);
        }

        headers
    }

    /// Returns the ETag value.
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    /// Returns the Last-Modified value.
    pub fn last_modified(&self) -> Option<&str> {
        self.last_modified.as_deref()
    }

    /// Returns the Location value.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

/// Converts a FHIR instant to an HTTP date.
fn http_date(instant: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(instant)
        .ok()
        .map(|dt| dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
}
