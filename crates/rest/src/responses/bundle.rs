//! Searchset bundle building.

use erezept_fhir::{Bundle, BundleEntry, BundleLink, BundleType, FhirResource};
use serde_json::json;

/// Builds a `searchset` Bundle from search results.
///
/// Each entry gets `fullUrl` `<base>/<type>/<id>` and `search.mode` `match`.
///
/// # Example
///
/// ```rust
/// use erezept_fhir::Patient;
/// use erezept_rest::responses::SearchsetBuilder;
///
/// let bundle = SearchsetBuilder::new("/fhir", "Patient")
///     .self_link("/fhir/Patient?name=Muster")
///     .build(&Vec::<Patient>::new())
///     .unwrap();
/// assert_eq!(bundle.total, Some(0));
/// ```
#[derive(Debug, Clone)]
pub struct SearchsetBuilder {
    base_path: String,
    resource_type: String,
    self_link: Option<String>,
}

impl SearchsetBuilder {
    /// Creates a builder for results of `resource_type` served under `base_path`.
    pub fn new(base_path: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            resource_type: resource_type.into(),
            self_link: None,
        }
    }

    /// Adds a `self` link.
    pub fn self_link(mut self, url: impl Into<String>) -> Self {
        self.self_link = Some(url.into());
        self
    }

    /// The `fullUrl` for a resource with the given id.
    pub fn full_url(&self, id: &str) -> String {
        format!("{}/{}/{}", self.base_path, self.resource_type, id)
    }

    /// Builds the bundle with `total` set to the number of results.
    pub fn build<R: FhirResource>(&self, resources: &[R]) -> serde_json::Result<Bundle> {
        let entry = resources
            .iter()
            .map(|resource| {
                let mut entry =
                    BundleEntry::new(self.full_url(resource.id().unwrap_or_default()), resource)?;
                entry
                    .additional
                    .insert("search".to_string(), json!({"mode": "match"}));
                Ok(entry)
            })
            .collect::<serde_json::Result<Vec<_>>>()?;

        let link = self
            .self_link
            .iter()
            .map(|url| BundleLink {
                relation: "self".to_string(),
                url: url.clone(),
            })
            .collect();

        Ok(Bundle {
            total: Some(u32::try_from(entry.len()).unwrap_or(u32::MAX)),
            link,
            entry,
            ..Bundle::of_type(BundleType::Searchset)
        })
    }
}
