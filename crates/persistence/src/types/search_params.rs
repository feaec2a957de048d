//! Search parameters understood by the resource stores.
//!
//! Only three criteria are recognized: `_id`, the subject reference
//! (`subject` or its alias `patient`) and the requester reference. Values are
//! matched as plain strings, references by substring. Every other parameter
//! is ignored.

use std::collections::HashMap;
use std::fmt;

use erezept_fhir::FhirResource;

/// Raw query parameters, name to value.
pub type SearchParams = HashMap<String, String>;

/// A single recognized search criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriterion {
    /// `_id`: exact equality with the logical id.
    Id(String),
    /// `subject` / `patient`: substring of `subject.reference`.
    Subject(String),
    /// `requester`: substring of `requester.reference`.
    Requester(String),
}

impl SearchCriterion {
    /// Maps a parameter name and value onto a criterion.
    ///
    /// Returns `None` for parameters the stores do not support.
    pub fn parse(name: &str, value: &str) -> Option<Self> {
        match name {
            "_id" => Some(SearchCriterion::Id(value.to_string())),
            "subject" | "patient" => Some(SearchCriterion::Subject(value.to_string())),
            "requester" => Some(SearchCriterion::Requester(value.to_string())),
            _ => None,
        }
    }

    /// Returns true if the resource satisfies this criterion.
    ///
    /// A resource lacking the searched element never matches.
    pub fn matches<T: FhirResource>(&self, resource: &T) -> bool {
        match self {
            SearchCriterion::Id(id) => resource.id() == Some(id.as_str()),
            SearchCriterion::Subject(value) => resource
                .subject_reference()
                .is_some_and(|reference| reference.contains(value.as_str())),
            SearchCriterion::Requester(value) => resource
                .requester_reference()
                .is_some_and(|reference| reference.contains(value.as_str())),
        }
    }
}

impl fmt::Display for SearchCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchCriterion::Id(value) => write!(f, "_id={}", value),
            SearchCriterion::Subject(value) => write!(f, "subject={}", value),
            SearchCriterion::Requester(value) => write!(f, "requester={}", value),
        }
    }
}

/// The conjunction of all recognized criteria of a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    criteria: Vec<SearchCriterion>,
    ignored: Vec<String>,
}

impl SearchCriteria {
    /// Builds criteria from raw query parameters.
    ///
    /// Criteria are sorted by parameter name so evaluation order does not
    /// depend on map iteration order.
    pub fn from_params(params: &SearchParams) -> Self {
        let mut names: Vec<&String> = params.keys().collect();
        names.sort();

        let mut result = SearchCriteria::default();
        for name in names {
            match SearchCriterion::parse(name, &params[name]) {
                Some(criterion) => result.criteria.push(criterion),
                None => result.ignored.push(name.clone()),
            }
        }
        result
    }

    /// Adds a criterion.
    pub fn with(mut self, criterion: SearchCriterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    /// The recognized criteria.
    pub fn criteria(&self) -> &[SearchCriterion] {
        &self.criteria
    }

    /// Names of parameters that were not recognized.
    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }

    /// True if no criterion restricts the result.
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Returns true if the resource satisfies every criterion.
    pub fn matches<T: FhirResource>(&self, resource: &T) -> bool {
        self.criteria.iter().all(|criterion| criterion.matches(resource))
    }
}
