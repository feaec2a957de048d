//! Resource traits shared by every stored resource.
//!
//! [`FhirResource`] is what the store needs to know about a resource: its
//! type name, its logical id and its `meta`. [`SearchReferences`] is the
//! capability used by reference-based search; resources that carry a
//! `subject` or `requester` override the matching accessor, everything else
//! keeps the default `None`.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::base::Meta;

/// Access to the references that search parameters can match against.
pub trait SearchReferences {
    /// The `subject.reference` value, if the resource has one.
    fn subject_reference(&self) -> Option<&str> {
        None
    }

    /// The `requester.reference` value, if the resource has one.
    fn requester_reference(&self) -> Option<&str> {
        None
    }
}

/// A FHIR resource that can be held by a resource store.
pub trait FhirResource:
    SearchReferences + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The resource type name, e.g. `"Patient"`.
    fn resource_type(&self) -> &str;

    /// The logical id, if assigned.
    fn id(&self) -> Option<&str>;

    /// Replaces the logical id.
    fn set_id(&mut self, id: String);

    /// Resource metadata, if present.
    fn meta(&self) -> Option<&Meta>;

    /// Mutable metadata, inserting an empty `meta` when absent.
    fn meta_mut(&mut self) -> &mut Meta;

    /// Writes the type name into the `resourceType` element.
    ///
    /// Typed resources built with `Default` start with an empty discriminator;
    /// stores call this before saving.
    fn stamp_resource_type(&mut self) {}

    /// The current `meta.versionId`.
    fn version_id(&self) -> Option<&str> {
        self.meta().and_then(|meta| meta.version_id.as_deref())
    }

    /// The id if it is present and non-empty.
    fn assigned_id(&self) -> Option<&str> {
        self.id().filter(|id| !id.is_empty())
    }
}

/// A resource whose type is fixed at compile time.
pub trait TypedResource: FhirResource + Default {
    /// The resource type name.
    const RESOURCE_TYPE: &'static str;
}

/// Implements [`FhirResource`] and [`TypedResource`] for a struct with
/// `resource_type`, `id` and `meta` fields.
macro_rules! typed_resource {
    ($ty:ident) => {
        impl $crate::resource::FhirResource for $ty {
            fn resource_type(&self) -> &str {
                <$ty as $crate::resource::TypedResource>::RESOURCE_TYPE
            }

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }

            fn set_id(&mut self, id: String) {
                self.id = Some(id);
            }

            fn meta(&self) -> Option<&$crate::base::Meta> {
                self.meta.as_ref()
            }

            fn meta_mut(&mut self) -> &mut $crate::base::Meta {
                self.meta.get_or_insert_with(Default::default)
            }

            fn stamp_resource_type(&mut self) {
                self.resource_type = stringify!($ty).to_string();
            }
        }

        impl $crate::resource::TypedResource for $ty {
            const RESOURCE_TYPE: &'static str = stringify!($ty);
        }

        impl $ty {
            pub(crate) fn default_resource_type() -> String {
                stringify!($ty).to_string()
            }
        }
    };
}

pub(crate) use typed_resource;

/// Any resource type without a dedicated model.
///
/// Elements other than `resourceType`, `id` and `meta` are kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericResource {
    #[serde(rename = "resourceType")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(flatten)]
    pub elements: Map<String, Value>,
}

impl GenericResource {
    fn reference_of(&self, element: &str) -> Option<&str> {
        self.elements.get(element)?.get("reference")?.as_str()
    }
}

impl SearchReferences for GenericResource {
    fn subject_reference(&self) -> Option<&str> {
        self.reference_of("subject")
    }

    fn requester_reference(&self) -> Option<&str> {
        self.reference_of("requester")
    }
}

impl FhirResource for GenericResource {
    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    fn meta_mut(&mut self) -> &mut Meta {
        self.meta.get_or_insert_with(Default::default)
    }
}
