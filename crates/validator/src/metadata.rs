//! Type descriptors and the metadata cache.
//!
//! Validated types describe themselves once through [`Validatable::describe`]:
//! an ordered list of properties, each with a getter producing the property's
//! current [`Value`] and the attributes declared on it. The [`MetadataCache`]
//! builds a type's descriptor on first use and shares it with every instance
//! of the type for the life of the cache.
//!
//! # Examples
//!
//! ```rust,ignore
//! use vigil_validator::{attributes, TypeDescriptor, Validatable};
//!
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! impl Validatable for Person {
//!     fn describe(d: &mut TypeDescriptor<Self>) {
//!         d.property("Name", |p| p.name.clone().into())
//!             .attribute(attributes::required());
//!         d.property("Age", |p| p.age.into());
//!     }
//! }
//! ```

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use indexmap::IndexMap;
use serde_json::Value;

use crate::attributes::{SharedAttribute, ValidationAttribute};
use crate::error::{EngineError, Result};

/// Reads one property of a `T` as a dynamic value.
pub type Getter<T> = Arc<dyn Fn(&T) -> Value + Send + Sync>;

// ============================================================================
// VALIDATABLE
// ============================================================================

/// A type whose properties the engine can enumerate, read and validate.
pub trait Validatable: Sized + 'static {
    /// Declares the type's properties, getters and attributes.
    ///
    /// Called once per [`MetadataCache`], on the first lookup of the type.
    fn describe(descriptor: &mut TypeDescriptor<Self>);
}

// ============================================================================
// PROPERTY DESCRIPTOR
// ============================================================================

/// Getter and attributes of one declared property.
pub struct PropertyDescriptor<T> {
    name: String,
    getter: Getter<T>,
    attributes: Vec<SharedAttribute>,
}

impl<T> PropertyDescriptor<T> {
    /// Declares `attribute` on this property.
    pub fn attribute(&mut self, attribute: impl ValidationAttribute + 'static) -> &mut Self {
        self.attributes.push(Arc::new(attribute));
        self
    }

    /// The property name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared attributes, in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &[SharedAttribute] {
        &self.attributes
    }

    /// Reads the property from `obj`.
    pub fn get(&self, obj: &T) -> Value {
        (self.getter)(obj)
    }
}

impl<T> fmt::Debug for PropertyDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("attributes", &self.attributes.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// TYPE DESCRIPTOR
// ============================================================================

/// The static property table of one validated type.
pub struct TypeDescriptor<T> {
    type_name: &'static str,
    properties: IndexMap<String, PropertyDescriptor<T>>,
}

impl<T: 'static> TypeDescriptor<T> {
    /// Creates an empty descriptor for `T`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            type_name: type_name::<T>(),
            properties: IndexMap::new(),
        }
    }
}

impl<T: 'static> Default for TypeDescriptor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TypeDescriptor<T> {
    /// Declares a property with its getter.
    ///
    /// Declaring the same name twice replaces the earlier declaration but
    /// keeps its position.
    pub fn property<F>(&mut self, name: impl Into<String>, getter: F) -> &mut PropertyDescriptor<T>
    where
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        let name = name.into();
        let descriptor = PropertyDescriptor {
            name: name.clone(),
            getter: Arc::new(getter),
            attributes: Vec::new(),
        };
        let (index, _) = self.properties.insert_full(name, descriptor);
        &mut self.properties[index]
    }

    /// Name of the described type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Number of declared properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns true when no property is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Declared property names, in declaration order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Looks up a declared property.
    #[must_use]
    pub fn property_descriptor(&self, name: &str) -> Option<&PropertyDescriptor<T>> {
        self.properties.get(name)
    }

    /// Looks up a declared property, failing when it is missing.
    pub fn require(&self, name: &str) -> Result<&PropertyDescriptor<T>> {
        self.properties
            .get(name)
            .ok_or_else(|| EngineError::UnknownProperty {
                type_name: self.type_name,
                property: name.to_owned(),
            })
    }

    /// The getter of a declared property.
    #[must_use]
    pub fn getter(&self, name: &str) -> Option<&Getter<T>> {
        self.properties.get(name).map(|p| &p.getter)
    }

    /// The attributes declared on a property.
    #[must_use]
    pub fn attributes(&self, name: &str) -> Option<&[SharedAttribute]> {
        self.properties.get(name).map(|p| p.attributes.as_slice())
    }

    /// Reads the current value of `name` from `obj`.
    pub fn value_of(&self, obj: &T, name: &str) -> Result<Value> {
        Ok(self.require(name)?.get(obj))
    }
}

impl<T> fmt::Debug for TypeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .field("properties", &self.properties.values().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// METADATA CACHE
// ============================================================================

/// Memoized type descriptors, keyed by type.
///
/// Entries are built on first access and never invalidated. Two threads
/// racing on the first access may both build a descriptor; the first one
/// inserted wins and both callers receive it.
#[derive(Default)]
pub struct MetadataCache {
    descriptors: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl MetadataCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the descriptor of `T`, building it on first access.
    pub fn descriptor<T: Validatable>(&self) -> Result<Arc<TypeDescriptor<T>>> {
        let id = TypeId::of::<T>();
        let cached = self
            .descriptors
            .get(&id)
            .map(|entry| Arc::clone(entry.value()));

        let erased = match cached {
            Some(erased) => erased,
            None => {
                let mut descriptor = TypeDescriptor::<T>::new();
                T::describe(&mut descriptor);
                tracing::debug!(
                    type_name = descriptor.type_name(),
                    properties = descriptor.len(),
                    "described validatable type"
                );
                let built: Arc<dyn Any + Send + Sync> = Arc::new(descriptor);
                let entry = self.descriptors.entry(id).or_insert(built);
                Arc::clone(entry.value())
            }
        };

        erased
            .downcast::<TypeDescriptor<T>>()
            .map_err(|_| EngineError::DescriptorMismatch {
                type_name: type_name::<T>(),
            })
    }

    /// Returns true when the descriptor of `T` has been built.
    #[must_use]
    pub fn contains<T: Validatable>(&self) -> bool {
        self.descriptors.contains_key(&TypeId::of::<T>())
    }

    /// Number of cached descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true when nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl fmt::Debug for MetadataCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataCache")
            .field("types", &self.descriptors.len())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
