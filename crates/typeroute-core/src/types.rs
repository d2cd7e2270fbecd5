//! Core identity and value types for the routing engine
//!
//! A [`TypeTag`] is the opaque, comparable, hashable identifier the planner
//! routes over. An [`AnyValue`] pairs a tag with an erased, shareable value so
//! that transformers can be stored and invoked without their generic types
//! lining up at the call site. [`Parameters`] is the open, string-keyed bag of
//! hints passed uniformly to every cost and transform call of a route.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The universal root type.
///
/// Routing to `AnyType` always succeeds trivially, and the hierarchy resolver
/// never reports it as an ancestor: it is too generic to route through.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyType;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
enum TagId {
    Rust(TypeId),
    Synthetic(u64),
}

/// Identifier for a runtime type.
///
/// Two tags are equal iff they denote the same declared type. Tags are either
/// backed by a real Rust type ([`TypeTag::of`]) or synthetic
/// ([`TypeTag::synthetic`]) for dynamically generated type graphs. The name is
/// carried for diagnostics only and never participates in equality.
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TagId,
    name: &'static str,
}

impl TypeTag {
    /// Tag for a concrete Rust type.
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TagId::Rust(TypeId::of::<T>()),
            name: type_name::<T>(),
        }
    }

    /// Tag identified by a plain number, for type graphs that are not backed
    /// by Rust types (generated bindings, randomized planner tests).
    pub fn synthetic(id: u64) -> Self {
        Self {
            id: TagId::Synthetic(id),
            name: "synthetic",
        }
    }

    /// Tag of the universal root type [`AnyType`].
    pub fn any() -> Self {
        Self::of::<AnyType>()
    }

    /// Whether this tag denotes the universal root type.
    pub fn is_any(&self) -> bool {
        *self == Self::any()
    }

    /// Diagnostic name. Full Rust path for real types, `synthetic#<id>` is
    /// used by the `Display` impl for synthetic tags.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl std::hash::Hash for TypeTag {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for TypeTag {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeTag {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            TagId::Rust(_) => {
                // Trim the module path, keep generics readable enough.
                let short = self.name.rsplit("::").next().unwrap_or(self.name);
                write!(f, "{}", short)
            }
            TagId::Synthetic(id) => write!(f, "synthetic#{}", id),
        }
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({})", self)
    }
}

/// A type-tagged, erased, shareable value.
///
/// The tag always matches the runtime type of the inner value because the only
/// public constructor captures it. Cloning is cheap (`Arc`).
#[derive(Clone)]
pub struct AnyValue {
    tag: TypeTag,
    inner: Arc<dyn Any + Send + Sync>,
}

impl AnyValue {
    /// Wrap a concrete value, capturing its type tag.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            tag: TypeTag::of::<T>(),
            inner: Arc::new(value),
        }
    }

    /// Wrap an already shared value, capturing its type tag.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            tag: TypeTag::of::<T>(),
            inner: value,
        }
    }

    /// The tag of the wrapped value's runtime type.
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    /// Borrow the wrapped value as `T`, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    /// Take a shared handle to the wrapped value as `T`, if it is one.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast().ok()
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnyValue({})", self.tag)
    }
}

/// Open, string-keyed bag of transformation hints.
///
/// The same bag is passed to every cost function and every transform call
/// along one route, so a hint like "build the in-memory variant" reaches each
/// step uniformly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters {
    entries: HashMap<String, Value>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }
}

impl From<HashMap<String, Value>> for Parameters {
    fn from(entries: HashMap<String, Value>) -> Self {
        Self { entries }
    }
}

impl FromIterator<(String, Value)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
