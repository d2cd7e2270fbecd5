//! The transformer contract and its typed adapter
//!
//! A [`TypeTransformer`] is one capability unit of the routing graph: a source
//! type, a target type, a parameter-sensitive cost and a fallible conversion.
//! Transformers are registered as instances, so the same (source, target) pair
//! may carry several of them with different costs and capabilities.
//!
//! Copyright (c) 2025 Typeroute Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::registry::TypeTransformerRegistry;
use crate::types::{AnyValue, Parameters, TypeTag};
use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

/// Default cost of one transformation step when a transformer does not
/// override [`TypeTransformer::transformation_cost`].
pub const DEFAULT_TRANSFORMATION_COST: u32 = 30;

/// A registered unit capable of converting one concrete type to another.
///
/// Costs are non-negative by construction (`u32`) and may depend on the
/// parameter bag, e.g. a transformer can be cheaper when a parameter enabling
/// a shortcut is present. The same parameter bag reaches both the cost
/// function (during planning) and [`transform`](Self::transform) (during
/// execution).
pub trait TypeTransformer: Send + Sync {
    /// Tag of the type this transformer consumes.
    fn source_type(&self) -> TypeTag;

    /// Tag of the type this transformer produces.
    fn target_type(&self) -> TypeTag;

    /// Cost of applying this transformer under the given parameters.
    fn transformation_cost(&self, _parameters: &Parameters) -> u32 {
        DEFAULT_TRANSFORMATION_COST
    }

    /// Convert `value` into a value of the target type.
    ///
    /// Hierarchy hops do not change the value, so a transformer reached
    /// through a hierarchy detour receives the original, narrower value: its
    /// runtime type is either [`source_type`](Self::source_type) or a
    /// declared narrowing of it. Implementations sitting below wide types
    /// must accept those narrowings.
    fn transform(&self, value: &AnyValue, parameters: &Parameters) -> Result<AnyValue>;
}

/// Shared handle to a registered transformer.
///
/// Registration and removal compare handles by pointer identity
/// (`Arc::ptr_eq`), matching the instance-identity contract of the registry.
pub type SharedTransformer = Arc<dyn TypeTransformer>;

/// A collaborator that batch-registers transformers during registry bootstrap.
///
/// Loaders replace classpath service discovery: the application entry point
/// hands every loader to [`TypeTransformerRegistry::discover`] once, before
/// the registry answers its first query.
pub trait TransformerLoader: Send + Sync {
    fn register_transformers(&self, registry: &TypeTransformerRegistry);
}

type ConvertFn<S, T> = Box<dyn Fn(&S, &Parameters) -> Result<T> + Send + Sync>;
type CostFn = Box<dyn Fn(&Parameters) -> u32 + Send + Sync>;

/// Statically-typed transformer built from a conversion closure.
///
/// Downcasts the erased input to `S`, runs the closure, and re-wraps the
/// output with the tag of `T`. A mismatched input yields
/// [`Error::TypeMismatch`] rather than a panic. Because the downcast is
/// exact, routes that enter this transformer through a hierarchy detour will
/// fail at execution; implement [`TypeTransformer`] directly for transformers
/// that must accept declared narrowings of `S`.
pub struct FnTransformer<S, T> {
    convert: ConvertFn<S, T>,
    cost: CostFn,
    _marker: PhantomData<fn(S) -> T>,
}

impl<S, T> FnTransformer<S, T>
where
    S: Any + Send + Sync,
    T: Any + Send + Sync,
{
    pub fn new(convert: impl Fn(&S, &Parameters) -> Result<T> + Send + Sync + 'static) -> Self {
        Self {
            convert: Box::new(convert),
            cost: Box::new(|_| DEFAULT_TRANSFORMATION_COST),
            _marker: PhantomData,
        }
    }

    /// Fixed cost override.
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = Box::new(move |_| cost);
        self
    }

    /// Parameter-sensitive cost override.
    pub fn with_cost_fn(mut self, cost: impl Fn(&Parameters) -> u32 + Send + Sync + 'static) -> Self {
        self.cost = Box::new(cost);
        self
    }

    pub fn into_shared(self) -> SharedTransformer {
        Arc::new(self)
    }
}

impl<S, T> TypeTransformer for FnTransformer<S, T>
where
    S: Any + Send + Sync,
    T: Any + Send + Sync,
{
    fn source_type(&self) -> TypeTag {
        TypeTag::of::<S>()
    }

    fn target_type(&self) -> TypeTag {
        TypeTag::of::<T>()
    }

    fn transformation_cost(&self, parameters: &Parameters) -> u32 {
        (self.cost)(parameters)
    }

    fn transform(&self, value: &AnyValue, parameters: &Parameters) -> Result<AnyValue> {
        let typed = value.downcast_ref::<S>().ok_or(Error::TypeMismatch {
            expected: TypeTag::of::<S>(),
            actual: value.tag(),
        })?;
        let output = (self.convert)(typed, parameters)?;
        Ok(AnyValue::new(output))
    }
}
