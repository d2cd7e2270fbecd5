//! Routes and route execution
//!
//! A [`TransformationRoute`] is the planner's output: the ordered transformer
//! sequence connecting a reachable source type to the queried target type,
//! with the accumulated cost. Executing it folds a value through every step
//! with the same parameter bag and fails fast: a failure at step k leaves no
//! usable partial result and later steps are never invoked.
//!
//! Copyright (c) 2025 Typeroute Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::transformer::SharedTransformer;
use crate::types::{AnyValue, Parameters, TypeTag};
use std::fmt;
use std::ops::Deref;

/// An ordered sequence of transformers plus bookkeeping.
///
/// `source` is the concrete type actually reachable, which may differ from a
/// queried candidate when the route was entered through a hierarchy detour.
/// An empty transformer list means `source` already satisfies `target` via
/// hierarchy alone (or exactly, with hierarchy disabled).
#[derive(Clone)]
pub struct TransformationRoute {
    source: TypeTag,
    target: TypeTag,
    transformations: Vec<SharedTransformer>,
    cost: u32,
}

impl TransformationRoute {
    pub(crate) fn new(
        source: TypeTag,
        target: TypeTag,
        transformations: Vec<SharedTransformer>,
        cost: u32,
    ) -> Self {
        Self {
            source,
            target,
            transformations,
            cost,
        }
    }

    pub fn source(&self) -> TypeTag {
        self.source
    }

    pub fn target(&self) -> TypeTag {
        self.target
    }

    pub fn transformations(&self) -> &[SharedTransformer] {
        &self.transformations
    }

    /// Total accumulated cost, hierarchy hop costs included.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Whether no transformer needs to run at all.
    pub fn is_identity(&self) -> bool {
        self.transformations.is_empty()
    }

    /// Fold `value` through every transformer in order, passing the same
    /// parameter bag to each step.
    ///
    /// The first failing step aborts the whole attempt: the error carries the
    /// step's input value and target type, and no later transformer runs.
    /// There is no rollback and no automatic fallback to an alternate route.
    pub fn apply(&self, value: &AnyValue, parameters: &Parameters) -> Result<AnyValue> {
        let mut current = value.clone();
        for transformer in &self.transformations {
            let step_target = transformer.target_type();
            current = match transformer.transform(&current, parameters) {
                Ok(next) => next,
                Err(Error::Transformation {
                    message,
                    target,
                    value,
                    source,
                }) => {
                    // Transformers may raise a failure without attaching
                    // their input; the executor knows it and fills it in.
                    return Err(Error::Transformation {
                        message,
                        target,
                        value: value.or(Some(current)),
                        source,
                    });
                }
                Err(err) => {
                    let message = err.to_string();
                    return Err(Error::Transformation {
                        message,
                        target: step_target,
                        value: Some(current),
                        source: Some(err.into()),
                    });
                }
            };
        }
        Ok(current)
    }
}

// Transformer trait objects are not Debug; summarize the route instead.
impl fmt::Debug for TransformationRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformationRoute")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("steps", &self.transformations.len())
            .field("cost", &self.cost)
            .finish()
    }
}

/// A route bound to one concrete originating value.
///
/// The bound value's runtime type always equals `route.source()`: the planner
/// picks the representative object for the winning source type.
#[derive(Clone)]
pub struct ObjectRoute {
    route: TransformationRoute,
    object: AnyValue,
}

impl ObjectRoute {
    pub(crate) fn new(route: TransformationRoute, object: AnyValue) -> Self {
        debug_assert_eq!(route.source(), object.tag());
        Self { route, object }
    }

    pub fn route(&self) -> &TransformationRoute {
        &self.route
    }

    /// The value the route was bound to.
    pub fn initial_object(&self) -> &AnyValue {
        &self.object
    }

    /// Execute the route against the bound value.
    pub fn apply(&self, parameters: &Parameters) -> Result<AnyValue> {
        self.route.apply(&self.object, parameters)
    }
}

impl Deref for ObjectRoute {
    type Target = TransformationRoute;

    fn deref(&self) -> &Self::Target {
        &self.route
    }
}

impl fmt::Debug for ObjectRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRoute")
            .field("route", &self.route)
            .field("object", &self.object)
            .finish()
    }
}
