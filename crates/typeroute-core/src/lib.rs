//! Typeroute Core - generic type-transformation registry and routing engine
//!
//! Given a value (or several candidate representations of the same logical
//! value), this crate discovers a minimum-cost sequence of registered
//! conversion steps reaching a desired target type, optionally exploiting
//! declared type-hierarchy relationships as cheap transformer-free hops.
//!
//! # Main Components
//!
//! - **Transformer contract**: [`TypeTransformer`] and its typed adapter
//!   [`FnTransformer`]
//! - **Registry**: [`TypeTransformerRegistry`] owning the transformer index,
//!   the hierarchy resolver and the routing defaults
//! - **Planner**: `route_types` / `route_objects` on the registry, single- or
//!   multi-step, with deterministic tie-breaking
//! - **Execution**: [`TransformationRoute::apply`] and
//!   [`ObjectRoute::apply`], fail-fast with typed failures
//!
//! # Example
//!
//! ```
//! use typeroute_core::{
//!     AnyValue, FnTransformer, Parameters, TypeTag, TypeTransformerRegistry,
//! };
//!
//! let registry = TypeTransformerRegistry::new();
//! registry.add_transformer(
//!     FnTransformer::new(|value: &u32, _| Ok(value.to_string()))
//!         .with_cost(10)
//!         .into_shared(),
//! );
//!
//! let route = registry
//!     .route_types_default(
//!         [TypeTag::of::<u32>()],
//!         TypeTag::of::<String>(),
//!         &Parameters::new(),
//!     )
//!     .expect("route exists");
//! assert_eq!(route.cost(), 10);
//!
//! let transformed = route
//!     .apply(&AnyValue::new(7u32), &Parameters::new())
//!     .unwrap();
//! assert_eq!(transformed.downcast_ref::<String>().unwrap(), "7");
//! ```

pub mod config;
pub mod error;
pub mod hierarchy;
pub mod planner;
pub mod registry;
pub mod route;
pub mod transformer;
pub mod types;

// Re-export main types for convenience
pub use config::{HierarchyCost, RegistryConfig, ENV_ALLOW_MULTI_STEP, ENV_HIERARCHY_COST};
pub use error::{Error, Result};
pub use hierarchy::{AncestorDistances, TypeHierarchy};
pub use registry::{TransformersByTarget, TypeTransformerRegistry};
pub use route::{ObjectRoute, TransformationRoute};
pub use transformer::{
    FnTransformer, SharedTransformer, TransformerLoader, TypeTransformer,
    DEFAULT_TRANSFORMATION_COST,
};
pub use types::{AnyType, AnyValue, Parameters, TypeTag};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
