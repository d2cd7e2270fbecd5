//! Transformer registry index
//!
//! A two-level mapping from source type to target type to the transformers
//! registered for that pair. The index is a constructed object (no global
//! statics): the application entry point builds one, runs discovery once, and
//! passes it by reference wherever routing is needed. Concurrent registration
//! and concurrent planning are tolerated through the concurrent map; a
//! `clear` racing an in-flight route may yield a partial view, which is
//! acceptable because mutation is a setup/teardown activity.
//!
//! Copyright (c) 2025 Typeroute Team
//! Licensed under the Apache-2.0 license

use crate::config::RegistryConfig;
use crate::hierarchy::TypeHierarchy;
use crate::transformer::{SharedTransformer, TransformerLoader};
use crate::types::TypeTag;
use dashmap::DashMap;
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Transformers registered for one source type, grouped by target type.
/// Ordered by target tag so planner iteration is deterministic; within one
/// target, transformers keep their registration order.
pub type TransformersByTarget = BTreeMap<TypeTag, Vec<SharedTransformer>>;

/// The registry owning the transformer index, the hierarchy resolver and the
/// process-wide routing defaults.
pub struct TypeTransformerRegistry {
    transformers: DashMap<TypeTag, TransformersByTarget>,
    hierarchy: TypeHierarchy,
    config: RegistryConfig,
}

impl TypeTransformerRegistry {
    /// Registry with built-in defaults (hierarchy disabled, multi-step on).
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            transformers: DashMap::new(),
            hierarchy: TypeHierarchy::new(),
            config,
        }
    }

    /// Registry configured from `TYPEROUTE_*` environment variables.
    pub fn from_env() -> Self {
        Self::with_config(RegistryConfig::from_env())
    }

    pub fn config(&self) -> RegistryConfig {
        self.config
    }

    /// The hierarchy resolver, for declaring widening edges at bootstrap.
    pub fn hierarchy(&self) -> &TypeHierarchy {
        &self.hierarchy
    }

    /// Typed convenience forwarding to the hierarchy resolver.
    pub fn declare_subtype<Child, Parent>(&self)
    where
        Child: Any + ?Sized,
        Parent: Any + ?Sized,
    {
        self.hierarchy.declare_subtype::<Child, Parent>();
    }

    /// Register a transformer instance.
    pub fn add_transformer(&self, transformer: SharedTransformer) {
        log::debug!(
            "registering transformer {} -> {}",
            transformer.source_type(),
            transformer.target_type()
        );
        self.transformers
            .entry(transformer.source_type())
            .or_default()
            .entry(transformer.target_type())
            .or_default()
            .push(transformer);
    }

    /// Remove a previously registered transformer instance. Removal compares
    /// by instance identity (`Arc::ptr_eq`), not by type pair.
    pub fn remove_transformer(&self, transformer: &SharedTransformer) {
        if let Some(mut by_target) = self.transformers.get_mut(&transformer.source_type()) {
            if let Some(registered) = by_target.get_mut(&transformer.target_type()) {
                registered.retain(|candidate| !Arc::ptr_eq(candidate, transformer));
            }
        }
    }

    /// Remove all transformers. Hierarchy declarations survive.
    pub fn clear(&self) {
        self.transformers.clear();
    }

    /// Snapshot of the transformers registered from `source`, empty if none.
    pub fn transformers_from(&self, source: TypeTag) -> TransformersByTarget {
        self.transformers
            .get(&source)
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    /// One line per registered (source, target) pair with the transformer
    /// count, sorted, for debug logging and introspection.
    pub fn summary(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        for entry in self.transformers.iter() {
            for (target, registered) in entry.value() {
                lines.push(format!(
                    "{} -> {}: {} transformer(s)",
                    entry.key(),
                    target,
                    registered.len()
                ));
            }
        }
        lines.sort();
        lines.join("\n")
    }

    /// Every registered transformer, for debugging and introspection.
    pub fn all_transformers(&self) -> Vec<SharedTransformer> {
        let mut all = Vec::new();
        for entry in self.transformers.iter() {
            for registered in entry.value().values() {
                all.extend(registered.iter().cloned());
            }
        }
        all
    }

    pub fn len(&self) -> usize {
        self.transformers
            .iter()
            .map(|entry| entry.value().values().map(Vec::len).sum::<usize>())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every loader once, before the registry answers its first query.
    /// No ordering guarantee exists among the transformers they register.
    pub fn discover(&self, loaders: &[Box<dyn TransformerLoader>]) {
        for loader in loaders {
            loader.register_transformers(self);
        }
        log::info!("discovery registered {} transformers", self.len());
        log::debug!("registered transformers:\n{}", self.summary());
    }
}

impl Default for TypeTransformerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
