//! Type hierarchy resolver
//!
//! Rust has no runtime subclass reflection, so "extends/implements" edges are
//! declared explicitly on the registry during bootstrap. The resolver answers
//! "which wider types is C usable as, and how far away are they" by BFS over
//! the declared edges; the universal root type is never enqueued and never
//! reported. Results are cached per starting type: the declared hierarchy is
//! expected to be immutable once routing starts.

use crate::config::HierarchyCost;
use crate::types::TypeTag;
use dashmap::DashMap;
use std::any::Any;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

/// Ancestor map for one starting type: each ancestor (the starting type
/// itself included, at 0) with its BFS shortest hop distance. Ordered so that
/// planner iteration is deterministic.
pub type AncestorDistances = BTreeMap<TypeTag, u32>;

/// Resolver and cache for declared widening relationships between types.
#[derive(Debug, Default)]
pub struct TypeHierarchy {
    parents: DashMap<TypeTag, Vec<TypeTag>>,
    cache: DashMap<TypeTag, Arc<AncestorDistances>>,
}

impl TypeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `child` is usable wherever `parent` is expected, one hop
    /// apart. Edges to the universal root are dropped: it is too generic to
    /// route through.
    pub fn declare_edge(&self, child: TypeTag, parent: TypeTag) {
        if parent.is_any() {
            log::debug!("ignoring hierarchy edge {} -> universal root", child);
            return;
        }
        {
            let mut entry = self.parents.entry(child).or_default();
            if !entry.contains(&parent) {
                entry.push(parent);
            }
        }
        // Declarations happen during bootstrap; a stale entry computed before
        // this edge existed must not survive.
        self.cache.clear();
    }

    /// Typed convenience for [`declare_edge`](Self::declare_edge).
    pub fn declare_subtype<Child, Parent>(&self)
    where
        Child: Any + ?Sized,
        Parent: Any + ?Sized,
    {
        self.declare_edge(TypeTag::of::<Child>(), TypeTag::of::<Parent>());
    }

    /// All ancestors of `tag` (itself included at distance 0) with their BFS
    /// shortest hop distance. The universal root is never part of the result.
    pub fn ancestors_with_distance(&self, tag: TypeTag) -> Arc<AncestorDistances> {
        if let Some(hit) = self.cache.get(&tag) {
            return Arc::clone(&hit);
        }

        let mut depths = AncestorDistances::new();
        depths.insert(tag, 0);
        let mut queue = VecDeque::from([tag]);
        while let Some(current) = queue.pop_front() {
            let distance = depths[&current];
            let parents = match self.parents.get(&current) {
                Some(parents) => parents.value().clone(),
                None => continue,
            };
            for parent in parents {
                if parent.is_any() || depths.contains_key(&parent) {
                    continue;
                }
                depths.insert(parent, distance + 1);
                queue.push_back(parent);
            }
        }

        let computed = Arc::new(depths);
        // Racing threads may compute this redundantly; the function is pure,
        // so last write wins without harm.
        self.cache.insert(tag, Arc::clone(&computed));
        computed
    }

    /// Ancestors of `tag` with every distance scaled by the per-hop cost.
    ///
    /// With hierarchy traversal disabled the result is exactly `{tag: 0}`:
    /// callers never see ancestors in that mode.
    pub fn ancestors_with_cost(&self, tag: TypeTag, cost: HierarchyCost) -> AncestorDistances {
        match cost {
            HierarchyCost::Disabled => {
                let mut only_self = AncestorDistances::new();
                only_self.insert(tag, 0);
                only_self
            }
            HierarchyCost::PerHop(unit) => self
                .ancestors_with_distance(tag)
                .iter()
                .map(|(&ancestor, &distance)| (ancestor, distance.saturating_mul(unit)))
                .collect(),
        }
    }
}
