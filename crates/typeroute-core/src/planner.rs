//! Route planner
//!
//! Planning is a pure function of the registry's current state: given one or
//! more candidate source types (or source values), a target type, a parameter
//! bag and the hierarchy/multi-step policy, find the minimum-cost ordered
//! transformer sequence reaching the target. Nodes of the search graph are
//! types; edges are registered transformers with parameter-dependent costs,
//! overlaid with implicit hierarchy hops at the configured per-hop cost.
//!
//! Planning never fails with an error: the absence of a route is `None`.
//!
//! Copyright (c) 2025 Typeroute Team
//! Licensed under the Apache-2.0 license

use crate::config::HierarchyCost;
use crate::registry::TypeTransformerRegistry;
use crate::route::{ObjectRoute, TransformationRoute};
use crate::transformer::SharedTransformer;
use crate::types::{AnyValue, Parameters, TypeTag};
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// One relaxed edge of the search: how `node` was reached. A `None`
/// transformer marks a synthetic hierarchy hop recorded while seeding, so
/// path reconstruction can report the original candidate source type rather
/// than an intermediate ancestor.
struct TransformationEdge {
    source: TypeTag,
    transformer: Option<SharedTransformer>,
    #[allow(dead_code)]
    cost: u32,
}

impl TypeTransformerRegistry {
    /// Route between candidate source types and a target type, using the
    /// registry's configured defaults for hierarchy cost and multi-step.
    pub fn route_types_default(
        &self,
        sources: impl IntoIterator<Item = TypeTag>,
        target: TypeTag,
        parameters: &Parameters,
    ) -> Option<TransformationRoute> {
        let config = self.config();
        self.route_types(
            sources,
            target,
            parameters,
            config.hierarchy_cost,
            config.allow_multi_step,
        )
    }

    /// Route between candidate source types and a target type.
    ///
    /// All candidates describe the same logical value in different
    /// representations; the cheapest reachable one wins. Ties go to the first
    /// minimal candidate encountered in insertion order. An empty candidate
    /// set yields `None`, never an error.
    pub fn route_types(
        &self,
        sources: impl IntoIterator<Item = TypeTag>,
        target: TypeTag,
        parameters: &Parameters,
        hierarchy_cost: HierarchyCost,
        allow_multi_step: bool,
    ) -> Option<TransformationRoute> {
        let mut candidates: Vec<TypeTag> = Vec::new();
        for source in sources {
            if !candidates.contains(&source) {
                candidates.push(source);
            }
        }
        if candidates.is_empty() {
            return None;
        }

        // Anything converts to the universal root type.
        if target.is_any() {
            return Some(TransformationRoute::new(candidates[0], target, Vec::new(), 0));
        }

        if allow_multi_step {
            self.route_multi_step(&candidates, target, parameters, hierarchy_cost)
        } else {
            self.route_single_step(&candidates, target, parameters, hierarchy_cost)
        }
    }

    /// Route from candidate source values and bind the winner.
    ///
    /// Values are grouped by runtime type first; when several candidates
    /// share a type, the later one replaces the earlier as that type's
    /// representative (only type reachability matters for planning; the
    /// concrete value is selected once the winning source type is known).
    pub fn route_objects(
        &self,
        sources: impl IntoIterator<Item = AnyValue>,
        target: TypeTag,
        parameters: &Parameters,
        hierarchy_cost: HierarchyCost,
        allow_multi_step: bool,
    ) -> Option<ObjectRoute> {
        let mut representatives: HashMap<TypeTag, AnyValue> = HashMap::new();
        let mut candidate_types: Vec<TypeTag> = Vec::new();
        for value in sources {
            let tag = value.tag();
            if representatives.insert(tag, value).is_none() {
                candidate_types.push(tag);
            }
        }

        let route = self.route_types(
            candidate_types,
            target,
            parameters,
            hierarchy_cost,
            allow_multi_step,
        )?;
        let object = representatives.remove(&route.source())?;
        Some(ObjectRoute::new(route, object))
    }

    /// [`route_objects`](Self::route_objects) with the registry's configured
    /// defaults.
    pub fn route_objects_default(
        &self,
        sources: impl IntoIterator<Item = AnyValue>,
        target: TypeTag,
        parameters: &Parameters,
    ) -> Option<ObjectRoute> {
        let config = self.config();
        self.route_objects(
            sources,
            target,
            parameters,
            config.hierarchy_cost,
            config.allow_multi_step,
        )
    }

    /// Plan and immediately execute, `Ok(None)` when no route exists.
    pub fn transform(
        &self,
        source: AnyValue,
        target: TypeTag,
        parameters: &Parameters,
    ) -> crate::Result<Option<AnyValue>> {
        self.transform_multiple_representations(std::iter::once(source), target, parameters)
    }

    /// Plan over several representations of the same logical value and
    /// immediately execute the winning route.
    pub fn transform_multiple_representations(
        &self,
        sources: impl IntoIterator<Item = AnyValue>,
        target: TypeTag,
        parameters: &Parameters,
    ) -> crate::Result<Option<AnyValue>> {
        match self.route_objects_default(sources, target, parameters) {
            Some(route) => route.apply(parameters).map(Some),
            None => Ok(None),
        }
    }

    /// Transform and downcast to `T`.
    ///
    /// Succeeds only when the final runtime type is exactly `T`; a route that
    /// reaches `T` purely through a hierarchy detour keeps the narrower
    /// runtime type and yields a `TypeMismatch` error instead.
    pub fn transform_into<T: Any + Send + Sync>(
        &self,
        source: AnyValue,
        parameters: &Parameters,
    ) -> crate::Result<Option<Arc<T>>> {
        match self.transform(source, TypeTag::of::<T>(), parameters)? {
            Some(value) => {
                let actual = value.tag();
                value
                    .downcast::<T>()
                    .map(Some)
                    .ok_or(crate::Error::TypeMismatch {
                        expected: TypeTag::of::<T>(),
                        actual,
                    })
            }
            None => Ok(None),
        }
    }

    /// Single-source-multi-target Dijkstra over the implicit type graph.
    ///
    /// The frontier is seeded with every hierarchy ancestor of every
    /// candidate (or just the candidates themselves with hierarchy disabled);
    /// ancestors other than the candidate itself get a synthetic
    /// transformer-free predecessor edge so reconstruction reports the
    /// original source type. Minimum selection walks the unsettled list in
    /// insertion order and keeps the first strictly smallest distance, which
    /// makes tie-breaking reproducible.
    fn route_multi_step(
        &self,
        sources: &[TypeTag],
        target: TypeTag,
        parameters: &Parameters,
        hierarchy_cost: HierarchyCost,
    ) -> Option<TransformationRoute> {
        let mut settled: HashSet<TypeTag> = HashSet::new();
        let mut unsettled: Vec<TypeTag> = Vec::new();
        let mut distances: HashMap<TypeTag, u32> = HashMap::new();
        let mut predecessors: HashMap<TypeTag, TransformationEdge> = HashMap::new();

        for &source in sources {
            for (ancestor, seed_cost) in self.hierarchy().ancestors_with_cost(source, hierarchy_cost) {
                let improves = distances
                    .get(&ancestor)
                    .map_or(true, |&known| seed_cost < known);
                if !improves {
                    continue;
                }
                distances.insert(ancestor, seed_cost);
                if !unsettled.contains(&ancestor) {
                    unsettled.push(ancestor);
                }
                if ancestor == source {
                    // A candidate source is its own origin.
                    predecessors.remove(&ancestor);
                } else {
                    predecessors.insert(
                        ancestor,
                        TransformationEdge {
                            source,
                            transformer: None,
                            cost: seed_cost,
                        },
                    );
                }
            }
        }

        while !unsettled.is_empty() {
            let position = {
                let mut best = 0;
                for (index, node) in unsettled.iter().enumerate().skip(1) {
                    if distances[node] < distances[&unsettled[best]] {
                        best = index;
                    }
                }
                best
            };
            let node = unsettled.remove(position);

            if node == target {
                let mut transformers = Vec::new();
                let mut cursor = node;
                while let Some(edge) = predecessors.get(&cursor) {
                    if let Some(transformer) = &edge.transformer {
                        transformers.push(Arc::clone(transformer));
                    }
                    cursor = edge.source;
                }
                transformers.reverse();
                return Some(TransformationRoute::new(
                    cursor,
                    target,
                    transformers,
                    distances[&node],
                ));
            }

            settled.insert(node);
            let node_distance = distances[&node];

            for (intermediate, transformers) in self.transformers_from(node) {
                for (ancestor, hop_cost) in
                    self.hierarchy().ancestors_with_cost(intermediate, hierarchy_cost)
                {
                    if settled.contains(&ancestor) {
                        continue;
                    }
                    for transformer in &transformers {
                        let edge_cost = transformer
                            .transformation_cost(parameters)
                            .saturating_add(hop_cost);
                        let tentative = node_distance.saturating_add(edge_cost);
                        let improves = distances
                            .get(&ancestor)
                            .map_or(true, |&known| tentative < known);
                        if improves {
                            distances.insert(ancestor, tentative);
                            if !unsettled.contains(&ancestor) {
                                unsettled.push(ancestor);
                            }
                            predecessors.insert(
                                ancestor,
                                TransformationEdge {
                                    source: node,
                                    transformer: Some(Arc::clone(transformer)),
                                    cost: edge_cost,
                                },
                            );
                        }
                    }
                }
            }
        }

        None
    }

    /// Exhaustive enumeration of every at-most-one-transformer route:
    /// hierarchy hops on the source side, one registered transformer,
    /// hierarchy hops on the target side, plus the zero-transformer
    /// "already compatible" candidate. First minimal candidate wins.
    fn route_single_step(
        &self,
        sources: &[TypeTag],
        target: TypeTag,
        parameters: &Parameters,
        hierarchy_cost: HierarchyCost,
    ) -> Option<TransformationRoute> {
        let mut best: Option<TransformationRoute> = None;

        for &source in sources {
            for (source_ancestor, source_hop_cost) in
                self.hierarchy().ancestors_with_cost(source, hierarchy_cost)
            {
                if source_ancestor == target {
                    let candidate =
                        TransformationRoute::new(source, target, Vec::new(), source_hop_cost);
                    if best.as_ref().map_or(true, |b| candidate.cost() < b.cost()) {
                        best = Some(candidate);
                    }
                }
                for (intermediate, transformers) in self.transformers_from(source_ancestor) {
                    let target_side = self
                        .hierarchy()
                        .ancestors_with_cost(intermediate, hierarchy_cost);
                    let Some(&target_hop_cost) = target_side.get(&target) else {
                        continue;
                    };
                    for transformer in &transformers {
                        let cost = source_hop_cost
                            .saturating_add(transformer.transformation_cost(parameters))
                            .saturating_add(target_hop_cost);
                        if best.as_ref().map_or(true, |b| cost < b.cost()) {
                            best = Some(TransformationRoute::new(
                                source,
                                target,
                                vec![Arc::clone(transformer)],
                                cost,
                            ));
                        }
                    }
                }
            }
        }

        best
    }
}
