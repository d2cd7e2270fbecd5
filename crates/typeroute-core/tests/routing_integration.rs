//! End-to-end routing tests over a small declared type hierarchy
//!
//! The fixture mirrors a typical widening lattice: `SourceSub` is declared
//! usable as both `SourceSuper` (its base) and `SourceMarker` (a capability
//! marker), with a matching lattice on the target side.

use std::sync::Arc;
use typeroute_core::{
    AnyValue, Error, FnTransformer, HierarchyCost, Parameters, Result, SharedTransformer, TypeTag,
    TypeTransformer, TypeTransformerRegistry,
};

struct SourceSuper;
struct SourceMarker;
struct SourceSub;
struct Middle;
struct TargetSuper;
struct TargetSub;

struct Alpha;
struct Mid;
struct Beta;
struct Gamma;

/// Transformer registered on `SourceSuper` that, like a real widening
/// conversion, accepts any declared narrowing of its source type.
struct SuperToMiddle;

impl TypeTransformer for SuperToMiddle {
    fn source_type(&self) -> TypeTag {
        TypeTag::of::<SourceSuper>()
    }

    fn target_type(&self) -> TypeTag {
        TypeTag::of::<Middle>()
    }

    fn transform(&self, value: &AnyValue, _parameters: &Parameters) -> Result<AnyValue> {
        if value.downcast_ref::<SourceSuper>().is_some()
            || value.downcast_ref::<SourceSub>().is_some()
        {
            Ok(AnyValue::new(Middle))
        } else {
            Err(Error::TypeMismatch {
                expected: TypeTag::of::<SourceSuper>(),
                actual: value.tag(),
            })
        }
    }
}

struct SuperToTargetSub;

impl TypeTransformer for SuperToTargetSub {
    fn source_type(&self) -> TypeTag {
        TypeTag::of::<SourceSuper>()
    }

    fn target_type(&self) -> TypeTag {
        TypeTag::of::<TargetSub>()
    }

    fn transformation_cost(&self, _parameters: &Parameters) -> u32 {
        20
    }

    fn transform(&self, value: &AnyValue, _parameters: &Parameters) -> Result<AnyValue> {
        if value.downcast_ref::<SourceSuper>().is_some()
            || value.downcast_ref::<SourceSub>().is_some()
        {
            Ok(AnyValue::new(TargetSub))
        } else {
            Err(Error::TypeMismatch {
                expected: TypeTag::of::<SourceSuper>(),
                actual: value.tag(),
            })
        }
    }
}

fn registry_with_hierarchy() -> TypeTransformerRegistry {
    let registry = TypeTransformerRegistry::new();
    registry.declare_subtype::<SourceSub, SourceSuper>();
    registry.declare_subtype::<SourceSub, SourceMarker>();
    registry.declare_subtype::<TargetSub, TargetSuper>();
    registry
}

fn fixed<S, T>(cost: u32, produce: impl Fn() -> T + Send + Sync + 'static) -> SharedTransformer
where
    S: std::any::Any + Send + Sync,
    T: std::any::Any + Send + Sync,
{
    FnTransformer::new(move |_: &S, _| Ok(produce()))
        .with_cost(cost)
        .into_shared()
}

#[test]
fn test_one_transformer_through_hierarchy_both_modes() {
    let registry = registry_with_hierarchy();
    registry.add_transformer(Arc::new(SuperToTargetSub));

    for allow_multi_step in [true, false] {
        let route = registry
            .route_types(
                [TypeTag::of::<SourceSub>()],
                TypeTag::of::<TargetSub>(),
                &Parameters::new(),
                HierarchyCost::PerHop(10),
                allow_multi_step,
            )
            .expect("hierarchy hop + transformer should connect");

        assert_eq!(route.source(), TypeTag::of::<SourceSub>());
        assert_eq!(route.target(), TypeTag::of::<TargetSub>());
        assert_eq!(route.cost(), 30);
        assert_eq!(route.transformations().len(), 1);

        // Hierarchy disabled: the only transformer starts at SourceSuper.
        assert!(registry
            .route_types(
                [TypeTag::of::<SourceSub>()],
                TypeTag::of::<TargetSub>(),
                &Parameters::new(),
                HierarchyCost::Disabled,
                allow_multi_step,
            )
            .is_none());
    }
}

#[test]
fn test_hierarchy_only_route_has_no_transformers() {
    let registry = registry_with_hierarchy();

    for allow_multi_step in [true, false] {
        let route = registry
            .route_objects(
                [AnyValue::new(SourceSub)],
                TypeTag::of::<SourceSuper>(),
                &Parameters::new(),
                HierarchyCost::PerHop(10),
                allow_multi_step,
            )
            .expect("declared subtype should satisfy its base");

        assert_eq!(route.source(), TypeTag::of::<SourceSub>());
        assert_eq!(route.target(), TypeTag::of::<SourceSuper>());
        assert_eq!(route.cost(), 10);
        assert!(route.is_identity());

        // The value passes through unchanged; usable-as, not converted.
        let transformed = route.apply(&Parameters::new()).unwrap();
        assert_eq!(transformed.tag(), TypeTag::of::<SourceSub>());

        assert!(registry
            .route_objects(
                [AnyValue::new(SourceSub)],
                TypeTag::of::<SourceSuper>(),
                &Parameters::new(),
                HierarchyCost::Disabled,
                allow_multi_step,
            )
            .is_none());
    }
}

#[test]
fn test_three_hop_object_route_executes() {
    let registry = registry_with_hierarchy();
    registry.add_transformer(Arc::new(SuperToMiddle));
    registry.add_transformer(fixed::<Middle, TargetSub>(30, || TargetSub));

    // Without hierarchy the SourceSub candidate cannot enter the graph.
    assert!(registry
        .route_objects(
            [AnyValue::new(SourceSub), AnyValue::new(String::new())],
            TypeTag::of::<TargetSub>(),
            &Parameters::new(),
            HierarchyCost::Disabled,
            true,
        )
        .is_none());

    let route = registry
        .route_objects(
            [AnyValue::new(SourceSub), AnyValue::new(String::new())],
            TypeTag::of::<TargetSub>(),
            &Parameters::new(),
            HierarchyCost::PerHop(5),
            true,
        )
        .expect("hop to SourceSuper, then two transformers");

    assert_eq!(route.initial_object().tag(), TypeTag::of::<SourceSub>());
    assert_eq!(route.cost(), 5 + 30 + 30);
    assert_eq!(route.transformations().len(), 2);

    let transformed = route.apply(&Parameters::new()).unwrap();
    assert_eq!(transformed.tag(), TypeTag::of::<TargetSub>());
}

#[test]
fn test_chaining_multi_step_vs_single_step() {
    let registry = TypeTransformerRegistry::new();
    registry.add_transformer(fixed::<Alpha, Mid>(10, || Mid));
    registry.add_transformer(fixed::<Mid, Beta>(10, || Beta));

    let route = registry
        .route_types(
            [TypeTag::of::<Alpha>()],
            TypeTag::of::<Beta>(),
            &Parameters::new(),
            HierarchyCost::Disabled,
            true,
        )
        .expect("two-transformer chain");
    assert_eq!(route.cost(), 20);
    assert_eq!(route.transformations().len(), 2);

    assert!(registry
        .route_types(
            [TypeTag::of::<Alpha>()],
            TypeTag::of::<Beta>(),
            &Parameters::new(),
            HierarchyCost::Disabled,
            false,
        )
        .is_none());
}

#[test]
fn test_parameter_sensitive_cost_switches_routes() {
    let registry = TypeTransformerRegistry::new();
    registry.add_transformer(fixed::<Alpha, Mid>(10, || Mid));
    registry.add_transformer(fixed::<Mid, Beta>(10, || Beta));
    registry.add_transformer(
        FnTransformer::new(|_: &Alpha, _| Ok(Beta))
            .with_cost_fn(|params| if params.contains("shortcut") { 5 } else { 40 })
            .into_shared(),
    );

    let expensive_direct = registry
        .route_types(
            [TypeTag::of::<Alpha>()],
            TypeTag::of::<Beta>(),
            &Parameters::new(),
            HierarchyCost::Disabled,
            true,
        )
        .unwrap();
    assert_eq!(expensive_direct.cost(), 20);
    assert_eq!(expensive_direct.transformations().len(), 2);

    let with_shortcut = registry
        .route_types(
            [TypeTag::of::<Alpha>()],
            TypeTag::of::<Beta>(),
            &Parameters::new().with("shortcut", true),
            HierarchyCost::Disabled,
            true,
        )
        .unwrap();
    assert_eq!(with_shortcut.cost(), 5);
    assert_eq!(with_shortcut.transformations().len(), 1);
}

#[test]
fn test_empty_candidates_yield_none() {
    let registry = TypeTransformerRegistry::new();
    registry.add_transformer(fixed::<Alpha, Beta>(10, || Beta));

    assert!(registry
        .route_types_default([], TypeTag::of::<Beta>(), &Parameters::new())
        .is_none());
    assert!(registry
        .route_objects_default([], TypeTag::of::<Beta>(), &Parameters::new())
        .is_none());
    assert!(registry
        .transform_multiple_representations([], TypeTag::of::<Beta>(), &Parameters::new())
        .unwrap()
        .is_none());
}

#[test]
fn test_routing_to_universal_root_is_trivial() {
    let registry = TypeTransformerRegistry::new();
    let route = registry
        .route_types_default([TypeTag::of::<Alpha>()], TypeTag::any(), &Parameters::new())
        .expect("everything reaches the root");
    assert_eq!(route.cost(), 0);
    assert!(route.is_identity());
    assert_eq!(route.source(), TypeTag::of::<Alpha>());
}

#[test]
fn test_later_candidate_of_same_type_wins() {
    let registry = TypeTransformerRegistry::new();
    registry.add_transformer(
        FnTransformer::new(|value: &String, _| Ok(value.len() as u64))
            .with_cost(10)
            .into_shared(),
    );

    let route = registry
        .route_objects_default(
            [
                AnyValue::new(String::from("first")),
                AnyValue::new(String::from("second")),
            ],
            TypeTag::of::<u64>(),
            &Parameters::new(),
        )
        .unwrap();

    assert_eq!(
        route.initial_object().downcast_ref::<String>().unwrap(),
        "second"
    );
}

#[test]
fn test_cheapest_candidate_representation_wins() {
    let registry = TypeTransformerRegistry::new();
    registry.add_transformer(fixed::<Alpha, Gamma>(50, || Gamma));
    registry.add_transformer(fixed::<Beta, Gamma>(10, || Gamma));

    let route = registry
        .route_types_default(
            [TypeTag::of::<Alpha>(), TypeTag::of::<Beta>()],
            TypeTag::of::<Gamma>(),
            &Parameters::new(),
        )
        .unwrap();

    assert_eq!(route.source(), TypeTag::of::<Beta>());
    assert_eq!(route.cost(), 10);
}

#[test]
fn test_equal_cost_tie_goes_to_first_registered() {
    let registry = TypeTransformerRegistry::new();
    let first = fixed::<Alpha, Beta>(10, || Beta);
    let second = fixed::<Alpha, Beta>(10, || Beta);
    registry.add_transformer(first.clone());
    registry.add_transformer(second);

    for allow_multi_step in [true, false] {
        let route = registry
            .route_types(
                [TypeTag::of::<Alpha>()],
                TypeTag::of::<Beta>(),
                &Parameters::new(),
                HierarchyCost::Disabled,
                allow_multi_step,
            )
            .unwrap();
        assert!(Arc::ptr_eq(&route.transformations()[0], &first));
    }
}

#[test]
fn test_direct_transform_helpers() {
    let registry = TypeTransformerRegistry::new();
    registry.add_transformer(
        FnTransformer::new(|value: &u32, _| Ok(value.to_string()))
            .with_cost(10)
            .into_shared(),
    );

    let transformed = registry
        .transform(AnyValue::new(5u32), TypeTag::of::<String>(), &Parameters::new())
        .unwrap()
        .expect("route exists");
    assert_eq!(transformed.downcast_ref::<String>().unwrap(), "5");

    let typed = registry
        .transform_into::<String>(AnyValue::new(6u32), &Parameters::new())
        .unwrap()
        .expect("route exists");
    assert_eq!(*typed, "6");

    // No route registered towards u64.
    assert!(registry
        .transform(AnyValue::new(5u32), TypeTag::of::<u64>(), &Parameters::new())
        .unwrap()
        .is_none());
}

#[test]
fn test_planning_is_read_only() {
    let registry = registry_with_hierarchy();
    registry.add_transformer(Arc::new(SuperToTargetSub));

    let before = registry.len();
    let _ = registry.route_types_default(
        [TypeTag::of::<SourceSub>()],
        TypeTag::of::<TargetSub>(),
        &Parameters::new(),
    );
    assert_eq!(registry.len(), before);
}
