//! Property-based tests for the derived views
//!
//! Invariants that should hold for ALL inputs:
//! - Coverage: every category appears exactly once in the forest
//! - Ordering: siblings are sorted by name at every level
//! - Termination: arbitrary parent maps (cycles included) build a forest
//! - Aggregates: recursive >= direct, direct counts sum to resolvable products
//! - Pagination: page sizes follow from the totals

use std::cmp::Ordering;
use std::collections::HashSet;

use catalog_core::features::aggregate::{aggregate_forest, unresolved_products};
use catalog_core::features::pagination::{paginate, PageRequest};
use catalog_core::features::tree::{
    build_forest, build_forest_with_report, compare_names, forest_iter, forest_size,
    CategoryNode,
};
use catalog_core::{Category, Product};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

const NAMES: &[&str] = &[
    "apple", "Apple", "banana", "Cherry", "cherry", "Éclair", "laptops", "Laptops", "Zoo", "zoo",
];

fn id(i: usize) -> String {
    format!("c{:03}", i)
}

/// Parent of node `i` is `None` or some `j < i`, so the result is acyclic
fn acyclic_categories() -> impl Strategy<Value = Vec<Category>> {
    (0usize..40).prop_flat_map(|n| {
        let parents: Vec<_> = (0..n)
            .map(|i| {
                if i == 0 {
                    Just(None::<usize>).boxed()
                } else {
                    proptest::option::of(0..i).boxed()
                }
            })
            .collect();
        let names = proptest::collection::vec(0..NAMES.len(), n);
        (parents, names)
    })
    .prop_map(|(parents, names)| to_categories(&parents, &names))
}

/// Any parent assignment, self-loops and cycles included
fn arbitrary_parent_map() -> impl Strategy<Value = Vec<Option<usize>>> {
    (1usize..30).prop_flat_map(|n| proptest::collection::vec(proptest::option::of(0..n), n))
}

fn to_categories(parents: &[Option<usize>], names: &[usize]) -> Vec<Category> {
    parents
        .iter()
        .enumerate()
        .map(|(i, parent)| {
            let name = NAMES[names.get(i).copied().unwrap_or(0) % NAMES.len()];
            let category = Category::new(id(i), name);
            match parent {
                Some(p) => category.with_parent(id(*p)),
                None => category,
            }
        })
        .collect()
}

/// Number of distinct cycles in a functional graph `i -> parents[i]`
fn count_cycles(parents: &[Option<usize>]) -> usize {
    let mut stamp = vec![usize::MAX; parents.len()];
    let mut cycles = 0;
    for start in 0..parents.len() {
        let mut current = Some(start);
        while let Some(node) = current {
            if stamp[node] == start {
                cycles += 1;
                break;
            }
            if stamp[node] != usize::MAX {
                break;
            }
            stamp[node] = start;
            current = parents[node];
        }
    }
    cycles
}

fn siblings_sorted(nodes: &[CategoryNode]) -> bool {
    nodes.windows(2).all(|pair| {
        compare_names(pair[0].name(), pair[1].name())
            .then_with(|| pair[0].id().cmp(pair[1].id()))
            != Ordering::Greater
    }) && nodes.iter().all(|n| siblings_sorted(&n.children))
}

// ============================================================================
// Tree Builder
// ============================================================================

proptest! {
    #[test]
    fn prop_acyclic_forest_keeps_every_node(categories in acyclic_categories()) {
        let (forest, report) = build_forest_with_report(&categories);

        prop_assert_eq!(forest_size(&forest), categories.len());
        prop_assert!(report.is_clean());
        prop_assert!(siblings_sorted(&forest));

        // every child hangs under its real parent
        for node in forest_iter(&forest) {
            for child in &node.children {
                prop_assert_eq!(child.category.parent_id.as_deref(), Some(node.id()));
            }
        }
    }

    #[test]
    fn prop_build_is_order_independent(categories in acyclic_categories()) {
        let mut reversed = categories.clone();
        reversed.reverse();
        prop_assert_eq!(build_forest(&categories), build_forest(&reversed));
    }

    #[test]
    fn prop_cycles_terminate_without_duplicates(parents in arbitrary_parent_map()) {
        let categories = to_categories(&parents, &[]);
        let (forest, report) = build_forest_with_report(&categories);

        let ids: Vec<&str> = forest_iter(&forest).map(|n| n.id()).collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        prop_assert_eq!(ids.len(), categories.len());
        prop_assert_eq!(unique.len(), categories.len());

        // one promotion per cycle
        prop_assert_eq!(report.promoted_cyclic.len(), count_cycles(&parents));
        prop_assert!(siblings_sorted(&forest));
    }
}

// ============================================================================
// Aggregator
// ============================================================================

proptest! {
    #[test]
    fn prop_aggregate_laws(
        categories in acyclic_categories(),
        placements in proptest::collection::vec((0usize..50, 0u32..10_000), 0..60),
    ) {
        // indices past the category count produce dangling products
        let products: Vec<Product> = placements
            .iter()
            .enumerate()
            .map(|(i, (cat, cents))| {
                Product::new(format!("p{i}"), format!("Product {i}"), *cents as f64 / 100.0, id(*cat))
            })
            .collect();

        let forest = build_forest(&categories);
        let aggregates = aggregate_forest(&forest, &products);

        prop_assert_eq!(aggregates.len(), categories.len());
        for aggregate in aggregates.values() {
            prop_assert!(aggregate.recursive_product_count >= aggregate.direct_product_count);
            prop_assert!(aggregate.recursive_price_sum + 1e-9 >= aggregate.direct_price_sum);
        }

        let resolvable = products.len() - unresolved_products(&forest, &products).len();
        let direct_total: usize = aggregates.values().map(|a| a.direct_product_count).sum();
        let root_total: usize = forest
            .iter()
            .map(|root| aggregates[root.id()].recursive_product_count)
            .sum();
        prop_assert_eq!(direct_total, resolvable);
        prop_assert_eq!(root_total, resolvable);

        // recomputation is idempotent
        prop_assert_eq!(aggregate_forest(&forest, &products), aggregates);
    }
}

// ============================================================================
// Pagination
// ============================================================================

proptest! {
    #[test]
    fn prop_page_size_follows_totals(
        total in 0usize..200,
        page in 1usize..30,
        per_page in 1usize..50,
    ) {
        let items: Vec<usize> = (0..total).collect();
        let result = paginate(&items, PageRequest::new(page, per_page)).unwrap();

        let expected = per_page.min(total.saturating_sub((page - 1) * per_page));
        prop_assert_eq!(result.items.len(), expected);
        prop_assert_eq!(result.total_pages, total.div_ceil(per_page));
        prop_assert_eq!(result.current_page, page);
        if let Some(first) = result.items.first() {
            prop_assert_eq!(*first, (page - 1) * per_page);
        }
    }
}
