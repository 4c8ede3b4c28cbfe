//! Multi-component views: lazy joins over entities holding every component
//! in a query tuple.
//!
//! A view never materializes the intersection. The store with the fewest
//! live components drives the iteration, which bounds the number of probes
//! by the smallest candidate set; the remaining stores are tested per
//! candidate through O(1) sparse lookups, cheapest rejection first. A store
//! with zero live components (or one that was never created) short-circuits
//! to an empty view.

use mosaic_foundation::Entity;

use crate::sparse_set::Entities;
use crate::store::{AnyStore, StoreRegistry};

/// Lazy iterator over entities carrying every component of a query.
///
/// Views are cheap to build and meant to be consumed on the spot; obtain a
/// fresh one per pass rather than storing it. A view borrows the registry
/// immutably, so structural mutation while iterating is rejected at compile
/// time.
#[derive(Clone)]
pub struct View<'a> {
    driver: Entities<'a>,
    probes: Vec<&'a dyn AnyStore>,
}

impl<'a> View<'a> {
    /// Builds a view joining the given stores.
    pub(crate) fn new(stores: Vec<&'a dyn AnyStore>) -> Self {
        if stores.is_empty() || stores.iter().any(|store| store.is_empty()) {
            return Self::empty();
        }

        // Drive from the smallest store; ties break to the first. The rest
        // become probes, ordered so the most selective test runs first.
        let driver_index = stores
            .iter()
            .enumerate()
            .min_by_key(|(_, store)| store.len())
            .map_or(0, |(index, _)| index);
        let driver = stores[driver_index].entities();

        let mut probes: Vec<_> = stores
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != driver_index)
            .map(|(_, store)| *store)
            .collect();
        probes.sort_by_key(|store| store.len());

        Self { driver, probes }
    }

    pub(crate) fn empty() -> Self {
        Self {
            driver: Entities::empty(),
            probes: Vec::new(),
        }
    }
}

impl Iterator for View<'_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        'candidates: for entity in self.driver.by_ref() {
            for probe in &self.probes {
                if !probe.has(entity) {
                    continue 'candidates;
                }
            }

            return Some(entity);
        }

        None
    }
}

/// Component tuples usable as view queries, `(A,)` up to eight components.
pub trait ViewQuery {
    /// Collects the erased store of every component type in the query, or
    /// `None` when any of them was never used.
    #[doc(hidden)]
    fn stores(stores: &StoreRegistry) -> Option<Vec<&dyn AnyStore>>;
}

macro_rules! impl_view_query {
    ($($component:ident),+) => {
        impl<$($component: 'static),+> ViewQuery for ($($component,)+) {
            fn stores(stores: &StoreRegistry) -> Option<Vec<&dyn AnyStore>> {
                Some(vec![$(stores.erased::<$component>()?),+])
            }
        }
    };
}

impl_view_query!(T1);
impl_view_query!(T1, T2);
impl_view_query!(T1, T2, T3);
impl_view_query!(T1, T2, T3, T4);
impl_view_query!(T1, T2, T3, T4, T5);
impl_view_query!(T1, T2, T3, T4, T5, T6);
impl_view_query!(T1, T2, T3, T4, T5, T6, T7);
impl_view_query!(T1, T2, T3, T4, T5, T6, T7, T8);
