//! Persisted rotation pointer and its pure transitions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::RotationError;

/// Cyclic pointer over the product catalog.
///
/// `current_index` is always the start of the next unconsumed batch.
/// `batch_start` remembers where the batch drawn on `last_run_date` began,
/// so repeated calls on that day can hand back the same products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationState {
    pub product_order: Vec<String>,
    pub current_index: usize,
    pub last_run_date: Option<NaiveDate>,
    pub products_per_day: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_start: Option<usize>,
}

/// What changed when the state was reconciled with the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogChange {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl CatalogChange {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl RotationState {
    /// Fresh state in natural catalog order, never run.
    pub fn new(product_order: Vec<String>, products_per_day: usize) -> Result<Self, RotationError> {
        if product_order.is_empty() {
            return Err(RotationError::EmptyCatalog);
        }
        if products_per_day == 0 {
            return Err(RotationError::ZeroBatchSize);
        }

        Ok(Self {
            product_order,
            current_index: 0,
            last_run_date: None,
            products_per_day,
            batch_start: None,
        })
    }

    pub fn total(&self) -> usize {
        self.product_order.len()
    }

    /// Up to `products_per_day` products starting at `start`, wrapping.
    ///
    /// A batch never repeats a product, so a batch size at or above the
    /// catalog size yields the whole catalog once.
    pub fn batch_at(&self, start: usize) -> Vec<String> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }
        let size = self.products_per_day.min(total);
        (0..size)
            .map(|i| self.product_order[(start + i) % total].clone())
            .collect()
    }

    /// The batch that would be drawn next, without moving the pointer.
    pub fn next_batch(&self) -> Vec<String> {
        self.batch_at(self.current_index)
    }

    /// Whether a batch was already drawn on `today`.
    pub fn ran_on(&self, today: NaiveDate) -> bool {
        self.last_run_date == Some(today)
    }

    /// The batch already drawn today.
    pub fn todays_batch(&self) -> Vec<String> {
        self.batch_at(self.batch_start.unwrap_or(self.current_index))
    }

    /// Draws the next batch and advances the pointer to `today`.
    pub fn advance(&mut self, today: NaiveDate) -> Vec<String> {
        let batch = self.next_batch();
        let total = self.total();

        self.batch_start = Some(self.current_index);
        self.current_index = if self.products_per_day >= total {
            0
        } else {
            (self.current_index + self.products_per_day) % total
        };
        self.last_run_date = Some(today);

        batch
    }

    /// `ceil(total / products_per_day)`.
    pub fn days_for_full_rotation(&self) -> usize {
        if self.products_per_day == 0 {
            return 0;
        }
        self.total().div_ceil(self.products_per_day)
    }

    /// One-based day number within the current rotation.
    pub fn current_rotation_day(&self) -> usize {
        if self.products_per_day == 0 {
            return 1;
        }
        self.current_index / self.products_per_day + 1
    }

    /// Aligns `product_order` with `catalog`.
    ///
    /// Products no longer in the catalog are dropped and the pointers move to
    /// the next surviving product; new products are appended in catalog order.
    pub fn reconcile(&mut self, catalog: &[String]) -> Result<CatalogChange, RotationError> {
        let removed: Vec<String> = self
            .product_order
            .iter()
            .filter(|id| !catalog.contains(id))
            .cloned()
            .collect();

        let mut order: Vec<String> = Vec::with_capacity(catalog.len());
        for id in &self.product_order {
            if catalog.contains(id) && !order.contains(id) {
                order.push(id.clone());
            }
        }
        let added: Vec<String> = catalog
            .iter()
            .filter(|id| !order.contains(id))
            .cloned()
            .collect();

        let change = CatalogChange { added, removed };
        let duplicates = order.len() + change.removed.len() != self.product_order.len();
        if change.is_empty() && !duplicates {
            return Ok(change);
        }

        let current = self.remap_index(self.current_index, &order);
        let batch_start = self.batch_start.map(|start| self.remap_index(start, &order));

        order.extend(change.added.iter().cloned());
        if order.is_empty() {
            return Err(RotationError::EmptyCatalog);
        }

        self.product_order = order;
        self.current_index = current;
        self.batch_start = batch_start;

        Ok(change)
    }

    /// New position of the first product at or after `index` (cyclically)
    /// that survives into `surviving`.
    fn remap_index(&self, index: usize, surviving: &[String]) -> usize {
        let total = self.total();
        (0..total)
            .map(|offset| &self.product_order[(index + offset) % total])
            .find_map(|id| surviving.iter().position(|s| s == id))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).expect("valid date")
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert!(matches!(
            RotationState::new(Vec::new(), 2),
            Err(RotationError::EmptyCatalog)
        ));
        assert!(matches!(
            RotationState::new(ids(&["a"]), 0),
            Err(RotationError::ZeroBatchSize)
        ));
    }

    #[test]
    fn test_batch_wraps() {
        let mut state = RotationState::new(ids(&["a", "b", "c", "d", "e"]), 2).expect("state");
        state.current_index = 4;
        assert_eq!(state.next_batch(), ids(&["e", "a"]));
    }

    #[test]
    fn test_advance_moves_pointer() {
        let mut state = RotationState::new(ids(&["a", "b", "c", "d", "e"]), 2).expect("state");

        assert_eq!(state.advance(day(1)), ids(&["a", "b"]));
        assert_eq!(state.current_index, 2);
        assert_eq!(state.batch_start, Some(0));
        assert!(state.ran_on(day(1)));
        assert_eq!(state.todays_batch(), ids(&["a", "b"]));

        assert_eq!(state.advance(day(2)), ids(&["c", "d"]));
        assert_eq!(state.advance(day(3)), ids(&["e", "a"]));
        assert_eq!(state.current_index, 1);
    }

    #[test]
    fn test_batch_larger_than_catalog() {
        let mut state = RotationState::new(ids(&["a", "b", "c"]), 5).expect("state");
        assert_eq!(state.advance(day(1)), ids(&["a", "b", "c"]));
        assert_eq!(state.current_index, 0);
        assert_eq!(state.days_for_full_rotation(), 1);
    }

    #[test]
    fn test_status_numbers() {
        let mut state = RotationState::new(ids(&["a", "b", "c", "d", "e"]), 2).expect("state");
        assert_eq!(state.days_for_full_rotation(), 3);
        assert_eq!(state.current_rotation_day(), 1);
        state.current_index = 4;
        assert_eq!(state.current_rotation_day(), 3);
    }

    #[test]
    fn test_todays_batch_without_start_falls_back() {
        let mut state = RotationState::new(ids(&["a", "b", "c"]), 1).expect("state");
        state.current_index = 2;
        state.last_run_date = Some(day(1));
        assert_eq!(state.todays_batch(), ids(&["c"]));
    }

    #[test]
    fn test_reconcile_noop() {
        let mut state = RotationState::new(ids(&["a", "b"]), 1).expect("state");
        let change = state.reconcile(&ids(&["b", "a"])).expect("reconcile");
        assert!(change.is_empty());
        assert_eq!(state.product_order, ids(&["a", "b"]));
    }

    #[test]
    fn test_reconcile_removed_keeps_next_product_next() {
        let mut state = RotationState::new(ids(&["a", "b", "c", "d"]), 2).expect("state");
        state.current_index = 2;
        state.batch_start = Some(0);

        let change = state.reconcile(&ids(&["a", "b", "d"])).expect("reconcile");

        assert_eq!(change.removed, ids(&["c"]));
        assert_eq!(state.product_order, ids(&["a", "b", "d"]));
        assert_eq!(state.product_order[state.current_index], "d");
        assert_eq!(state.batch_start, Some(0));
    }

    #[test]
    fn test_reconcile_appends_new_products() {
        let mut state = RotationState::new(ids(&["a", "b"]), 1).expect("state");
        state.current_index = 1;

        let change = state.reconcile(&ids(&["x", "a", "b"])).expect("reconcile");

        assert_eq!(change.added, ids(&["x"]));
        assert_eq!(state.product_order, ids(&["a", "b", "x"]));
        assert_eq!(state.current_index, 1);
    }

    #[test]
    fn test_reconcile_removed_at_tail_wraps() {
        let mut state = RotationState::new(ids(&["a", "b", "c"]), 1).expect("state");
        state.current_index = 2;

        state.reconcile(&ids(&["a", "b"])).expect("reconcile");
        assert_eq!(state.current_index, 0);
    }

    #[test]
    fn test_reconcile_everything_replaced() {
        let mut state = RotationState::new(ids(&["a", "b"]), 1).expect("state");
        state.current_index = 1;

        let change = state.reconcile(&ids(&["y", "z"])).expect("reconcile");
        assert_eq!(change.removed, ids(&["a", "b"]));
        assert_eq!(state.product_order, ids(&["y", "z"]));
        assert_eq!(state.current_index, 0);
    }

    #[test]
    fn test_reconcile_empty_catalog() {
        let mut state = RotationState::new(ids(&["a"]), 1).expect("state");
        assert!(matches!(
            state.reconcile(&[]),
            Err(RotationError::EmptyCatalog)
        ));
    }

    #[test]
    fn test_serializes_date_as_iso() {
        let mut state = RotationState::new(ids(&["a"]), 1).expect("state");
        state.last_run_date = Some(day(7));
        let json = serde_json::to_value(&state).expect("serialize");
        assert_eq!(json["last_run_date"], "2026-03-07");

        let legacy = r#"{"product_order":["a"],"current_index":0,"last_run_date":null,"products_per_day":4}"#;
        let parsed: RotationState = serde_json::from_str(legacy).expect("parse");
        assert_eq!(parsed.batch_start, None);
    }
}
