//! Daily product rotation.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use super::state::RotationState;
use super::store::RotationStore;
use crate::config::BlogConfig;
use crate::error::RotationError;

/// Read-only view of where the rotation stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RotationStatus {
    pub total_products: usize,
    pub products_per_day: usize,
    pub days_for_full_rotation: usize,
    pub current_day: usize,
    pub current_index: usize,
    pub last_run_date: Option<NaiveDate>,
    pub next_batch: Vec<String>,
}

/// Decides which products are covered on which day.
///
/// The state is read and written once per [`todays_batch`](Self::todays_batch)
/// call. A single scheduling call per process run is assumed.
pub struct RotationScheduler {
    store: Arc<dyn RotationStore>,
    catalog: Vec<String>,
    products_per_day: usize,
}

impl RotationScheduler {
    pub fn new(
        store: Arc<dyn RotationStore>,
        catalog: Vec<String>,
        products_per_day: usize,
    ) -> Result<Self, RotationError> {
        if catalog.is_empty() {
            return Err(RotationError::EmptyCatalog);
        }
        if products_per_day == 0 {
            return Err(RotationError::ZeroBatchSize);
        }
        Ok(Self {
            store,
            catalog,
            products_per_day,
        })
    }

    pub fn from_config(
        config: &BlogConfig,
        store: Arc<dyn RotationStore>,
    ) -> Result<Self, RotationError> {
        Self::new(
            store,
            config.product_ids(),
            config.generation.products_per_day,
        )
    }

    /// Loads the persisted state (or a fresh one) aligned with the catalog.
    ///
    /// Returns the state and whether reconciliation changed it.
    fn load_state(&self) -> Result<(RotationState, bool), RotationError> {
        let mut state = match self.store.load()? {
            Some(state) => state,
            None => {
                debug!("No rotation state found, starting from the first product");
                RotationState::new(self.catalog.clone(), self.products_per_day)?
            }
        };

        let change = state.reconcile(&self.catalog)?;
        if !change.is_empty() {
            info!(
                added = ?change.added,
                removed = ?change.removed,
                "Product catalog changed since last rotation"
            );
        }

        Ok((state, !change.is_empty()))
    }

    /// Products to generate for `today`.
    ///
    /// The first call on a new day draws the next batch and persists the
    /// advanced pointer; later calls that day return the same batch.
    pub fn todays_batch(&self, today: NaiveDate) -> Result<Vec<String>, RotationError> {
        let (mut state, reconciled) = self.load_state()?;

        if state.ran_on(today) {
            if reconciled {
                self.store.save(&state)?;
            }
            let batch = state.todays_batch();
            debug!(date = %today, products = ?batch, "Rotation already advanced today");
            return Ok(batch);
        }

        state.products_per_day = self.products_per_day;
        let batch = state.advance(today);
        self.store.save(&state)?;

        info!(
            date = %today,
            products = ?batch,
            next_index = state.current_index,
            "Advanced product rotation"
        );

        Ok(batch)
    }

    /// Current rotation status. Never writes to the store.
    pub fn status(&self) -> Result<RotationStatus, RotationError> {
        let (state, _) = self.load_state()?;

        Ok(RotationStatus {
            total_products: state.total(),
            products_per_day: state.products_per_day,
            days_for_full_rotation: state.days_for_full_rotation(),
            current_day: state.current_rotation_day(),
            current_index: state.current_index,
            last_run_date: state.last_run_date,
            next_batch: state.next_batch(),
        })
    }
}
