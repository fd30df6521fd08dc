//! Reconciliation of a working copy against a keyed collection
//!
//! A plan captures the exact removals, additions, and updates needed to make
//! the store match the working copy. Phases are kept in remove, add, update
//! order when applied.

pub mod display;

use std::collections::HashMap;

use uuid::Uuid;

use crate::storage::{KeyedTable, StorageError, StoreEntity};

/// Counts of applied changes per collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub removed: usize,
    pub added: usize,
    pub updated: usize,
}

impl ReconcileReport {
    /// Whether anything was changed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed == 0 && self.added == 0 && self.updated == 0
    }
}

impl std::ops::Add for ReconcileReport {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            removed: self.removed + other.removed,
            added: self.added + other.added,
            updated: self.updated + other.updated,
        }
    }
}

/// The three-phase diff between a working copy and the stored collection
#[derive(Debug, Clone)]
pub struct ReconcilePlan<T> {
    /// Stored entities absent from the working copy
    pub removed: Vec<T>,
    /// Working entities absent from the store
    pub added: Vec<T>,
    /// Entities present on both sides with different content, as
    /// (stored, working) pairs
    pub updated: Vec<(T, T)>,
}

impl<T: StoreEntity> ReconcilePlan<T> {
    /// Compute the plan against the store's current state
    ///
    /// The working copy is the sole source of truth for the desired end
    /// state; entities structurally identical to their stored value are left
    /// out so observers see no redundant updates.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn build(working: &[T], store: &KeyedTable<'_, T>) -> Result<Self, StorageError> {
        let stored_list = store.list()?;

        // Keep the store's name-ordered enumeration so plan output is stable
        let removed = stored_list
            .iter()
            .filter(|entity| !working.iter().any(|w| w.id() == entity.id()))
            .cloned()
            .collect();

        let stored: HashMap<Uuid, T> = stored_list
            .into_iter()
            .map(|entity| (entity.id(), entity))
            .collect();

        let mut added = Vec::new();
        let mut updated = Vec::new();
        for entity in working {
            match stored.get(&entity.id()) {
                None => added.push(entity.clone()),
                Some(current) if current != entity => {
                    updated.push((current.clone(), entity.clone()));
                }
                Some(_) => {}
            }
        }

        Ok(Self {
            removed,
            added,
            updated,
        })
    }

    /// Apply the plan to the store
    ///
    /// Caller is expected to hold a buffered update scope; atomicity of the
    /// scope is the store's guarantee, not re-implemented here. Phase order
    /// must not change.
    ///
    /// # Errors
    /// Returns an error if any store call fails; the enclosing scope then
    /// rolls back.
    pub fn apply(&self, store: &KeyedTable<'_, T>) -> Result<ReconcileReport, StorageError> {
        if !self.removed.is_empty() {
            store.remove(&self.removed)?;
        }
        if !self.added.is_empty() {
            store.add(&self.added)?;
        }
        for (_, entity) in &self.updated {
            store.update(entity)?;
        }

        Ok(ReconcileReport {
            removed: self.removed.len(),
            added: self.added.len(),
            updated: self.updated.len(),
        })
    }

    /// Whether the plan contains any operation
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty() && self.updated.is_empty()
    }
}
