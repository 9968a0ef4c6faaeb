//! Observer trait for view state changes and a composite implementation.
//!
//! Defines [`ViewObserver`] for reacting to committed state changes of a
//! [`TableView`](crate::view::TableView), and [`CompositeViewObserver`]
//! which fans notifications out to several observers.

use std::sync::Arc;

use crate::view::ViewSnapshot;

/// Reacts to committed state changes of a table view.
///
/// Observers run synchronously after the mutator that caused the change.
/// They receive a read-only snapshot and have no way back into the view,
/// so an observer can never trigger a further change. State restored from
/// a URL or a preset is not reported.
///
/// Used as `Arc<dyn ViewObserver>`.
pub trait ViewObserver: Send + Sync {
    /// Called once per effective change; no-op mutations are not reported.
    fn on_change(&self, snapshot: &ViewSnapshot);
}

/// Composite observer that fans out to multiple observers.
#[derive(Default)]
pub struct CompositeViewObserver {
    observers: Vec<Arc<dyn ViewObserver>>,
}

impl CompositeViewObserver {
    #[must_use]
    pub fn new(observers: Vec<Arc<dyn ViewObserver>>) -> Self {
        Self { observers }
    }

    /// Adds an observer after construction.
    pub fn add(&mut self, observer: Arc<dyn ViewObserver>) {
        self.observers.push(observer);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl ViewObserver for CompositeViewObserver {
    fn on_change(&self, snapshot: &ViewSnapshot) {
        for observer in &self.observers {
            observer.on_change(snapshot);
        }
    }
}

impl std::fmt::Debug for CompositeViewObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeViewObserver")
            .field("observers", &self.observers.len())
            .finish()
    }
}
