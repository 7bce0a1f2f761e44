//! Change notification between market data and the objects built on it.
//!
//! Subjects keep `Weak` references to their observers so that a quote
//! never keeps a curve alive. Dead observers are pruned lazily.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Something that wants to hear about changes.
pub trait Observer: Send + Sync {
    /// Called after an observed value changed.
    fn update(&self);
}

/// The observer registry of a subject.
#[derive(Default)]
pub struct ObserverList {
    observers: Mutex<Vec<Weak<dyn Observer>>>,
}

impl ObserverList {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer. Registering the same observer twice is a no-op.
    pub fn register(&self, observer: Weak<dyn Observer>) {
        let mut observers = self.observers.lock();
        observers.retain(|o| o.strong_count() > 0);
        if !observers.iter().any(|o| Weak::ptr_eq(o, &observer)) {
            observers.push(observer);
        }
    }

    /// Removes an observer.
    pub fn unregister(&self, observer: &Weak<dyn Observer>) {
        self.observers
            .lock()
            .retain(|o| o.strong_count() > 0 && !Weak::ptr_eq(o, observer));
    }

    /// Number of live observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers
            .lock()
            .iter()
            .filter(|o| o.strong_count() > 0)
            .count()
    }

    /// True if no live observer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls `update` on every live observer.
    ///
    /// The list is copied out before calling anyone, so an observer may
    /// register or unregister from inside `update`.
    pub fn notify(&self) {
        let live: Vec<Arc<dyn Observer>> = {
            let mut observers = self.observers.lock();
            observers.retain(|o| o.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };

        log::trace!("notifying {} observer(s)", live.len());
        for observer in live {
            observer.update();
        }
    }
}

impl std::fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverList").field("live", &self.len()).finish()
    }
}
