//! Observable market quotes.
//!
//! A [`SimpleQuote`] is owned by the caller and shared through `Arc`.
//! Consumers register a `Weak` [`Observer`] and are told when the value
//! changes; they decide themselves when to recompute.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::observer::{Observer, ObserverList};

/// A mutable, observable scalar such as a deposit rate or futures price.
///
/// A quote without a value is invalid; helpers reading it will refuse to
/// bootstrap.
///
/// ```rust
/// use pillar_core::quote::SimpleQuote;
///
/// let quote = SimpleQuote::new(0.0382);
/// assert_eq!(quote.value(), Some(0.0382));
/// quote.set_value(0.0390);
/// assert_eq!(quote.value(), Some(0.0390));
/// quote.reset();
/// assert!(!quote.is_valid());
/// ```
#[derive(Default)]
pub struct SimpleQuote {
    value: RwLock<Option<f64>>,
    observers: ObserverList,
}

impl SimpleQuote {
    /// Creates a quote holding `value`.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            value: RwLock::new(Some(value)),
            observers: ObserverList::new(),
        }
    }

    /// Creates a quote with no value.
    #[must_use]
    pub fn invalid() -> Self {
        Self::default()
    }

    /// Creates a shared quote.
    #[must_use]
    pub fn shared(value: f64) -> Arc<Self> {
        Arc::new(Self::new(value))
    }

    /// Current value, `None` when the quote is invalid.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        *self.value.read()
    }

    /// True if the quote holds a finite value.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.value().is_some_and(f64::is_finite)
    }

    /// Sets a new value and notifies observers if it differs from the old one.
    ///
    /// Returns the previous value.
    pub fn set_value(&self, value: f64) -> Option<f64> {
        self.replace(Some(value))
    }

    /// Clears the value, making the quote invalid.
    pub fn reset(&self) -> Option<f64> {
        self.replace(None)
    }

    fn replace(&self, value: Option<f64>) -> Option<f64> {
        let previous = {
            let mut guard = self.value.write();
            std::mem::replace(&mut *guard, value)
        };

        let changed = match (previous, value) {
            (Some(a), Some(b)) => a.to_bits() != b.to_bits(),
            (None, None) => false,
            _ => true,
        };
        if changed {
            self.notify_observers();
        }
        previous
    }

    /// Registers an observer. Dead observers are pruned on the way.
    pub fn register_observer(&self, observer: Weak<dyn Observer>) {
        self.observers.register(observer);
    }

    /// Removes an observer previously registered.
    pub fn unregister_observer(&self, observer: &Weak<dyn Observer>) {
        self.observers.unregister(observer);
    }

    /// Number of live observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Calls `update` on every live observer.
    pub fn notify_observers(&self) {
        self.observers.notify();
    }
}

impl std::fmt::Debug for SimpleQuote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleQuote")
            .field("value", &self.value())
            .field("observers", &self.observer_count())
            .finish()
    }
}
