use super::{Store, Subscription};
use std::sync::{Arc, PoisonError, RwLock};

/// A value derived from a [`Store`], recomputed on every notification.
///
/// The selector keeps its own subscription alive; dropping the selector
/// detaches it from the store.
pub struct Selector<U> {
    value: Arc<RwLock<U>>,
    _subscription: Subscription,
}

impl<U: Clone + Send + Sync + 'static> Selector<U> {
    /// Get the most recently derived value.
    pub fn get(&self) -> U {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<T: Send + Sync + 'static> Store<T> {
    /// Create a derived value by applying `f` to the store's state.
    ///
    /// # Example
    ///
    /// ```
    /// use jeels::Store;
    ///
    /// let store = Store::new(vec![1, 2, 3]);
    /// let len = store.select(|items| items.len());
    /// assert_eq!(len.get(), 3);
    ///
    /// store.set(vec![1]);
    /// assert_eq!(len.get(), 1);
    /// ```
    pub fn select<U, F>(&self, f: F) -> Selector<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let value = Arc::new(RwLock::new(self.read(&f)));
        let target = Arc::clone(&value);

        let subscription = self.subscribe(move |state| {
            let next = f(state);
            *target.write().unwrap_or_else(PoisonError::into_inner) = next;
        });

        Selector {
            value,
            _subscription: subscription,
        }
    }
}
