use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;
type ListenerList<T> = RwLock<Vec<(usize, Listener<T>)>>;

/// A thread-safe observable store.
///
/// The state lives behind an `Arc<T>` snapshot. Every mutation builds a new
/// value and swaps the snapshot wholesale, so a snapshot handed out by
/// [`Store::get`] never changes underneath its holder.
pub struct Store<T> {
    state: Arc<RwLock<Arc<T>>>,
    listeners: Arc<ListenerList<T>>,
    next_id: Arc<AtomicUsize>,
}

impl<T: Send + Sync + 'static> Store<T> {
    /// Create a new store with the given initial state.
    pub fn new(initial: T) -> Self {
        Self {
            state: Arc::new(RwLock::new(Arc::new(initial))),
            listeners: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the current snapshot.
    pub fn get(&self) -> Arc<T> {
        Arc::clone(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace the state and notify subscribers.
    pub fn set(&self, new_state: T) {
        self.replace(Arc::new(new_state));
        self.notify();
    }

    /// Replace the state only when `f` produces a new value.
    ///
    /// The check and the swap happen under the same write lock. Returns
    /// `true` when the state changed (and subscribers were notified).
    pub fn try_update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&T) -> Option<T>,
    {
        self.try_update_with(f, |_| {})
    }

    /// Like [`Store::try_update`], but hands the new state to `commit` after
    /// the swap and before subscribers are notified.
    ///
    /// `commit` runs with no lock held; readers see the new state while it
    /// runs.
    pub fn try_update_with<F, C>(&self, f: F, commit: C) -> bool
    where
        F: FnOnce(&T) -> Option<T>,
        C: FnOnce(&T),
    {
        let next = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            match f(&state) {
                Some(next) => {
                    let next = Arc::new(next);
                    *state = Arc::clone(&next);
                    next
                }
                None => return false,
            }
        };
        commit(&next);
        self.notify();
        true
    }

    /// Subscribe to state changes.
    ///
    /// The callback runs after every mutation, once the new state is visible
    /// through [`Store::get`]. The listener stays registered for as long as the
    /// returned [`Subscription`] is alive.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let listener: Listener<T> = Arc::new(callback);
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));

        let listeners: Weak<ListenerList<T>> = Arc::downgrade(&self.listeners);
        Subscription {
            remove: Some(Box::new(move || {
                if let Some(listeners) = listeners.upgrade() {
                    listeners
                        .write()
                        .unwrap_or_else(PoisonError::into_inner)
                        .retain(|(listener_id, _)| *listener_id != id);
                }
            })),
        }
    }

    /// Number of registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Read state through a closure without cloning the snapshot handle.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn replace(&self, next: Arc<T>) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next;
    }

    /// Notify all subscribers of a state change.
    ///
    /// Listeners are copied out first and invoked with no lock held, so a
    /// listener may subscribe, unsubscribe, or mutate the store.
    fn notify(&self) {
        let listeners: Vec<Listener<T>> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        let state = self.get();
        for listener in listeners {
            listener(&state);
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Store<T> {
    /// Update the state using a function.
    ///
    /// `f` edits a copy of the current state; the copy then replaces the
    /// snapshot.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let mut next = T::clone(&state);
            f(&mut next);
            *state = Arc::new(next);
        }
        self.notify();
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            listeners: Arc::clone(&self.listeners),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

/// Handle for a registered store listener.
///
/// Dropping it removes the listener.
#[must_use = "dropping a Subscription unsubscribes the listener immediately"]
pub struct Subscription {
    remove: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Remove the listener now.
    pub fn unsubscribe(mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }

    /// Keep the listener registered for the lifetime of the store.
    pub fn detach(mut self) {
        self.remove = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Clone, Debug, PartialEq)]
    struct AppState {
        count: usize,
        name: String,
    }

    fn app_store() -> Store<AppState> {
        Store::new(AppState {
            count: 0,
            name: "test".to_string(),
        })
    }

    #[test]
    fn store_get_set() {
        let store = app_store();

        assert_eq!(store.get().count, 0);

        store.set(AppState {
            count: 42,
            name: "updated".to_string(),
        });

        assert_eq!(store.get().count, 42);
        assert_eq!(store.get().name, "updated");
    }

    #[test]
    fn store_update_replaces_snapshot() {
        let store = app_store();
        let before = store.get();

        store.update(|state| {
            state.count += 10;
        });

        assert_eq!(store.get().count, 10);
        // Old snapshots are never mutated in place.
        assert_eq!(before.count, 0);
        assert!(!Arc::ptr_eq(&before, &store.get()));
    }

    #[test]
    fn store_subscribe() {
        let store = app_store();

        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let _sub = store.subscribe(move |_state| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(call_count.load(Ordering::SeqCst), 0);

        store.update(|state| state.count += 1);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);

        store.update(|state| state.count += 1);
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn listener_sees_new_state() {
        let store = app_store();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let reader = store.clone();
        let seen_clone = seen.clone();
        let _sub = store.subscribe(move |state| {
            seen_clone
                .lock()
                .unwrap()
                .push((state.count, reader.get().count));
        });

        store.update(|state| state.count = 7);
        assert_eq!(*seen.lock().unwrap(), vec![(7, 7)]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let store = app_store();
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_clone = calls.clone();
        let sub = store.subscribe(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });
        store.update(|state| state.count += 1);
        sub.unsubscribe();
        store.update(|state| state.count += 1);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn detached_subscription_outlives_handle() {
        let store = app_store();
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_clone = calls.clone();
        store
            .subscribe(move |_| {
                calls_clone.fetch_add(1, Ordering::SeqCst);
            })
            .detach();
        store.update(|state| state.count += 1);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscribe_and_unsubscribe_during_notify() {
        let store = app_store();
        let late_calls = Arc::new(AtomicUsize::new(0));
        let held: Arc<Mutex<Vec<Subscription>>> = Arc::new(Mutex::new(Vec::new()));
        let own: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let inner_store = store.clone();
        let late = late_calls.clone();
        let held_clone = held.clone();
        let own_clone = own.clone();
        let sub = store.subscribe(move |_| {
            let late = late.clone();
            let sub = inner_store.subscribe(move |_| {
                late.fetch_add(1, Ordering::SeqCst);
            });
            held_clone.lock().unwrap().push(sub);
            // Drop our own registration mid-notification.
            own_clone.lock().unwrap().take();
        });
        *own.lock().unwrap() = Some(sub);

        store.update(|state| state.count += 1);
        // The listener added during notification was not part of the snapshot.
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);

        store.update(|state| state.count += 1);
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn try_update_skips_notify_on_no_change() {
        let store = app_store();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let _sub = store.subscribe(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!store.try_update(|_| None));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(store.try_update(|state| Some(AppState {
            count: state.count + 5,
            ..state.clone()
        })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.get().count, 5);
    }

    #[test]
    fn commit_runs_unlocked_before_notify() {
        let store = app_store();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let _sub = store.subscribe(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        let committed = Arc::new(Mutex::new(None));
        let reader = store.clone();
        let changed = store.try_update_with(
            |state| {
                Some(AppState {
                    count: state.count + 1,
                    ..state.clone()
                })
            },
            |next| {
                // Reading here would deadlock if the write lock were held.
                let current = reader.get().count;
                let notified = calls.load(Ordering::SeqCst);
                *committed.lock().unwrap() = Some((next.count, current, notified));
            },
        );

        assert!(changed);
        assert_eq!(*committed.lock().unwrap(), Some((1, 1, 0)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn commit_is_skipped_without_change() {
        let store = app_store();
        let committed = AtomicUsize::new(0);

        let changed = store.try_update_with(
            |_| None,
            |_| {
                committed.fetch_add(1, Ordering::SeqCst);
            },
        );
        assert!(!changed);
        assert_eq!(committed.load(Ordering::SeqCst), 0);
    }
}
