use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;

struct Listeners<T> {
    next_id: u64,
    entries: Vec<(u64, Listener<T>)>,
}

/// A list of listeners notified in subscription order.
///
/// Listeners may subscribe or unsubscribe while an emit is in progress; the
/// change takes effect from the next emit.
pub struct EventChannel<T> {
    inner: Rc<RefCell<Listeners<T>>>,
}

impl<T> Default for EventChannel<T> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }
}

impl<T: 'static> EventChannel<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Keep the returned [`Subscription`] to remove it later.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push((id, Rc::new(listener)));

        let weak: Weak<RefCell<Listeners<T>>> = Rc::downgrade(&self.inner);
        Subscription {
            remove: Some(Box::new(move || {
                let Some(inner) = weak.upgrade() else {
                    return false;
                };
                let mut inner = inner.borrow_mut();
                let before = inner.entries.len();
                inner.entries.retain(|(entry_id, _)| *entry_id != id);
                inner.entries.len() != before
            })),
        }
    }

    /// Call every listener with `event`.
    pub fn emit(&self, event: &T) {
        let snapshot: Vec<Listener<T>> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle returned by [`EventChannel::subscribe`].
///
/// Dropping the handle keeps the listener registered.
pub struct Subscription {
    remove: Option<Box<dyn FnOnce() -> bool>>,
}

impl Subscription {
    /// Remove the listener. Returns false if it was already gone or the
    /// channel no longer exists.
    pub fn unsubscribe(mut self) -> bool {
        self.remove.take().is_some_and(|remove| remove())
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn listeners_run_in_subscription_order() {
        let channel = EventChannel::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ["a", "b", "c"] {
            let log = Rc::clone(&log);
            channel.subscribe(move |v| log.borrow_mut().push(format!("{tag}{v}")));
        }
        channel.emit(&7);
        assert_eq!(*log.borrow(), vec!["a7", "b7", "c7"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let channel = EventChannel::<u32>::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = channel.subscribe(move |_| h.set(h.get() + 1));
        channel.emit(&1);
        assert!(sub.unsubscribe());
        channel.emit(&2);
        assert_eq!(hits.get(), 1);
        assert!(channel.is_empty());
    }

    #[test]
    fn unsubscribe_after_channel_dropped() {
        let channel = EventChannel::<u32>::new();
        let sub = channel.subscribe(|_| {});
        drop(channel);
        assert!(!sub.unsubscribe());
    }

    #[test]
    fn subscribe_during_emit_does_not_panic() {
        let channel = Rc::new(EventChannel::<u32>::new());
        let c = Rc::clone(&channel);
        channel.subscribe(move |_| {
            c.subscribe(|_| {});
        });
        channel.emit(&0);
        assert_eq!(channel.len(), 2);
    }
}
