//! Synchronous callback registry used for change notifications.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(0);

/// Handle returned by [`Listeners::add`], used to remove the callback later.
///
/// Ids are unique across every registry in the process, so an owner of
/// several registries can route a removal without knowing where the id
/// came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        ListenerId(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Ordered list of callbacks fired on the calling thread.
///
/// `notify` borrows the registry mutably, so a callback can never add or
/// remove entries of the list that is currently firing.
pub struct Listeners<T: ?Sized> {
    entries: Vec<(ListenerId, Box<dyn FnMut(&T)>)>,
}

impl<T: ?Sized> Listeners<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a callback. Callbacks fire in registration order.
    pub fn add(&mut self, callback: impl FnMut(&T) + 'static) -> ListenerId {
        let id = ListenerId::next();
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns false if it was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Call every registered callback with `value`.
    pub fn notify(&mut self, value: &T) {
        for (_, callback) in self.entries.iter_mut() {
            callback(value);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: ?Sized> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn notifies_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners: Listeners<u32> = Listeners::new();

        let first = log.clone();
        listeners.add(move |v| first.borrow_mut().push(("first", *v)));
        let second = log.clone();
        listeners.add(move |v| second.borrow_mut().push(("second", *v)));

        listeners.notify(&7);
        assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn removed_listener_is_not_called() {
        let count = Rc::new(RefCell::new(0));
        let mut listeners: Listeners<str> = Listeners::new();

        let counter = count.clone();
        let id = listeners.add(move |_| *counter.borrow_mut() += 1);
        listeners.notify("a");
        assert!(listeners.remove(id));
        assert!(!listeners.remove(id));
        listeners.notify("b");

        assert_eq!(*count.borrow(), 1);
        assert!(listeners.is_empty());
    }

    #[test]
    fn ids_are_not_shared_between_registries() {
        let mut numbers: Listeners<u32> = Listeners::new();
        let mut words: Listeners<str> = Listeners::new();
        let number_id = numbers.add(|_| {});
        let word_id = words.add(|_| {});

        assert_ne!(number_id, word_id);
        assert!(!numbers.remove(word_id));
        assert!(!words.remove(number_id));
        assert_eq!(numbers.len(), 1);
        assert_eq!(words.len(), 1);
    }
}
