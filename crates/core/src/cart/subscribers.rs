//! Change subscribers

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::cart::Cart;

new_key_type! {
    /// Subscriber Key
    pub(crate) struct SubscriberKey;
}

type Callback = Rc<RefCell<dyn FnMut(&Cart)>>;

type Registry = SlotMap<SubscriberKey, Callback>;

/// Callbacks invoked with the cart after every mutation.
#[derive(Default)]
pub(crate) struct Subscribers {
    registry: Rc<RefCell<Registry>>,
}

impl Subscribers {
    pub(crate) fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&Cart) + 'static,
    {
        let callback: Callback = Rc::new(RefCell::new(callback));
        let key = self.registry.borrow_mut().insert(callback);

        Subscription {
            key,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Call every subscriber registered when notification starts.
    ///
    /// The registry is not borrowed while a callback runs, so callbacks may
    /// subscribe or unsubscribe. A subscriber removed mid-notification is not
    /// called; one added mid-notification waits for the next change.
    pub(crate) fn notify(&self, cart: &Cart) {
        let pending: SmallVec<[(SubscriberKey, Callback); 4]> = self
            .registry
            .borrow()
            .iter()
            .map(|(key, callback)| (key, Rc::clone(callback)))
            .collect();

        for (key, callback) in pending {
            if !self.registry.borrow().contains_key(key) {
                continue;
            }

            // A callback already running further up the stack is skipped.
            if let Ok(mut callback) = callback.try_borrow_mut() {
                (&mut *callback)(cart);
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.registry.borrow().len()
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.len())
            .finish()
    }
}

/// Handle returned by [`CartStore::subscribe`](crate::cart::CartStore::subscribe).
///
/// Dropping the handle leaves the subscriber registered; call
/// [`Subscription::unsubscribe`] to stop notifications.
pub struct Subscription {
    key: SubscriberKey,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    /// Stop notifications. Returns whether the subscriber was still registered,
    /// so only the first call returns `true`.
    pub fn unsubscribe(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.borrow_mut().remove(self.key).is_some())
    }

    /// Whether the subscriber is still registered.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.borrow().contains_key(self.key))
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("active", &self.is_active())
            .finish()
    }
}
