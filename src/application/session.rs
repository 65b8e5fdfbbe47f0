//! Connected wallet session.
//!
//! There is exactly one connected account and chain at a time. Every workflow
//! instance registers itself with the session and is reset synchronously when
//! the identity changes, whether or not it is the instance the user is
//! looking at.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::info;

use crate::domain::{Address, Chain, Identity};

/// Something whose state is only valid for one identity.
pub trait IdentityBound: Send + Sync {
    /// Called with the new identity after the account or chain changed.
    fn identity_changed(&self, identity: &Identity);
}

/// Shared identity context passed to every workflow constructor.
pub struct Session {
    identity: watch::Sender<Identity>,
    members: Mutex<Vec<Weak<dyn IdentityBound>>>,
}

impl Session {
    #[must_use]
    pub fn new(identity: Identity) -> Arc<Self> {
        let (identity, _) = watch::channel(identity);
        Arc::new(Self {
            identity,
            members: Mutex::new(Vec::new()),
        })
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        *self.identity.borrow()
    }

    pub fn watch(&self) -> watch::Receiver<Identity> {
        self.identity.subscribe()
    }

    /// Register an instance for identity change notifications.
    ///
    /// The session only keeps a weak reference; dropping the instance
    /// unregisters it.
    pub fn register(&self, member: Weak<dyn IdentityBound>) {
        let mut members = self.members.lock();
        members.retain(|m| m.strong_count() > 0);
        members.push(member);
    }

    /// Number of live registered instances.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members
            .lock()
            .iter()
            .filter(|m| m.strong_count() > 0)
            .count()
    }

    pub fn switch_account(&self, account: Option<Address>) {
        let current = self.identity();
        self.set(Identity::new(account, current.chain));
    }

    pub fn switch_chain(&self, chain: Chain) {
        let current = self.identity();
        self.set(Identity::new(current.account, chain));
    }

    fn set(&self, identity: Identity) {
        if !self.identity.send_if_modified(|current| {
            if *current == identity {
                return false;
            }
            *current = identity;
            true
        }) {
            return;
        }

        info!(
            account = ?identity.account,
            chain = %identity.chain.name(),
            "Identity changed"
        );

        // Members may call back into the session, so notify outside the lock.
        let live: Vec<Arc<dyn IdentityBound>> = {
            let mut members = self.members.lock();
            members.retain(|m| m.strong_count() > 0);
            members.iter().filter_map(Weak::upgrade).collect()
        };
        for member in live {
            member.identity_changed(&identity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl IdentityBound for Counter {
        fn identity_changed(&self, _identity: &Identity) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn register(session: &Session) -> Arc<Counter> {
        let counter = Arc::new(Counter::default());
        let weak: Weak<dyn IdentityBound> = Arc::downgrade(&counter) as Weak<Counter>;
        session.register(weak);
        counter
    }

    #[test]
    fn every_member_is_notified() {
        let session = Session::new(Identity::disconnected(Chain::Ethereum));
        let a = register(&session);
        let b = register(&session);

        session.switch_account(Some(Address::repeat_byte(1)));

        assert_eq!(a.0.load(Ordering::SeqCst), 1);
        assert_eq!(b.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unchanged_identity_is_not_broadcast() {
        let session = Session::new(Identity::new(Some(Address::repeat_byte(1)), Chain::Polygon));
        let a = register(&session);

        session.switch_account(Some(Address::repeat_byte(1)));
        session.switch_chain(Chain::Polygon);

        assert_eq!(a.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn chain_switch_keeps_account() {
        let account = Some(Address::repeat_byte(7));
        let session = Session::new(Identity::new(account, Chain::Ethereum));
        let mut rx = session.watch();

        session.switch_chain(Chain::Bsc);

        assert_eq!(session.identity(), Identity::new(account, Chain::Bsc));
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn dropped_members_are_pruned() {
        let session = Session::new(Identity::disconnected(Chain::Ethereum));
        let kept = register(&session);
        drop(register(&session));

        assert_eq!(session.member_count(), 1);
        session.switch_account(Some(Address::repeat_byte(2)));
        assert_eq!(kept.0.load(Ordering::SeqCst), 1);
    }
}
