//! Observable state containers for screens.
//!
//! A container owns a state value and a reducer. Events go in through
//! `send`; observers hold a `watch::Receiver` and see every published state.

use tokio::sync::watch;

pub type Reducer<S, E> = fn(&mut S, E);

pub struct StateContainer<S, E> {
    tx: watch::Sender<S>,
    reducer: Reducer<S, E>,
}

impl<S: Clone, E> StateContainer<S, E> {
    pub fn new(initial: S, reducer: Reducer<S, E>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx, reducer }
    }

    /// Apply one event and notify observers
    pub fn send(&self, event: E) {
        let reducer = self.reducer;
        self.tx.send_modify(|state| reducer(state, event));
    }

    /// Mutate state directly, for controller-side bookkeeping
    pub fn update(&self, f: impl FnOnce(&mut S)) {
        self.tx.send_modify(f);
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }
}
