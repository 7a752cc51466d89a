//! Hooks exposed to other plugins.
//!
//! Before a patrol path is attached, every registered listener is asked in
//! order. The first listener that answers decides: `Some(false)` blocks the
//! attachment (no path, no crate roll), `Some(true)` lets it proceed, and
//! `None` defers to the next listener.

use patrol_core::types::AgentId;

/// Name under which the pre-attach hook is published to other plugins.
pub const ON_BETTER_CHINOOK_PATROL: &str = "OnBetterChinookPatrol";

/// Receives the pre-attach hook.
pub trait AttachmentListener {
    /// Answer `Some(false)` to veto attaching a patrol path to `agent`.
    fn on_before_attach(&mut self, agent: AgentId) -> Option<bool>;
}

impl<F> AttachmentListener for F
where
    F: FnMut(AgentId) -> Option<bool>,
{
    fn on_before_attach(&mut self, agent: AgentId) -> Option<bool> {
        self(agent)
    }
}

/// Ordered set of listeners.
#[derive(Default)]
pub struct ListenerSet {
    listeners: Vec<Box<dyn AttachmentListener>>,
}

impl ListenerSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it is consulted after those already present.
    pub fn add(&mut self, listener: Box<dyn AttachmentListener>) {
        self.listeners.push(listener);
    }

    /// Register a closure as a listener.
    pub fn add_fn<F>(&mut self, listener: F)
    where
        F: FnMut(AgentId) -> Option<bool> + 'static,
    {
        self.add(Box::new(listener));
    }

    /// The first non-`None` answer, if any listener gave one.
    pub fn call(&mut self, agent: AgentId) -> Option<bool> {
        self.listeners
            .iter_mut()
            .find_map(|listener| listener.on_before_attach(agent))
    }

    /// Whether a listener vetoed attaching to `agent`.
    pub fn blocks(&mut self, agent: AgentId) -> bool {
        self.call(agent) == Some(false)
    }

    /// Number of listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
