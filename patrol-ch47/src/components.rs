//! Host capabilities the patrol rule relies on, plus in-memory reference
//! implementations.
//!
//! A host adapter implements [`PatrolAgent`], [`AgentBrain`] and
//! [`AgentRegistry`] over its own entity types. The `Ch47*` structs below
//! model the stock helicopter closely enough to drive the rule in tests and
//! serve as the template for such an adapter.

use std::collections::HashMap;

use patrol_core::types::{AgentId, Location};
use patrol_core::{PathFinder, PatrolPath};

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Behaviour state of a chinook brain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrainState {
    /// Flying between patrol points.
    Patrol,
    /// Circling the current interest point.
    Orbit,
    /// Hovering over a drop zone.
    DropCrate,
    /// Leaving the map.
    Egress,
    /// Not doing anything yet.
    Idle,
}

/// The AI brain of a chinook.
pub trait AgentBrain {
    /// Whether the brain is still driven by the host's own path finder.
    ///
    /// A brain without one, or with a replacement, is being managed by
    /// something else and must be left alone.
    fn uses_stock_path_finder(&self) -> bool;

    /// Replace the brain's path finder.
    fn install_path_finder(&mut self, finder: Box<dyn PathFinder>);

    /// Current behaviour state, if the brain has entered one.
    fn current_state(&self) -> Option<BrainState>;

    /// Ask the installed path finder for its next patrol point.
    fn next_patrol_point(&mut self) -> Location;

    /// Redirect the brain to a new destination right away.
    fn set_main_interest_point(&mut self, point: Location);
}

/// A spawned chinook.
pub trait PatrolAgent {
    /// Host identifier.
    fn id(&self) -> AgentId;

    /// Reinforcement chinooks land troops and never patrol.
    fn is_reinforcement(&self) -> bool;

    /// Whether the agent carries an AI brain at all.
    fn has_brain(&self) -> bool;

    /// Mutable access to the brain, if any.
    fn brain_mut(&mut self) -> Option<&mut dyn AgentBrain>;

    /// Set how many crates the chinook drops.
    fn set_crate_count(&mut self, count: u32);
}

/// Lookup of live agents by id.
pub trait AgentRegistry {
    /// The agent, or `None` if it despawned.
    fn agent_mut(&mut self, id: AgentId) -> Option<&mut dyn PatrolAgent>;
}

// ---------------------------------------------------------------------------
// Reference host types
// ---------------------------------------------------------------------------

/// What a [`Ch47Brain`] uses to choose patrol points.
#[derive(Debug)]
pub enum PathFinderSlot {
    /// No path finder at all.
    Missing,
    /// The host default: visits monuments in map order.
    Stock(PatrolPath),
    /// Replaced by a plugin.
    Custom(Box<dyn PathFinder>),
}

/// In-memory chinook brain.
#[derive(Debug)]
pub struct Ch47Brain {
    /// Current path finder.
    pub path_finder: PathFinderSlot,
    /// Current behaviour state.
    pub current_state: Option<BrainState>,
    /// Where the chinook is heading.
    pub main_interest_point: Location,
}

impl Ch47Brain {
    /// A freshly spawned brain running the stock, map-order path finder.
    #[must_use]
    pub fn stock(monuments: Vec<Location>) -> Self {
        Self {
            path_finder: PathFinderSlot::Stock(PatrolPath::from_sequence(monuments)),
            current_state: None,
            main_interest_point: Location::ZERO,
        }
    }

    /// Builder-style setter for the behaviour state.
    #[must_use]
    pub fn in_state(mut self, state: BrainState) -> Self {
        self.current_state = Some(state);
        self
    }
}

impl AgentBrain for Ch47Brain {
    fn uses_stock_path_finder(&self) -> bool {
        matches!(self.path_finder, PathFinderSlot::Stock(_))
    }

    fn install_path_finder(&mut self, finder: Box<dyn PathFinder>) {
        self.path_finder = PathFinderSlot::Custom(finder);
    }

    fn current_state(&self) -> Option<BrainState> {
        self.current_state
    }

    fn next_patrol_point(&mut self) -> Location {
        match &mut self.path_finder {
            PathFinderSlot::Missing => Location::ZERO,
            PathFinderSlot::Stock(path) => path.next_waypoint(),
            PathFinderSlot::Custom(finder) => finder.next_waypoint(),
        }
    }

    fn set_main_interest_point(&mut self, point: Location) {
        self.main_interest_point = point;
    }
}

/// Crates a stock chinook drops.
pub const DEFAULT_CRATE_COUNT: u32 = 1;

/// In-memory chinook.
#[derive(Debug)]
pub struct Ch47Agent {
    /// Host identifier.
    pub id: AgentId,
    /// Whether this is a landing reinforcement chinook.
    pub reinforcement: bool,
    /// The AI brain, if the prefab has one.
    pub brain: Option<Ch47Brain>,
    /// Crates to drop.
    pub crate_count: u32,
}

impl Ch47Agent {
    /// A patrolling chinook with the given brain.
    #[must_use]
    pub fn new(brain: Ch47Brain) -> Self {
        Self {
            id: AgentId::new(),
            reinforcement: false,
            brain: Some(brain),
            crate_count: DEFAULT_CRATE_COUNT,
        }
    }

    /// A reinforcement chinook.
    #[must_use]
    pub fn reinforcement(brain: Ch47Brain) -> Self {
        Self {
            reinforcement: true,
            ..Self::new(brain)
        }
    }

    /// A chinook without a brain.
    #[must_use]
    pub fn brainless() -> Self {
        Self {
            id: AgentId::new(),
            reinforcement: false,
            brain: None,
            crate_count: DEFAULT_CRATE_COUNT,
        }
    }
}

impl PatrolAgent for Ch47Agent {
    fn id(&self) -> AgentId {
        self.id
    }

    fn is_reinforcement(&self) -> bool {
        self.reinforcement
    }

    fn has_brain(&self) -> bool {
        self.brain.is_some()
    }

    fn brain_mut(&mut self) -> Option<&mut dyn AgentBrain> {
        self.brain.as_mut().map(|brain| brain as &mut dyn AgentBrain)
    }

    fn set_crate_count(&mut self, count: u32) {
        self.crate_count = count;
    }
}

/// In-memory set of live chinooks.
#[derive(Debug, Default)]
pub struct AgentWorld {
    agents: HashMap<AgentId, Ch47Agent>,
}

impl AgentWorld {
    /// Create an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an agent, returning its id.
    pub fn spawn(&mut self, agent: Ch47Agent) -> AgentId {
        let id = agent.id;
        self.agents.insert(id, agent);
        id
    }

    /// Remove an agent.
    pub fn despawn(&mut self, id: AgentId) -> Option<Ch47Agent> {
        self.agents.remove(&id)
    }

    /// Read-only access to an agent.
    #[must_use]
    pub fn get(&self, id: AgentId) -> Option<&Ch47Agent> {
        self.agents.get(&id)
    }

    /// Mutable access to an agent.
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Ch47Agent> {
        self.agents.get_mut(&id)
    }

    /// Number of live agents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether no agents are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl AgentRegistry for AgentWorld {
    fn agent_mut(&mut self, id: AgentId) -> Option<&mut dyn PatrolAgent> {
        self.agents
            .get_mut(&id)
            .map(|agent| agent as &mut dyn PatrolAgent)
    }
}
