//! Patrol Rule: binds host lifecycle events to patrol planning.
//!
//! One [`PatrolRule`] lives for a server session:
//!
//! 1. `PatrolRule::new` compiles the filter from configuration.
//! 2. [`on_server_initialized`](PatrolRule::on_server_initialized) builds the
//!    eligible set once the map is known.
//! 3. [`on_agent_spawned`](PatrolRule::on_agent_spawned) queues an attachment
//!    for every patrolling chinook.
//! 4. [`on_tick`](PatrolRule::on_tick) runs the queued attachments on the
//!    following tick, after the chinook's own setup has settled.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace};

use patrol_core::config::{ConfigStore, PatrolConfig};
use patrol_core::eligible::{DropZoneReport, EligibleWaypointSet, build_eligible_set};
use patrol_core::filter::FilterRules;
use patrol_core::path::PatrolPath;
use patrol_core::types::{AgentId, DropZone, WaypointCandidate};

use crate::components::{AgentRegistry, BrainState, PatrolAgent};
use crate::hooks::{AttachmentListener, ListenerSet, ON_BETTER_CHINOOK_PATROL};
use crate::scheduler::{DeferredQueue, DeferredTask};

/// What happened to a queued attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// A patrol path was installed.
    Attached {
        /// The chinook.
        agent: AgentId,
        /// Rolled crate count, if the configured range allowed a roll.
        crates: Option<u32>,
    },
    /// The chinook despawned before the next tick.
    Despawned(AgentId),
    /// The chinook has no brain.
    NoBrain(AgentId),
    /// Something else already replaced the stock path finder.
    NotStockPathFinder(AgentId),
    /// A listener vetoed the attachment.
    Vetoed(AgentId),
}

/// Session state of the patrol plugin.
pub struct PatrolRule {
    config: PatrolConfig,
    rules: FilterRules,
    eligible: EligibleWaypointSet,
    report: DropZoneReport,
    pending: DeferredQueue<DeferredTask>,
    listeners: ListenerSet,
    rng: StdRng,
}

impl PatrolRule {
    /// Create the rule, seeding its RNG from the OS.
    #[must_use]
    pub fn new(config: PatrolConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create the rule with a fixed seed, for reproducible runs.
    #[must_use]
    pub fn with_seed(config: PatrolConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Load configuration from `store` (falling back to defaults) and create
    /// the rule.
    #[must_use]
    pub fn from_store(store: &ConfigStore) -> Self {
        Self::new(store.load().config)
    }

    fn with_rng(config: PatrolConfig, rng: StdRng) -> Self {
        let rules = FilterRules::from_config(&config);
        Self {
            config,
            rules,
            eligible: EligibleWaypointSet::default(),
            report: DropZoneReport::default(),
            pending: DeferredQueue::new(),
            listeners: ListenerSet::new(),
            rng,
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &PatrolConfig {
        &self.config
    }

    /// The compiled filter.
    #[must_use]
    pub fn filter_rules(&self) -> &FilterRules {
        &self.rules
    }

    /// Monuments chinooks may visit this session.
    #[must_use]
    pub fn eligible(&self) -> &EligibleWaypointSet {
        &self.eligible
    }

    /// Drop-zone summary of the eligible set.
    #[must_use]
    pub fn report(&self) -> &DropZoneReport {
        &self.report
    }

    /// Attachments waiting for the next tick.
    #[must_use]
    pub fn pending_attachments(&self) -> usize {
        self.pending.len()
    }

    /// Register a pre-attach listener.
    pub fn add_listener(&mut self, listener: Box<dyn AttachmentListener>) {
        self.listeners.add(listener);
    }

    /// Register a closure as a pre-attach listener.
    pub fn add_listener_fn<F>(&mut self, listener: F)
    where
        F: FnMut(AgentId) -> Option<bool> + 'static,
    {
        self.listeners.add_fn(listener);
    }

    // -----------------------------------------------------------------------
    // Host events
    // -----------------------------------------------------------------------

    /// Scan the map's monuments and build the eligible set.
    pub fn on_server_initialized<'a, I>(&mut self, monuments: I, drop_zones: &[DropZone])
    where
        I: IntoIterator<Item = &'a WaypointCandidate>,
    {
        let (eligible, report) = build_eligible_set(monuments, &self.rules, drop_zones);
        info!("{report}");
        self.eligible = eligible;
        self.report = report;
    }

    /// Queue a patrol attachment for a newly spawned chinook.
    ///
    /// Reinforcement chinooks and chinooks without a brain are ignored.
    pub fn on_agent_spawned(&mut self, agent: &dyn PatrolAgent) {
        if agent.is_reinforcement() || !agent.has_brain() {
            return;
        }
        self.pending.defer(DeferredTask::AttachPatrol(agent.id()));
    }

    /// Run the work deferred from the previous tick.
    pub fn on_tick(&mut self, registry: &mut dyn AgentRegistry) -> Vec<AttachOutcome> {
        self.pending
            .take_due()
            .into_iter()
            .map(|task| match task {
                DeferredTask::AttachPatrol(agent) => self.attach(registry, agent),
            })
            .collect()
    }

    fn attach(&mut self, registry: &mut dyn AgentRegistry, id: AgentId) -> AttachOutcome {
        let Some(agent) = registry.agent_mut(id) else {
            trace!(agent = %id, "Chinook despawned before patrol attachment");
            return AttachOutcome::Despawned(id);
        };

        {
            let Some(brain) = agent.brain_mut() else {
                return AttachOutcome::NoBrain(id);
            };

            if !brain.uses_stock_path_finder() {
                debug!(agent = %id, "Chinook path finder already replaced; leaving it alone");
                return AttachOutcome::NotStockPathFinder(id);
            }

            if self.listeners.blocks(id) {
                trace!(
                    agent = %id,
                    hook = ON_BETTER_CHINOOK_PATROL,
                    "Patrol attachment vetoed by listener"
                );
                return AttachOutcome::Vetoed(id);
            }

            let path = PatrolPath::generate(&self.eligible, &mut self.rng);
            debug!(agent = %id, waypoints = path.len(), "Installing patrol path");
            brain.install_path_finder(Box::new(path));

            if brain.current_state() == Some(BrainState::Patrol) {
                let next = brain.next_patrol_point();
                brain.set_main_interest_point(next);
            }
        }

        let crates = self.config.crate_drops().roll(&mut self.rng);
        if let Some(count) = crates {
            agent.set_crate_count(count);
        }

        AttachOutcome::Attached { agent: id, crates }
    }
}

impl std::fmt::Debug for PatrolRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatrolRule")
            .field("eligible", &self.eligible.len())
            .field("pending", &self.pending.len())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}
