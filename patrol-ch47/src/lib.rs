//! # patrol-ch47: CH47 Integration for Patrol Core
//!
//! This crate provides the integration layer between the host-agnostic
//! `patrol-core` library and the host's chinook lifecycle.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            Host simulation              │
//! │  ┌───────────────────────────────────┐  │
//! │  │         patrol-ch47               │  │
//! │  │  ┌─────────────┐ ┌─────────────┐  │  │
//! │  │  │ PatrolRule  │ │  Scheduler  │  │  │
//! │  │  └──────┬──────┘ └──────┬──────┘  │  │
//! │  │         │               │         │  │
//! │  │         ▼               ▼         │  │
//! │  │    ┌─────────────────────────┐    │  │
//! │  │    │      patrol-core        │    │  │
//! │  │    └─────────────────────────┘    │  │
//! │  └───────────────────────────────────┘  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `components`: capability traits for agents and brains, plus reference host types
//! - `hooks`: the pre-attach veto hook offered to other plugins
//! - `logging`: `tracing` subscriber setup
//! - `rule`: session state and the host event handlers
//! - `scheduler`: one-tick deferral of attachments

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod components;
pub mod hooks;
pub mod logging;
pub mod rule;
pub mod scheduler;

pub use components::{AgentBrain, AgentRegistry, PatrolAgent};
pub use rule::{AttachOutcome, PatrolRule};
