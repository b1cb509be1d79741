//! Lifecycle management for managed nodes

use crate::error::{Result, TrajectoryError};
use std::fmt;

/// Trait for components that follow a lifecycle pattern.
///
/// Transitions take `&self` so a node can be shared with its publishing task;
/// implementors keep their state behind locks.
pub trait LifecycleNode: Send + Sync {
    /// Configure the node
    fn on_configure(&self) -> Result<()>;

    /// Activate the node
    fn on_activate(&self) -> Result<()>;

    /// Deactivate the node
    fn on_deactivate(&self) -> Result<()>;

    /// Clean up the node
    fn on_cleanup(&self) -> Result<()>;

    /// Shut the node down from any non-final state
    fn on_shutdown(&self) -> Result<()>;

    /// Current lifecycle state
    fn state(&self) -> State;
}

/// Base implementation for lifecycle nodes
#[derive(Debug)]
pub struct LifecycleNodeBase {
    pub name: String,
    state: State,
}

/// State of a lifecycle node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Unconfigured,
    Inactive,
    Active,
    Finalized,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Unconfigured => "unconfigured",
            State::Inactive => "inactive",
            State::Active => "active",
            State::Finalized => "finalized",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle transition request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Configure,
    Activate,
    Deactivate,
    Cleanup,
    Shutdown,
}

impl Transition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Configure => "configure",
            Transition::Activate => "activate",
            Transition::Deactivate => "deactivate",
            Transition::Cleanup => "cleanup",
            Transition::Shutdown => "shutdown",
        }
    }

    /// State reached by taking this transition from `from`, if it is legal
    pub fn target(&self, from: State) -> Option<State> {
        match (self, from) {
            (Transition::Configure, State::Unconfigured) => Some(State::Inactive),
            (Transition::Activate, State::Inactive) => Some(State::Active),
            (Transition::Deactivate, State::Active) => Some(State::Inactive),
            (Transition::Cleanup, State::Inactive) => Some(State::Unconfigured),
            (Transition::Shutdown, State::Finalized) => None,
            (Transition::Shutdown, _) => Some(State::Finalized),
            _ => None,
        }
    }
}

impl LifecycleNodeBase {
    /// Create a new lifecycle node base
    pub fn new(name: &str) -> Self {
        LifecycleNodeBase {
            name: name.to_string(),
            state: State::Unconfigured,
        }
    }

    /// Get the current state
    pub fn get_state(&self) -> State {
        self.state
    }

    /// Fail unless `transition` is legal from the current state
    pub fn check(&self, transition: Transition) -> Result<State> {
        transition
            .target(self.state)
            .ok_or(TrajectoryError::InvalidTransition {
                from: self.state.as_str(),
                transition: transition.as_str(),
            })
    }

    /// Take `transition`, returning the new state
    pub fn transition(&mut self, transition: Transition) -> Result<State> {
        let next = self.check(transition)?;
        self.state = next;
        Ok(next)
    }
}
