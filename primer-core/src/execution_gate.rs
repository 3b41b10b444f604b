// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Single-execution gate.
//!
//! An explicit three-state machine kept in one atomic. Every transition is a
//! compare-and-set, so among any number of racing callers exactly one wins a given
//! transition. Connection lifecycles cycle `Idle -> Entering -> Open -> Idle`;
//! one-shot computations stop at `Open`.

use std::sync::atomic::{AtomicU8, Ordering};

/// States of an [`ExecutionGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GateState {
    /// Nothing started yet, or the previous cycle has been torn down.
    Idle = 0,
    /// A caller won the gate and is performing the guarded action.
    Entering = 1,
    /// The guarded action completed and its effect is live.
    Open = 2,
}

impl GateState {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => GateState::Idle,
            1 => GateState::Entering,
            _ => GateState::Open,
        }
    }
}

/// Atomic state machine guarding an action that must run once per cycle.
///
/// # Example
///
/// ```
/// use primer_core::{ExecutionGate, GateState};
///
/// let gate = ExecutionGate::new();
///
/// assert!(gate.try_enter());
/// assert!(!gate.try_enter());
///
/// assert!(gate.try_transition(GateState::Entering, GateState::Open));
/// assert_eq!(gate.state(), GateState::Open);
/// ```
#[derive(Debug)]
pub struct ExecutionGate {
    state: AtomicU8,
}

impl ExecutionGate {
    /// Creates a gate in the `Idle` state.
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(GateState::Idle as u8),
        }
    }

    /// Moves the gate from `from` to `to` if it is currently in `from`.
    ///
    /// Returns `true` only for the caller that performed the transition.
    pub fn try_transition(&self, from: GateState, to: GateState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Claims the gate: `Idle -> Entering`.
    pub fn try_enter(&self) -> bool {
        self.try_transition(GateState::Idle, GateState::Entering)
    }

    /// Current state.
    pub fn state(&self) -> GateState {
        GateState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Returns `true` while the guarded effect is live.
    pub fn is_open(&self) -> bool {
        self.state() == GateState::Open
    }
}

impl Default for ExecutionGate {
    fn default() -> Self {
        Self::new()
    }
}
