//! Per-agent state: strategy, bounded memory, round payoff and stranger partners.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Pure strategy of the cooperation game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Contributes to mutual payoff
    Cooperate,
    /// Collects the temptation payoff against cooperators
    Defect,
}

impl Strategy {
    /// Uniform draw over both strategies
    pub fn random<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_range(0..2) == 0 {
            Strategy::Cooperate
        } else {
            Strategy::Defect
        }
    }

    /// Check for cooperation
    pub fn is_cooperate(self) -> bool {
        self == Strategy::Cooperate
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Cooperate => write!(f, "C"),
            Strategy::Defect => write!(f, "D"),
        }
    }
}

/// Bounded FIFO of an agent's own past strategies.
///
/// Appending to a full memory evicts the oldest entry. The length only
/// grows by [`Memory::push`].
#[derive(Debug, Clone)]
pub struct Memory {
    entries: VecDeque<Strategy>,
    capacity: usize,
}

impl Memory {
    /// Empty memory holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append, evicting the oldest entry when at capacity
    pub fn push(&mut self, strategy: Strategy) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(strategy);
    }

    /// Current number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check for no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries (M)
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check whether the window is complete
    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.entries.len() == self.capacity
    }

    /// Count of `Cooperate` entries, recomputed from the contents
    pub fn cooperations(&self) -> usize {
        self.entries.iter().filter(|s| s.is_cooperate()).count()
    }

    /// Oldest-first iterator
    pub fn iter(&self) -> impl Iterator<Item = Strategy> + '_ {
        self.entries.iter().copied()
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// One node's mutable game state
#[derive(Debug, Clone)]
pub struct Agent {
    /// Current round's choice
    pub strategy: Strategy,
    /// Strategy frozen at round start; the value other agents imitate
    pub previous_strategy: Strategy,
    /// Round payoff, reset at round start
    pub payoff: f64,
    memory: Memory,
    cooperation_count: usize,
    /// Nodes engaged as strangers this round; only the payoff engine fills it,
    /// so every entry is a valid agent index
    pub(crate) strangers: Vec<usize>,
}

impl Agent {
    /// Fresh agent with empty memory
    pub fn new(strategy: Strategy, memory_length: usize) -> Self {
        Self {
            strategy,
            previous_strategy: strategy,
            payoff: 0.0,
            memory: Memory::new(memory_length),
            cooperation_count: 0,
            strangers: Vec::new(),
        }
    }

    /// Reset to `strategy` with empty memory and no strangers
    pub fn reset(&mut self, strategy: Strategy) {
        self.strategy = strategy;
        self.previous_strategy = strategy;
        self.payoff = 0.0;
        self.memory.clear();
        self.cooperation_count = 0;
        self.strangers.clear();
    }

    /// Round-start bookkeeping.
    ///
    /// Zeroes the payoff, freezes the previous strategy, records the current
    /// strategy in memory and recomputes the cooperation count from scratch.
    pub fn begin_round(&mut self) {
        self.payoff = 0.0;
        self.previous_strategy = self.strategy;
        self.memory.push(self.strategy);
        self.refresh_cooperation_count();
    }

    /// Recompute the cached cooperation count from memory contents
    pub fn refresh_cooperation_count(&mut self) {
        self.cooperation_count = self.memory.cooperations();
    }

    /// Cached count of cooperative rounds in memory
    pub fn cooperation_count(&self) -> usize {
        self.cooperation_count
    }

    /// Nodes engaged as strangers this round (duplicates and self allowed)
    pub fn strangers(&self) -> &[usize] {
        &self.strangers
    }

    /// Strategy history
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Fraction of the memory window spent cooperating (`count / M`)
    pub fn cooperation_ratio(&self) -> f64 {
        self.cooperation_count as f64 / self.memory.capacity() as f64
    }

    /// Full memory and a cooperation ratio strictly below `threshold`
    pub fn is_dissatisfied(&self, threshold: f64) -> bool {
        self.memory.is_full() && self.cooperation_ratio() < threshold
    }
}
