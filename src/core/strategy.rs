//! Forwarding strategies and the registry that owns them.
//!
//! A strategy is identified by a [`Name`] (its StrategyId). Instances are
//! installed once and live as long as the registry; there is no uninstall.

use crate::core::error::NfdError;
use crate::core::name::Name;
use std::collections::HashMap;

pub type FaceId = u64;

/// A candidate upstream for a forwarded Interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextHop {
    pub face: FaceId,
    pub cost: u64,
}

pub trait Strategy {
    fn name(&self) -> &Name;

    /// Picks the upstream faces for an Interest given the FIB next hops.
    fn select_nexthops(&self, nexthops: &[NextHop]) -> Vec<FaceId>;
}

#[derive(Default)]
pub struct StrategyRegistry {
    strategies: HashMap<Name, Box<dyn Strategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `strategy` under its own name.
    pub fn install(&mut self, strategy: Box<dyn Strategy>) -> Result<(), NfdError> {
        let id = strategy.name().clone();
        if self.strategies.contains_key(&id) {
            return Err(NfdError::DuplicateStrategy(id));
        }
        log::debug!("installed strategy {}", id);
        self.strategies.insert(id, strategy);
        Ok(())
    }

    pub fn has_strategy(&self, id: &Name) -> bool {
        self.strategies.contains_key(id)
    }

    pub fn get(&self, id: &Name) -> Result<&dyn Strategy, NfdError> {
        self.strategies
            .get(id)
            .map(|s| s.as_ref())
            .ok_or_else(|| NfdError::NotFound(format!("strategy {}", id)))
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Installed strategy ids in name order.
    pub fn names(&self) -> Vec<Name> {
        let mut names: Vec<Name> = self.strategies.keys().cloned().collect();
        names.sort();
        names
    }
}
