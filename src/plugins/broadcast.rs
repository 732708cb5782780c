//! Broadcast strategy: forward to every next hop.

use crate::core::name::Name;
use crate::core::strategy::{FaceId, NextHop, Strategy};

pub const STRATEGY_NAME: &str = "/localhost/nfd/strategy/broadcast";

pub struct BroadcastStrategy {
    name: Name,
}

pub fn create(name: Name) -> Box<dyn Strategy> {
    Box::new(BroadcastStrategy { name })
}

impl Strategy for BroadcastStrategy {
    fn name(&self) -> &Name {
        &self.name
    }

    fn select_nexthops(&self, nexthops: &[NextHop]) -> Vec<FaceId> {
        nexthops.iter().map(|hop| hop.face).collect()
    }
}
