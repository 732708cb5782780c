//! Best-route strategy: forward to the lowest-cost next hop.

use crate::core::name::Name;
use crate::core::strategy::{FaceId, NextHop, Strategy};

pub const STRATEGY_NAME: &str = "/localhost/nfd/strategy/best-route";

pub struct BestRouteStrategy {
    name: Name,
}

impl BestRouteStrategy {
    pub fn new(name: Name) -> Self {
        Self { name }
    }
}

pub fn create(name: Name) -> Box<dyn Strategy> {
    Box::new(BestRouteStrategy::new(name))
}

impl Strategy for BestRouteStrategy {
    fn name(&self) -> &Name {
        &self.name
    }

    fn select_nexthops(&self, nexthops: &[NextHop]) -> Vec<FaceId> {
        // Ties go to the first listed next hop.
        nexthops
            .iter()
            .fold(None::<&NextHop>, |best, hop| match best {
                Some(b) if b.cost <= hop.cost => Some(b),
                _ => Some(hop),
            })
            .map(|hop| vec![hop.face])
            .unwrap_or_default()
    }
}
