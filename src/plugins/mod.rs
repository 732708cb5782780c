//! Built-in forwarding strategies.
//!
//! Each plugin exposes `STRATEGY_NAME` and a `create` constructor; they are
//! registered in [`crate::subsystems::STRATEGIES`].

pub mod best_route;
pub mod broadcast;
