//! Core modules of the strategy-choice control plane.
//!
//! Wire codec and names at the bottom, the strategy table in the middle,
//! and the signed management protocol on top.

pub mod config;
pub mod control;
pub mod error;
pub mod face;
pub mod forwarder;
pub mod manager;
pub mod name;
pub mod name_tree;
pub mod packet;
pub mod scheduler;
pub mod security;
pub mod strategy;
pub mod strategy_choice;
pub mod time;
pub mod tlv;
pub mod validator;
