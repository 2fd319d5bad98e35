//! # connect-n
//!
//! Connect-N on a gravity board of any size, for two or more players, with a
//! Monte Carlo move advisor that runs off the caller's thread.
//!
//! ## Modules
//!
//! - [`game`] - Board rules, players, turn/outcome state
//! - [`ai`] - Random playouts, the tiered move advisor, agents
//! - [`compute`] - Background advisor requests and their replies
//! - [`play`] - Sessions with human/computer seats, series statistics
//! - [`config`] - TOML configuration loading and validation
//! - [`error`] - Structured error types

pub mod ai;
pub mod compute;
pub mod config;
pub mod error;
pub mod game;
pub mod play;
