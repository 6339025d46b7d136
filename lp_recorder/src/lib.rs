//! Terminal recorder for narrating live poker hands.
//!
//! The binary reads operator commands from stdin, drives a
//! [`live_poker::LiveTable`], and saves finished hands to the hand server.

pub mod commands;
pub mod config;
