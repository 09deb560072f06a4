//! Outbound delivery channels for dispatched effects.
//!
//! Email is the only external channel; in-app notifications are plain
//! database rows written by the dispatcher itself.

pub mod email;
