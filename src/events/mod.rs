//! Event fan-out - in-process publish/subscribe for catalog changes.
//!
//! Mutations publish full entity snapshots; GraphQL subscriptions consume
//! them as streams. At-most-once, no persistence, no replay.

mod bus;

pub use bus::{EventBus, MovieEvent, ReviewEvent};
