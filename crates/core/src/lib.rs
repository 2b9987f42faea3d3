//! Concierge
//!
//! Hotel services catalogs and the room-service cart: restaurants, rooms,
//! spa services and the in-room dining menu, plus a persisted cart that
//! notifies subscribers whenever it changes.

pub mod cart;
pub mod catalog;
pub mod fixtures;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod storage;
