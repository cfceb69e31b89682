//! Domain rules for the idol management game server.
//!
//! Everything in this crate is pure: no database, no HTTP, no clock reads.
//! Callers pass `now` and an `rand::Rng` explicitly so the resolvers stay
//! deterministic under test.

pub mod battle;
pub mod catalog;
pub mod deck;
pub mod error;
pub mod event;
pub mod gacha;
pub mod idol;
pub mod items;
pub mod ledger;
pub mod login_bonus;
pub mod present;
pub mod promo;
pub mod reward;
pub mod stamina;
pub mod types;
pub mod work;
