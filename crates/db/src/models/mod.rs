//! Database row structs and DTOs.
//!
//! Row structs derive `FromRow` and serialize in camelCase for the HTTP
//! layer. Rows that mirror catalog entities convert into the core types.

pub mod catalog;
pub mod deck;
pub mod event;
pub mod gacha;
pub mod idol;
pub mod present;
pub mod promo;
pub mod user;
