//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Reads
//! accept any `PgExecutor` (a pool or an open transaction); writes that
//! must join a caller's transaction take `&mut PgConnection`.

pub mod catalog_repo;
pub mod deck_repo;
pub mod event_repo;
pub mod gacha_repo;
pub mod idol_repo;
pub mod inventory_repo;
pub mod ledger_repo;
pub mod present_repo;
pub mod promo_repo;
pub mod user_repo;

pub use catalog_repo::CatalogRepo;
pub use deck_repo::DeckRepo;
pub use event_repo::EventRepo;
pub use gacha_repo::GachaRepo;
pub use idol_repo::IdolRepo;
pub use inventory_repo::InventoryRepo;
pub use ledger_repo::LedgerRepo;
pub use present_repo::PresentRepo;
pub use promo_repo::PromoRepo;
pub use user_repo::UserRepo;
