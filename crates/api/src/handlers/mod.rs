pub mod battle;
pub mod deck;
pub mod events;
pub mod gacha;
pub mod idols;
pub mod items;
pub mod login_bonus;
pub mod presents;
pub mod promo;
pub mod users;
pub mod work;
