pub mod card;
pub mod deck;
pub mod event;
pub mod user;
