pub mod clerk;
pub mod health;
