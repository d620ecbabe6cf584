pub mod grammar;
pub mod health;
pub mod login;
pub mod profile;
