pub mod grammar;
pub mod login;
