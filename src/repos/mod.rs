pub mod error;
pub mod grammar_repo;
