pub mod journal;
pub mod user;
