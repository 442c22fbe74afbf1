pub mod analysis;
pub mod call;
pub mod chat;
pub mod journal;
pub mod login;
pub mod status;
pub mod user;

mod convert;
