pub(crate) mod ai;
pub(crate) mod auth;
pub(crate) mod call;
pub(crate) mod chat;
pub(crate) mod journal;
pub(crate) mod status;
pub(crate) mod swagger;
