pub(crate) mod account;
pub(crate) mod analysis;
pub(crate) mod chat;
pub(crate) mod dashboard;
pub(crate) mod health;
pub(crate) mod ml;
pub(crate) mod orders;
pub(crate) mod positions;
pub(crate) mod quotes;
pub(crate) mod value;
