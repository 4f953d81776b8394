pub mod chat;
pub mod explorer;
pub mod geo;
