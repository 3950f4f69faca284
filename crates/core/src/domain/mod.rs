pub mod chat;
pub mod intent;
pub mod user;
