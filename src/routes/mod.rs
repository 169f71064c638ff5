pub mod auth;
pub mod billing;
pub mod chat;
pub mod health;
pub mod jobs;
pub mod results;
pub mod vocabulary;
