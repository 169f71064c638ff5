pub mod job;
pub mod message;
pub mod question;
pub mod result;
pub mod user;
pub mod vocabulary;
