pub mod auth_dto;
pub mod billing_dto;
pub mod chat_dto;
pub mod job_dto;
pub mod test_dto;
pub mod vocab_dto;
