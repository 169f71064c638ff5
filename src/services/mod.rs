pub mod billing_service;
pub mod chat_service;
pub mod job_service;
pub mod legacy_tests;
pub mod report_service;
pub mod result_service;
pub mod scoring_service;
pub mod test_repository;
pub mod user_service;
pub mod vocabulary_service;
