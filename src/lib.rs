pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

use crate::services::{
    billing_service::BillingService, chat_service::ChatService, job_service::JobService,
    report_service::ReportService, result_service::ResultService, scoring_service::ScoringService,
    test_repository::TestRepository, user_service::UserService,
    vocabulary_service::VocabularyService,
};
use crate::store::DocumentStore;
use reqwest::Client;

#[derive(Clone)]
pub struct AppState {
    pub store: DocumentStore,
    pub test_repository: TestRepository,
    pub scoring_service: ScoringService,
    pub result_service: ResultService,
    pub report_service: ReportService,
    pub user_service: UserService,
    pub vocabulary_service: VocabularyService,
    pub job_service: JobService,
    pub chat_service: ChatService,
    pub billing_service: BillingService,
}

impl AppState {
    pub fn new() -> Self {
        let config = crate::config::get_config();
        Self::with_dirs(&config.data_dir, &config.reports_dir)
    }

    /// Build the full service graph over one data directory. Tests point
    /// this at a temp dir.
    pub fn with_dirs(data_dir: &str, reports_dir: &str) -> Self {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        let store = DocumentStore::new(data_dir);
        let test_repository = TestRepository::new(data_dir, store.clone());
        let scoring_service = ScoringService::new(test_repository.content.clone());
        let result_service = ResultService::new(store.clone(), test_repository.clone());
        let report_service = ReportService::new(reports_dir);
        let user_service = UserService::new(store.clone());
        let vocabulary_service = VocabularyService::new(store.clone());
        let job_service = JobService::new(store.clone());
        let chat_service = ChatService::new(store.clone());
        let billing_service = BillingService::new(
            config.stripe_secret_key.clone(),
            config.stripe_webhook_secret.clone(),
            http_client,
        );

        Self {
            store,
            test_repository,
            scoring_service,
            result_service,
            report_service,
            user_service,
            vocabulary_service,
            job_service,
            chat_service,
            billing_service,
        }
    }
}
