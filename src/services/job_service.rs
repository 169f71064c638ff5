use crate::dto::job_dto::JobPayload;
use crate::models::job::Job;
use crate::store::{document_store, next_id, Document, DocumentStore};
use chrono::Utc;

impl Document for Job {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct JobService {
    store: DocumentStore,
}

impl JobService {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub async fn all(&self) -> Vec<Job> {
        self.store.load(document_store::JOBS, Vec::new()).await
    }

    pub async fn active(&self) -> Vec<Job> {
        self.all().await.into_iter().filter(|j| j.is_active).collect()
    }

    pub async fn get(&self, job_id: i64) -> Option<Job> {
        self.all().await.into_iter().find(|j| j.id == job_id)
    }

    pub async fn create(&self, payload: JobPayload) -> Option<i64> {
        let mut jobs = self.all().await;
        let job_id = next_id(&jobs);
        jobs.push(Job {
            id: job_id,
            title: payload.title,
            company: payload.company,
            location: payload.location,
            job_type: payload.job_type,
            salary_range: payload.salary_range.unwrap_or_default(),
            description: payload.description,
            requirements: payload.requirements.unwrap_or_default(),
            contact_email: payload.contact_email,
            posted_date: Utc::now().format("%Y-%m-%d").to_string(),
            is_active: payload.is_active.unwrap_or(true),
        });
        if self.store.save(document_store::JOBS, &jobs).await {
            Some(job_id)
        } else {
            None
        }
    }

    pub async fn update(&self, job_id: i64, payload: JobPayload) -> bool {
        let mut jobs = self.all().await;
        let Some(job) = jobs.iter_mut().find(|j| j.id == job_id) else {
            return false;
        };
        job.title = payload.title;
        job.company = payload.company;
        job.location = payload.location;
        job.job_type = payload.job_type;
        job.salary_range = payload.salary_range.unwrap_or_default();
        job.description = payload.description;
        job.requirements = payload.requirements.unwrap_or_default();
        job.contact_email = payload.contact_email;
        job.is_active = payload.is_active.unwrap_or(true);
        self.store.save(document_store::JOBS, &jobs).await
    }

    pub async fn delete(&self, job_id: i64) -> bool {
        let mut jobs = self.all().await;
        let before = jobs.len();
        jobs.retain(|j| j.id != job_id);
        if jobs.len() == before {
            return false;
        }
        self.store.save(document_store::JOBS, &jobs).await
    }
}
