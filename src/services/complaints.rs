// src/services/complaints.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{error::AppError, models::complaint::Complaint, repository::ComplaintRepository};

/// Complaints about comments. Merging repeated complaints of one user is
/// left to storage, which appends in a single statement.
#[derive(Clone)]
pub struct ComplaintService {
    repo: Arc<dyn ComplaintRepository>,
}

impl ComplaintService {
    pub fn new(repo: Arc<dyn ComplaintRepository>) -> Self {
        Self { repo }
    }

    pub async fn add_complaint(
        &self,
        comment_id: Uuid,
        user_id: Uuid,
        message: String,
    ) -> Result<(), AppError> {
        let complaint = Complaint {
            id: Uuid::new_v4(),
            comment_id,
            user_id,
            message,
        };
        self.repo.add_complaint(&complaint).await?;
        tracing::info!(%comment_id, %user_id, "complaint recorded");
        Ok(())
    }

    pub async fn delete_complaint(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.delete_complaint(id).await
    }

    pub async fn list_complaints(&self, comment_id: Uuid) -> Result<Vec<Complaint>, AppError> {
        self.repo.find_complaints_by_comment(comment_id).await
    }

    pub async fn count_complaints(&self, comment_id: Uuid) -> Result<i64, AppError> {
        self.repo.count_complaints(comment_id).await
    }
}
