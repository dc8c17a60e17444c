use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::db::WriteOutcome;
use crate::entities::{contacts, job_applications, prelude::*, training_applications};

#[derive(Debug, Clone, Default)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct TrainingApplicationInput {
    pub name: String,
    pub degree: String,
    pub phone: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct JobApplicationInput {
    pub name: String,
    pub degree: String,
    pub phone: String,
    pub email: String,
    pub message: String,
    pub position: String,
}

/// Which intake table an admin operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    Contact,
    Training,
    Job,
}

impl SubmissionKind {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Contact => "Contact",
            Self::Training => "Training application",
            Self::Job => "Job application",
        }
    }
}

/// Append-only form submissions, deletable by an admin.
pub struct SubmissionRepository {
    conn: DatabaseConnection,
}

impl SubmissionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add_contact(&self, input: ContactInput) -> Result<i32> {
        let active = contacts::ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            subject: Set(input.subject),
            message: Set(input.message),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let res = Contacts::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to save contact")?;
        Ok(res.last_insert_id)
    }

    pub async fn add_training_application(&self, input: TrainingApplicationInput) -> Result<i32> {
        let active = training_applications::ActiveModel {
            name: Set(input.name),
            degree: Set(input.degree),
            phone: Set(input.phone),
            email: Set(input.email),
            message: Set(input.message),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let res = TrainingApplications::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to save training application")?;
        Ok(res.last_insert_id)
    }

    pub async fn add_job_application(&self, input: JobApplicationInput) -> Result<i32> {
        let active = job_applications::ActiveModel {
            name: Set(input.name),
            degree: Set(input.degree),
            phone: Set(input.phone),
            email: Set(input.email),
            message: Set(input.message),
            position: Set(input.position),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let res = JobApplications::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to save job application")?;
        Ok(res.last_insert_id)
    }

    pub async fn list_contacts(&self) -> Result<Vec<contacts::Model>> {
        Contacts::find()
            .order_by_desc(contacts::Column::CreatedAt)
            .order_by_desc(contacts::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list contacts")
    }

    pub async fn list_training_applications(&self) -> Result<Vec<training_applications::Model>> {
        TrainingApplications::find()
            .order_by_desc(training_applications::Column::CreatedAt)
            .order_by_desc(training_applications::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list training applications")
    }

    pub async fn list_job_applications(&self) -> Result<Vec<job_applications::Model>> {
        JobApplications::find()
            .order_by_desc(job_applications::Column::CreatedAt)
            .order_by_desc(job_applications::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list job applications")
    }

    pub async fn delete(&self, kind: SubmissionKind, id: i32) -> Result<WriteOutcome> {
        let rows = match kind {
            SubmissionKind::Contact => Contacts::delete_by_id(id).exec(&self.conn).await,
            SubmissionKind::Training => {
                TrainingApplications::delete_by_id(id)
                    .exec(&self.conn)
                    .await
            }
            SubmissionKind::Job => JobApplications::delete_by_id(id).exec(&self.conn).await,
        }
        .with_context(|| format!("Failed to delete {} {id}", kind.label()))?
        .rows_affected;

        Ok(WriteOutcome::from_rows_affected(rows))
    }
}
