use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Public blog listing filters on published and sorts newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_blog_posts_published_created_at")
                    .table(BlogPosts::Table)
                    .col(BlogPosts::Published)
                    .col(BlogPosts::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        for (name, table) in [
            ("idx_contacts_created_at", Submissions::Contacts),
            (
                "idx_training_applications_created_at",
                Submissions::TrainingApplications,
            ),
            ("idx_job_applications_created_at", Submissions::JobApplications),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(table)
                        .col(Submissions::CreatedAt)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table) in [
            ("idx_blog_posts_published_created_at", Alias::new("blog_posts")),
            ("idx_contacts_created_at", Alias::new("contacts")),
            (
                "idx_training_applications_created_at",
                Alias::new("training_applications"),
            ),
            (
                "idx_job_applications_created_at",
                Alias::new("job_applications"),
            ),
        ] {
            manager
                .drop_index(Index::drop().name(name).table(table).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(Iden)]
enum BlogPosts {
    Table,
    Published,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
enum Submissions {
    Contacts,
    TrainingApplications,
    JobApplications,
    CreatedAt,
}
