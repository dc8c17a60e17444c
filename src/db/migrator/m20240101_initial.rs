use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{EntityTrait, Schema};

#[derive(DeriveMigrationName)]
pub struct Migration;

async fn create_from_entity<E: EntityTrait>(
    manager: &SchemaManager<'_>,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr> {
    manager
        .create_table(
            schema
                .create_table_from_entity(entity)
                .if_not_exists()
                .to_owned(),
        )
        .await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        create_from_entity(manager, &schema, Users).await?;
        create_from_entity(manager, &schema, Content).await?;
        create_from_entity(manager, &schema, Contacts).await?;
        create_from_entity(manager, &schema, TrainingApplications).await?;
        create_from_entity(manager, &schema, JobApplications).await?;
        create_from_entity(manager, &schema, BlogPosts).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            "blog_posts",
            "job_applications",
            "training_applications",
            "contacts",
            "content",
            "users",
        ] {
            manager
                .drop_table(Table::drop().table(Alias::new(table)).to_owned())
                .await?;
        }

        Ok(())
    }
}
