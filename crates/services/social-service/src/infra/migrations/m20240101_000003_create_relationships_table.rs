//! Migration: Create relationships (follow edges) table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Relationships::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Relationships::FollowerId).uuid().not_null())
                    .col(ColumnDef::new(Relationships::FollowedId).uuid().not_null())
                    .col(
                        ColumnDef::new(Relationships::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(Relationships::FollowerId)
                            .col(Relationships::FollowedId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_relationships_follower_id")
                            .from(Relationships::Table, Relationships::FollowerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_relationships_followed_id")
                            .from(Relationships::Table, Relationships::FollowedId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The primary key covers lookups by follower; followers() needs this one
        manager
            .create_index(
                Index::create()
                    .name("idx_relationships_followed_id")
                    .table(Relationships::Table)
                    .col(Relationships::FollowedId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Relationships::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Relationships {
    Table,
    FollowerId,
    FollowedId,
    CreatedAt,
}
