use sea_orm_migration::{prelude::*, schema::*};

use crate::iden::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // A null target team means the announcement goes to everyone.
        let table = table_auto(Announcements::Table)
            .col(pk_uuid(Announcements::Id))
            .col(string(Announcements::Title))
            .col(text(Announcements::Content))
            .col(text_null(Announcements::Details))
            .col(uuid_null(Announcements::TargetTeamId))
            .col(string_len(Announcements::Kind, 16).default("announcement"))
            .col(uuid_null(Announcements::AuthorId))
            .col(string(Announcements::AuthorName))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_announcement_team")
                    .from(Announcements::Table, Announcements::TargetTeamId)
                    .to(Teams::Table, Teams::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_announcement_author")
                    .from(Announcements::Table, Announcements::AuthorId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .to_owned();
        manager.create_table(table).await?;

        let table = table_auto(Notifications::Table)
            .col(pk_uuid(Notifications::Id))
            .col(string_len(Notifications::Kind, 32))
            .col(uuid(Notifications::UserId))
            .col(string(Notifications::UserName))
            .col(boolean(Notifications::Read).default(false))
            .col(uuid_null(Notifications::AssignmentId))
            .col(string_null(Notifications::EventTitle))
            .col(string_null(Notifications::Dates))
            .col(string_null(Notifications::Reason))
            .to_owned();
        manager.create_table(table).await?;

        let table = table_auto(PushTokens::Table)
            .col(uuid(PushTokens::UserId).primary_key())
            .col(string(PushTokens::Token))
            .col(string_len(PushTokens::Platform, 16))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_push_token_user")
                    .from(PushTokens::Table, PushTokens::UserId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        manager.create_table(table).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notification_read")
                    .table(Notifications::Table)
                    .col(Notifications::Read)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PushTokens::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notifications::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Announcements::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
