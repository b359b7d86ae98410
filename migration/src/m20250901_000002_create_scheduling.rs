use sea_orm_migration::{prelude::*, schema::*};

use crate::iden::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = table_auto(Events::Table)
            .col(pk_uuid(Events::Id))
            .col(string(Events::Title))
            .col(timestamp_with_time_zone(Events::Date))
            .col(text_null(Events::Description))
            .col(uuid_null(Events::LocationId))
            .col(string_null(Events::LocationName))
            .col(uuid_null(Events::ServiceTypeId))
            .col(string_null(Events::ServiceTypeName))
            .col(string_len(Events::Color, 9))
            .col(string_len(Events::Status, 16).default("draft"))
            .col(json(Events::OrderOfService))
            .col(integer(Events::OosRevision).default(0))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_event_location")
                    .from(Events::Table, Events::LocationId)
                    .to(Locations::Table, Locations::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_event_service_type")
                    .from(Events::Table, Events::ServiceTypeId)
                    .to(ServiceTypes::Table, ServiceTypes::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .to_owned();
        manager.create_table(table).await?;

        let table = table_auto(Schedules::Table)
            .col(pk_uuid(Schedules::Id))
            .col(uuid(Schedules::EventId))
            .col(uuid(Schedules::TeamId))
            .col(uuid(Schedules::UserId))
            .col(string(Schedules::UserName))
            .col(string(Schedules::Position))
            .col(string_len(Schedules::Status, 16).default("pending"))
            .col(timestamp_with_time_zone(Schedules::AssignedAt))
            .col(timestamp_with_time_zone_null(Schedules::RespondedAt))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_schedule_event")
                    .from(Schedules::Table, Schedules::EventId)
                    .to(Events::Table, Events::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_schedule_team")
                    .from(Schedules::Table, Schedules::TeamId)
                    .to(Teams::Table, Teams::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_schedule_user")
                    .from(Schedules::Table, Schedules::UserId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        manager.create_table(table).await?;

        let table = table_auto(Songs::Table)
            .col(pk_uuid(Songs::Id))
            .col(string(Songs::Title))
            .col(string_null(Songs::Artist))
            .col(string_null(Songs::Key))
            .col(text_null(Songs::Lyrics))
            .col(string_null(Songs::YoutubeUrl))
            .col(string_null(Songs::SpotifyUrl))
            .col(string_null(Songs::PdfUrl))
            .col(string_null(Songs::Mp3Url))
            .col(string(Songs::SearchKey))
            .to_owned();
        manager.create_table(table).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_date")
                    .table(Events::Table)
                    .col(Events::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedule_event")
                    .table(Schedules::Table)
                    .col(Schedules::EventId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedule_user")
                    .table(Schedules::Table)
                    .col(Schedules::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_song_title")
                    .table(Songs::Table)
                    .col(Songs::Title)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Songs::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Schedules::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
