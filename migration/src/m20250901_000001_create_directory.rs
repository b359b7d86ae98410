use sea_orm_migration::{prelude::*, schema::*};

use crate::iden::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = table_auto(Users::Table)
            .col(pk_uuid(Users::Id))
            .col(string(Users::Name))
            .col(string_uniq(Users::Email))
            .col(string_len(Users::Role, 16).default("volunteer"))
            .col(string_null(Users::Phone))
            .col(string(Users::PasswordHash))
            .to_owned();
        manager.create_table(table).await?;

        // One row per unavailable range instead of an embedded list on the user.
        let table = table_auto(Blockouts::Table)
            .col(pk_uuid(Blockouts::Id))
            .col(uuid(Blockouts::UserId))
            .col(date(Blockouts::StartDate))
            .col(date(Blockouts::EndDate))
            .col(string_null(Blockouts::Reason))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_blockout_user")
                    .from(Blockouts::Table, Blockouts::UserId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .check(Expr::col(Blockouts::EndDate).gte(Expr::col(Blockouts::StartDate)))
            .to_owned();
        manager.create_table(table).await?;

        let table = table_auto(Teams::Table)
            .col(pk_uuid(Teams::Id))
            .col(string(Teams::Name))
            .col(string_null(Teams::Description))
            .col(json(Teams::Positions))
            .to_owned();
        manager.create_table(table).await?;

        let table = table_auto(TeamMembers::Table)
            .col(uuid(TeamMembers::TeamId))
            .col(uuid(TeamMembers::UserId))
            .primary_key(
                Index::create()
                    .col(TeamMembers::TeamId)
                    .col(TeamMembers::UserId),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_team_member_team")
                    .from(TeamMembers::Table, TeamMembers::TeamId)
                    .to(Teams::Table, Teams::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_team_member_user")
                    .from(TeamMembers::Table, TeamMembers::UserId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        manager.create_table(table).await?;

        let table = table_auto(ServiceTypes::Table)
            .col(pk_uuid(ServiceTypes::Id))
            .col(string(ServiceTypes::Name))
            .col(string_len(ServiceTypes::Color, 9))
            .to_owned();
        manager.create_table(table).await?;

        let table = table_auto(Locations::Table)
            .col(pk_uuid(Locations::Id))
            .col(string(Locations::Name))
            .col(string_null(Locations::Address))
            .to_owned();
        manager.create_table(table).await?;

        let table = table_auto(Roles::Table)
            .col(pk_uuid(Roles::Id))
            .col(string(Roles::Name))
            .col(json(Roles::Permissions))
            .to_owned();
        manager.create_table(table).await?;

        let table = table_auto(SongTags::Table)
            .col(pk_uuid(SongTags::Id))
            .col(string(SongTags::Name))
            .col(string_len(SongTags::Color, 9))
            .to_owned();
        manager.create_table(table).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blockout_user")
                    .table(Blockouts::Table)
                    .col(Blockouts::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            SongTags::Table.into_iden(),
            Roles::Table.into_iden(),
            Locations::Table.into_iden(),
            ServiceTypes::Table.into_iden(),
            TeamMembers::Table.into_iden(),
            Teams::Table.into_iden(),
            Blockouts::Table.into_iden(),
            Users::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}
