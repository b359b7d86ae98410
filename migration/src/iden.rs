use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub enum Users {
    Table,
    Id,
    Name,
    Email,
    Role,
    Phone,
    PasswordHash,
}

#[derive(DeriveIden)]
pub enum Blockouts {
    Table,
    Id,
    UserId,
    StartDate,
    EndDate,
    Reason,
}

#[derive(DeriveIden)]
pub enum Teams {
    Table,
    Id,
    Name,
    Description,
    Positions,
}

#[derive(DeriveIden)]
pub enum TeamMembers {
    Table,
    TeamId,
    UserId,
}

#[derive(DeriveIden)]
pub enum ServiceTypes {
    Table,
    Id,
    Name,
    Color,
}

#[derive(DeriveIden)]
pub enum Locations {
    Table,
    Id,
    Name,
    Address,
}

#[derive(DeriveIden)]
pub enum Roles {
    Table,
    Id,
    Name,
    Permissions,
}

#[derive(DeriveIden)]
pub enum SongTags {
    Table,
    Id,
    Name,
    Color,
}

#[derive(DeriveIden)]
pub enum Events {
    Table,
    Id,
    Title,
    Date,
    Description,
    LocationId,
    LocationName,
    ServiceTypeId,
    ServiceTypeName,
    Color,
    Status,
    OrderOfService,
    OosRevision,
}

#[derive(DeriveIden)]
pub enum Schedules {
    Table,
    Id,
    EventId,
    TeamId,
    UserId,
    UserName,
    Position,
    Status,
    AssignedAt,
    RespondedAt,
}

#[derive(DeriveIden)]
pub enum Songs {
    Table,
    Id,
    Title,
    Artist,
    Key,
    Lyrics,
    YoutubeUrl,
    SpotifyUrl,
    PdfUrl,
    Mp3Url,
    SearchKey,
}

#[derive(DeriveIden)]
pub enum Announcements {
    Table,
    Id,
    Title,
    Content,
    Details,
    TargetTeamId,
    Kind,
    AuthorId,
    AuthorName,
}

#[derive(DeriveIden)]
pub enum Notifications {
    Table,
    Id,
    Kind,
    UserId,
    UserName,
    Read,
    AssignmentId,
    EventTitle,
    Dates,
    Reason,
}

#[derive(DeriveIden)]
pub enum PushTokens {
    Table,
    UserId,
    Token,
    Platform,
}
