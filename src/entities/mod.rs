pub mod announcement;
pub mod blockout;
pub mod event;
pub mod location;
pub mod notification;
pub mod push_token;
pub mod role;
pub mod schedule;
pub mod sea_orm_active_enums;
pub mod service_type;
pub mod song;
pub mod song_tag;
pub mod team;
pub mod team_member;
pub mod types;
pub mod user;
