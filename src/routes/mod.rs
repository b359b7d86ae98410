pub mod announcements;
pub mod dashboard;
pub mod events;
pub mod lookups;
pub mod me;
pub mod notifications;
pub mod people;
pub mod schedules;
pub mod songs;
pub mod teams;

use axum::Router;

use crate::router::AppState;

/// Every JSON endpoint, to be nested under `/api`.
pub fn api() -> Router<AppState> {
    Router::new()
        .merge(me::routes())
        .merge(people::routes())
        .merge(teams::routes())
        .merge(events::routes())
        .merge(schedules::routes())
        .merge(songs::routes())
        .merge(announcements::routes())
        .merge(notifications::routes())
        .merge(lookups::routes())
}
