//! Volunteer scheduling for a church ministry: people and their blockouts,
//! teams, events with an order of service, assignments, a song library,
//! announcements and push notifications.

pub mod auth;
pub mod config;
pub mod database;
pub mod domain;
pub mod entities;
pub mod error;
pub mod push;
pub mod router;
pub mod routes;
pub mod services;
pub mod util;
