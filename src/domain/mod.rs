//! Pure scheduling rules. Nothing in here touches the database.

pub mod assignment;
pub mod availability;
pub mod events_window;
pub mod order_of_service;
pub mod search;
pub mod validation;
