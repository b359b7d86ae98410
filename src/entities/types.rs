use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

use crate::domain::order_of_service::ServiceItem;

/// A list of strings stored in a single JSON column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct StringList(pub Vec<String>);

/// The ordered agenda of an event, stored as one JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct OrderOfService(pub Vec<ServiceItem>);
