use serde::Deserialize;

use crate::entities::sea_orm_active_enums::AssignmentStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    Confirm,
    Decline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("assignment was already answered ({0:?})")]
pub struct AlreadyAnswered(pub AssignmentStatus);

impl Response {
    pub fn target(self) -> AssignmentStatus {
        match self {
            Response::Confirm => AssignmentStatus::Confirmed,
            Response::Decline => AssignmentStatus::Declined,
        }
    }
}

/// Only a pending assignment can be answered; both answers are final.
pub fn respond(
    current: AssignmentStatus,
    response: Response,
) -> Result<AssignmentStatus, AlreadyAnswered> {
    match current {
        AssignmentStatus::Pending => Ok(response.target()),
        answered => Err(AlreadyAnswered(answered)),
    }
}
