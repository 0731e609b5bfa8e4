use rocket::http::Status;
use thiserror::Error;

use crate::model::mongodb::Id;

/// Reasons a sorting request is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortingError {
    #[error("You must be signed in to be sorted")]
    Unauthenticated,
    #[error("No member found with ID {0}")]
    UserNotFound(Id),
    #[error("Member {0} has already been sorted")]
    AlreadyAssigned(Id),
    #[error("No house could be chosen from the submitted answers")]
    NoAssignmentPossible,
}

impl SortingError {
    pub fn status(&self) -> Status {
        match self {
            Self::Unauthenticated => Status::Unauthorized,
            Self::UserNotFound(_) => Status::NotFound,
            Self::AlreadyAssigned(_) => Status::Conflict,
            Self::NoAssignmentPossible => Status::UnprocessableEntity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refusals_map_to_distinct_statuses() {
        let id = Id::new();
        assert_eq!(SortingError::Unauthenticated.status(), Status::Unauthorized);
        assert_eq!(SortingError::UserNotFound(id).status(), Status::NotFound);
        assert_eq!(SortingError::AlreadyAssigned(id).status(), Status::Conflict);
        assert_eq!(
            SortingError::NoAssignmentPossible.status(),
            Status::UnprocessableEntity
        );
    }
}
