use chrono::Utc;
use log::{info, warn};

use crate::error::{Result, SortingError};
use crate::model::{api::sorting::Selection, common::House};

use super::{
    score::{score_selections, winner},
    store::{CatalogStore, SessionProvider, UserStore},
};

/// Sorts members into houses, once each.
pub struct SortingHat<U, C> {
    users: U,
    catalog: C,
}

impl<U, C> SortingHat<U, C>
where
    U: UserStore,
    C: CatalogStore,
{
    pub fn new(users: U, catalog: C) -> Self {
        Self { users, catalog }
    }

    /// Score the session member's selections and record the winning house.
    ///
    /// Fails without touching any record if there is no signed-in member, the member does not
    /// exist, or they have already been sorted.
    pub async fn assign<S>(&self, session: &S, selections: &[Selection]) -> Result<House>
    where
        S: SessionProvider + ?Sized,
    {
        let id = session.user_id().ok_or(SortingError::Unauthenticated)?;

        let member = self
            .users
            .find_member(id)
            .await?
            .ok_or(SortingError::UserNotFound(id))?;
        if member.sorted {
            return Err(SortingError::AlreadyAssigned(id).into());
        }

        let answers = self.catalog.answers().await?;
        let tally = score_selections(&answers, selections);
        let house = winner(&House::ALL, &tally).ok_or(SortingError::NoAssignmentPossible)?;

        if !self
            .users
            .assign_house_if_unsorted(id, house, Utc::now())
            .await?
        {
            // Lost a race with another submission, or the member vanished meanwhile.
            warn!("Member {id} was sorted or removed while scoring");
            return Err(match self.users.find_member(id).await? {
                Some(_) => SortingError::AlreadyAssigned(id),
                None => SortingError::UserNotFound(id),
            }
            .into());
        }

        info!("Sorted member {id} into {house}");
        Ok(house)
    }
}
