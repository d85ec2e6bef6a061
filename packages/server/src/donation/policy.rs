use crate::identity::Identity;

use super::DonationError;

/// Kind of access requested on a single donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    /// Update, patch or delete.
    Mutate,
}

/// Which donations a listing may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    All,
    Owner(i32),
}

/// Decide whether `identity` may perform `access` on a donation owned by `owner`.
///
/// Read lets an admin through even without a user id. Mutate always requires
/// an authenticated caller.
pub fn authorize(identity: &Identity, owner: i32, access: Access) -> Result<(), DonationError> {
    match access {
        Access::Read if identity.is_admin() => Ok(()),
        Access::Read | Access::Mutate => {
            let caller = identity.user_id().ok_or(DonationError::Unauthorized)?;
            if identity.is_admin() || caller == owner {
                Ok(())
            } else {
                Err(DonationError::Forbidden)
            }
        }
    }
}

/// Admins list everything; everyone else lists their own donations.
pub fn list_scope(identity: &Identity) -> Result<ListScope, DonationError> {
    if identity.is_admin() {
        return Ok(ListScope::All);
    }
    identity
        .user_id()
        .map(ListScope::Owner)
        .ok_or(DonationError::Unauthorized)
}
