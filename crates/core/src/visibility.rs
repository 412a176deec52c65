//! Listing visibility policy.
//!
//! Computes which slice of the `businesses` table a requester may see
//! *before* any query runs. The query engine receives the resulting
//! [`VisibilityScope`] and never post-filters: rows outside the scope are
//! never fetched, so moderation state cannot leak through timing or error
//! side channels.

use crate::moderation::ListingStatus;
use crate::roles::ROLE_ADMIN;
use crate::types::DbId;

/// The authenticated principal a request is attributed to.
#[derive(Debug, Clone)]
pub struct Requester {
    pub user_id: DbId,
    pub role: String,
}

impl Requester {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Query flags a client may set on the listing endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeFlags {
    /// "Show all" — honored only for administrators.
    pub show_all: bool,
    /// "Mine" — restrict to the requester's own listings.
    pub mine: bool,
}

/// The (status filter, owner filter) pair applied to every listing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityScope {
    /// `None` means all moderation states are visible.
    pub status: Option<ListingStatus>,
    /// `None` means listings of all owners are visible.
    pub owner: Option<DbId>,
}

/// Compute the visibility scope for a requester, rules evaluated in order:
///
/// 1. anonymous -> approved listings only;
/// 2. admin with the show-all flag -> everything;
/// 3. the mine flag -> the requester's own listings, any status;
/// 4. otherwise -> approved listings only.
pub fn scope(requester: Option<&Requester>, flags: ScopeFlags) -> VisibilityScope {
    let approved_only = VisibilityScope {
        status: Some(ListingStatus::Approved),
        owner: None,
    };

    let Some(requester) = requester else {
        return approved_only;
    };

    if requester.is_admin() && flags.show_all {
        return VisibilityScope {
            status: None,
            owner: None,
        };
    }

    if flags.mine {
        return VisibilityScope {
            status: None,
            owner: Some(requester.user_id),
        };
    }

    approved_only
}
