//! Authorization rules for plans and routes.
//!
//! Every rule is a pure function of the caller's membership status (`None`
//! when the caller has no row) and, where it matters, the plan's visibility.

use crate::models::membership::MembershipStatus;

/// True for OWNER and MEMBER.
pub fn is_owner_or_member(status: Option<MembershipStatus>) -> bool {
    status.is_some_and(|s| s.is_current())
}

/// True when the plan is public and the caller is not BLOCKED.
///
/// Non-members, withdrawn and kicked users all qualify.
pub fn has_public_route_permission(is_public: bool, status: Option<MembershipStatus>) -> bool {
    is_public && status != Some(MembershipStatus::Blocked)
}

/// Read access to plan detail.
pub fn can_read_plan(is_public: bool, status: Option<MembershipStatus>) -> bool {
    if is_public {
        status != Some(MembershipStatus::Blocked)
    } else {
        is_owner_or_member(status)
    }
}

/// Rename, change visibility or delete a plan.
pub fn can_manage_plan(status: Option<MembershipStatus>) -> bool {
    status == Some(MembershipStatus::Owner)
}

pub fn can_issue_invite_code(status: Option<MembershipStatus>) -> bool {
    is_owner_or_member(status)
}

pub fn can_kick_members(status: Option<MembershipStatus>) -> bool {
    status == Some(MembershipStatus::Owner)
}

/// Create, update or delete routes and route-places, whatever the visibility.
pub fn can_write_routes(status: Option<MembershipStatus>) -> bool {
    is_owner_or_member(status)
}

/// List routes of a plan or places of a route.
pub fn can_read_routes(is_public: bool, status: Option<MembershipStatus>) -> bool {
    if is_public {
        has_public_route_permission(is_public, status)
    } else {
        is_owner_or_member(status)
    }
}
