//! Issuing, previewing and redeeming invite codes.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::access::{load_plan_access, require_active_user};
use super::authorization::can_issue_invite_code;
use crate::error::DomainError;
use crate::models::invite::{
    InviteCode, InviteCodeSettings, InvitePreview, IssueInviteCodeResponse, JoinPlanResponse,
};
use crate::models::membership::{join_transition, JoinOutcome, MembershipSnapshot};
use crate::store::Stores;

#[derive(Clone)]
pub struct InviteCodeService {
    stores: Stores,
    settings: InviteCodeSettings,
}

impl InviteCodeService {
    pub fn new(stores: Stores, settings: InviteCodeSettings) -> Self {
        Self { stores, settings }
    }

    pub async fn issue(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> Result<IssueInviteCodeResponse, DomainError> {
        self.issue_at(user_id, plan_id, Utc::now()).await
    }

    /// Issue a code for a plan the caller owns or belongs to.
    ///
    /// Codes are random draws from the configured alphabet; collisions are
    /// not checked.
    pub async fn issue_at(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<IssueInviteCodeResponse, DomainError> {
        require_active_user(&self.stores, user_id).await?;
        let access = load_plan_access(&self.stores, plan_id, user_id).await?;

        if !can_issue_invite_code(access.status) {
            return Err(DomainError::access_denied(
                "only plan members can issue invite codes",
            ));
        }

        let code =
            shared::invite_code::generate_code(&self.settings.alphabet, self.settings.length);
        let invite = self
            .stores
            .invite_codes
            .create_invite_code(InviteCode {
                code,
                plan_id,
                created_by: user_id,
                expires_at: now + self.settings.expiry,
                created_at: now,
            })
            .await?;

        tracing::info!(
            plan_id = %plan_id,
            user_id = %user_id,
            expires_at = %invite.expires_at,
            "Invite code issued"
        );

        Ok(IssueInviteCodeResponse {
            code: invite.code,
            plan_id: invite.plan_id,
            expires_at: invite.expires_at,
        })
    }

    pub async fn redeem(&self, user_id: Uuid, code: &str) -> Result<JoinPlanResponse, DomainError> {
        self.redeem_at(user_id, code, Utc::now()).await
    }

    /// Join the plan behind `code`.
    ///
    /// Checks run in order: code exists, code not expired, plan reachable,
    /// caller not BLOCKED. Owners and members are left as they are.
    pub async fn redeem_at(
        &self,
        user_id: Uuid,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<JoinPlanResponse, DomainError> {
        require_active_user(&self.stores, user_id).await?;

        let invite = self
            .stores
            .invite_codes
            .find_by_code(code)
            .await?
            .ok_or(DomainError::CodeNotFound)?;

        if invite.is_expired_at(now) {
            return Err(DomainError::CodeExpired);
        }

        let plan_id = invite.plan_id;
        self.stores
            .plans
            .find_plan(plan_id)
            .await?
            .filter(|p| p.is_reachable())
            .ok_or(DomainError::PlanNotFound)?;

        let current = self
            .stores
            .memberships
            .find_by_plan_and_user(plan_id, user_id)
            .await?
            .map(|m| m.status);

        let outcome = join_transition(current).map_err(|_| {
            tracing::warn!(plan_id = %plan_id, user_id = %user_id, "Blocked user tried to join");
            DomainError::access_denied("cannot join")
        })?;

        let status = match outcome {
            JoinOutcome::AlreadyJoined { current } => current,
            JoinOutcome::Insert | JoinOutcome::Rejoin { .. } => {
                let row = self.stores.memberships.upsert_member(plan_id, user_id).await?;
                tracing::info!(
                    plan_id = %plan_id,
                    user_id = %user_id,
                    previous = ?current,
                    "User joined plan via invite code"
                );
                row.status
            }
        };

        Ok(JoinPlanResponse { plan_id, status })
    }

    pub async fn preview(&self, user_id: Uuid, code: &str) -> Result<InvitePreview, DomainError> {
        self.preview_at(user_id, code, Utc::now()).await
    }

    /// Describe the plan behind `code` without joining it.
    pub async fn preview_at(
        &self,
        user_id: Uuid,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<InvitePreview, DomainError> {
        require_active_user(&self.stores, user_id).await?;

        let invite = self
            .stores
            .invite_codes
            .find_by_code(code)
            .await?
            .ok_or(DomainError::CodeNotFound)?;

        let plan = self
            .stores
            .plans
            .find_plan(invite.plan_id)
            .await?
            .filter(|p| p.is_reachable())
            .ok_or(DomainError::PlanNotFound)?;

        let snapshot =
            MembershipSnapshot::new(self.stores.memberships.list_by_plan(plan.id).await?);

        Ok(InvitePreview {
            plan_id: plan.id,
            plan_name: plan.name,
            is_public: plan.is_public,
            member_count: snapshot.current_count(),
            expires_at: invite.expires_at,
            is_valid: !invite.is_expired_at(now),
        })
    }
}
