//! Plan lifecycle and membership management.

use std::collections::HashMap;
use uuid::Uuid;

use super::access::{collapse_batch, load_plan_access, require_active_user, PlanAccess};
use super::authorization::{can_kick_members, can_manage_plan, can_read_plan};
use crate::error::DomainError;
use crate::models::membership::{
    kick_transition, withdraw_transition, Membership, MembershipStatus, TransitionError,
};
use crate::models::plan::{
    CreatePlanRequest, CreatePlanResponse, KickMembersResponse, ListPlansResponse, NewPlan,
    PlanDetail, PlanMemberInfo, PlanSummary, UpdatePlanRequest, WithdrawPlansResponse,
};
use crate::store::Stores;

#[derive(Clone)]
pub struct PlanService {
    stores: Stores,
}

impl PlanService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Create a plan owned by the caller.
    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreatePlanRequest,
    ) -> Result<CreatePlanResponse, DomainError> {
        require_active_user(&self.stores, user_id).await?;
        shared::validation::validate_date_range(request.start_date, request.end_date)
            .map_err(|_| DomainError::invalid_operation("start date must not be after end date"))?;

        let plan = self
            .stores
            .plans
            .create_plan(NewPlan {
                name: request.name.trim().to_string(),
                is_public: request.is_public,
                start_date: request.start_date,
                end_date: request.end_date,
                owner_id: user_id,
            })
            .await?;

        tracing::info!(plan_id = %plan.id, user_id = %user_id, "Plan created");

        Ok(CreatePlanResponse {
            id: plan.id,
            name: plan.name,
            is_public: plan.is_public,
            start_date: plan.start_date,
            end_date: plan.end_date,
            created_at: plan.created_at,
            your_status: MembershipStatus::Owner,
        })
    }

    /// Live plans where the caller is OWNER or MEMBER, newest membership first.
    pub async fn list(&self, user_id: Uuid) -> Result<ListPlansResponse, DomainError> {
        require_active_user(&self.stores, user_id).await?;

        let memberships: Vec<Membership> = self
            .stores
            .memberships
            .list_by_user(user_id)
            .await?
            .into_iter()
            .filter(|m| m.status.is_current())
            .collect();
        let plan_ids: Vec<Uuid> = memberships.iter().map(|m| m.plan_id).collect();
        let plans: HashMap<Uuid, _> = self
            .stores
            .plans
            .find_plans(&plan_ids)
            .await?
            .into_iter()
            .filter(|p| p.is_reachable())
            .map(|p| (p.id, p))
            .collect();

        let data: Vec<PlanSummary> = memberships
            .into_iter()
            .filter_map(|m| {
                plans.get(&m.plan_id).map(|plan| PlanSummary {
                    id: plan.id,
                    name: plan.name.clone(),
                    is_public: plan.is_public,
                    start_date: plan.start_date,
                    end_date: plan.end_date,
                    your_status: m.status,
                    joined_at: m.joined_at,
                })
            })
            .collect();
        let count = data.len();

        Ok(ListPlansResponse { data, count })
    }

    pub async fn detail(&self, user_id: Uuid, plan_id: Uuid) -> Result<PlanDetail, DomainError> {
        require_active_user(&self.stores, user_id).await?;
        let access = load_plan_access(&self.stores, plan_id, user_id).await?;

        if !can_read_plan(access.plan.is_public, access.status) {
            return Err(DomainError::access_denied("no permission to view this plan"));
        }

        self.project_detail(access).await
    }

    /// Rename a plan or change its visibility. Owner only.
    pub async fn update(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        request: UpdatePlanRequest,
    ) -> Result<PlanDetail, DomainError> {
        require_active_user(&self.stores, user_id).await?;
        let mut access = load_plan_access(&self.stores, plan_id, user_id).await?;

        if !can_manage_plan(access.status) {
            return Err(DomainError::access_denied("only the owner can update the plan"));
        }

        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| *name != access.plan.name);
        let is_public = request
            .is_public
            .filter(|is_public| *is_public != access.plan.is_public);

        if name.is_some() || is_public.is_some() {
            access.plan = self
                .stores
                .plans
                .update_plan(plan_id, name, is_public)
                .await?;
            tracing::info!(plan_id = %plan_id, user_id = %user_id, "Plan updated");
        }

        self.project_detail(access).await
    }

    /// Soft delete a plan. Owner only.
    pub async fn delete(&self, user_id: Uuid, plan_id: Uuid) -> Result<(), DomainError> {
        require_active_user(&self.stores, user_id).await?;
        let access = load_plan_access(&self.stores, plan_id, user_id).await?;

        if !can_manage_plan(access.status) {
            return Err(DomainError::access_denied("only the owner can delete the plan"));
        }

        if self.stores.plans.soft_delete_plan(plan_id).await? == 0 {
            return Err(DomainError::PlanNotFound);
        }

        tracing::info!(plan_id = %plan_id, user_id = %user_id, "Plan deleted");
        Ok(())
    }

    /// Move members of a plan to KICKED. All targets or none.
    pub async fn kick(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<KickMembersResponse, DomainError> {
        require_active_user(&self.stores, user_id).await?;
        let targets = collapse_batch(user_ids, "members")?;

        if targets.contains(&user_id) {
            return Err(DomainError::invalid_operation("cannot remove yourself"));
        }

        let access = load_plan_access(&self.stores, plan_id, user_id).await?;
        if !can_kick_members(access.status) {
            return Err(DomainError::access_denied("only the owner can remove members"));
        }

        for target in &targets {
            kick_transition(access.snapshot.status_of(*target))
                .map_err(|_| DomainError::MemberNotFound)?;
        }

        let pairs: Vec<(Uuid, Uuid)> = targets.iter().map(|t| (plan_id, *t)).collect();
        let changed = self
            .stores
            .memberships
            .transition_all(&pairs, MembershipStatus::Member, MembershipStatus::Kicked)
            .await?;
        if changed != pairs.len() as u64 {
            return Err(DomainError::MemberNotFound);
        }

        tracing::info!(
            plan_id = %plan_id,
            user_id = %user_id,
            kicked = targets.len(),
            "Members kicked from plan"
        );

        Ok(KickMembersResponse {
            plan_id,
            kicked: targets,
        })
    }

    /// Leave several plans at once. All plans or none.
    pub async fn withdraw(
        &self,
        user_id: Uuid,
        plan_ids: &[Uuid],
    ) -> Result<WithdrawPlansResponse, DomainError> {
        require_active_user(&self.stores, user_id).await?;
        let plan_ids = collapse_batch(plan_ids, "plans")?;

        let plans = self.stores.plans.find_plans(&plan_ids).await?;
        let mut statuses = Vec::with_capacity(plan_ids.len());
        for plan_id in &plan_ids {
            let reachable = plans.iter().any(|p| p.id == *plan_id && p.is_reachable());
            let status = if reachable {
                self.stores
                    .memberships
                    .find_by_plan_and_user(*plan_id, user_id)
                    .await?
                    .map(|m| m.status)
            } else {
                None
            };
            statuses.push((reachable, status));
        }

        // Owning any listed plan outranks every other failure of the batch.
        let results: Vec<_> = statuses
            .iter()
            .map(|(reachable, status)| (*reachable, withdraw_transition(*status)))
            .collect();
        if results
            .iter()
            .any(|(_, r)| *r == Err(TransitionError::OwnerCannotWithdraw))
        {
            return Err(DomainError::invalid_operation(
                "cannot withdraw while owning a plan",
            ));
        }
        if results.iter().any(|(reachable, r)| !reachable || r.is_err()) {
            return Err(DomainError::PlanNotFound);
        }

        let pairs: Vec<(Uuid, Uuid)> = plan_ids.iter().map(|p| (*p, user_id)).collect();
        let changed = self
            .stores
            .memberships
            .transition_all(&pairs, MembershipStatus::Member, MembershipStatus::Withdrawn)
            .await?;
        if changed != pairs.len() as u64 {
            return Err(DomainError::PlanNotFound);
        }

        tracing::info!(user_id = %user_id, plans = plan_ids.len(), "Withdrew from plans");

        Ok(WithdrawPlansResponse {
            withdrawn: plan_ids,
        })
    }

    async fn project_detail(&self, access: PlanAccess) -> Result<PlanDetail, DomainError> {
        let PlanAccess {
            plan,
            snapshot,
            status,
        } = access;

        let owner = snapshot.owner();
        let members = snapshot.members();
        let mut user_ids: Vec<Uuid> = members.iter().map(|m| m.user_id).collect();
        if let Some(owner) = owner {
            user_ids.push(owner.user_id);
        }
        let nicknames: HashMap<Uuid, String> = self
            .stores
            .users
            .find_users(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.nickname))
            .collect();

        let info = |m: &Membership| PlanMemberInfo {
            user_id: m.user_id,
            nickname: nicknames.get(&m.user_id).cloned(),
            status: m.status,
            joined_at: m.joined_at,
        };

        Ok(PlanDetail {
            id: plan.id,
            name: plan.name,
            is_public: plan.is_public,
            start_date: plan.start_date,
            end_date: plan.end_date,
            created_at: plan.created_at,
            updated_at: plan.updated_at,
            owner: owner.map(info),
            members: members.into_iter().map(info).collect(),
            member_count: snapshot.current_count(),
            your_status: status,
            is_owner: status == Some(MembershipStatus::Owner),
            is_member: status == Some(MembershipStatus::Member),
        })
    }
}
