//! Fixtures shared by the service tests.

use fake::faker::name::en::FirstName;
use fake::Fake;
use std::sync::Arc;
use uuid::Uuid;

use super::Planner;
use crate::models::invite::InviteCodeSettings;
use crate::models::membership::MembershipStatus;
use crate::models::place::PlaceInfo;
use crate::models::plan::NewPlan;
use crate::store::{InMemoryStore, PlanStore, Stores};

pub struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub planner: Planner,
}

impl Fixture {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let planner = Planner::new(
            Stores::in_memory(store.clone()),
            InviteCodeSettings::default(),
        );
        Self { store, planner }
    }

    pub fn user(&self) -> Uuid {
        let nickname: String = FirstName().fake();
        self.store.add_active_user(&nickname)
    }

    pub async fn plan(&self, owner_id: Uuid, is_public: bool) -> Uuid {
        self.store
            .create_plan(NewPlan {
                name: "Jeju".to_string(),
                is_public,
                start_date: None,
                end_date: None,
                owner_id,
            })
            .await
            .unwrap()
            .id
    }

    pub fn join(&self, plan_id: Uuid, user_id: Uuid, status: MembershipStatus) {
        self.store.set_membership_status(plan_id, user_id, status);
    }

    pub fn place(&self, plan_id: Uuid, pin_place_id: &str) {
        self.store.insert_place(PlaceInfo {
            pin_place_id: pin_place_id.to_string(),
            plan_id,
            title: format!("Place {}", pin_place_id),
            address: Some("Jeju-si".to_string()),
            latitude: 33.5,
            longitude: 126.5,
            color: Some("blue".to_string()),
        });
    }
}
