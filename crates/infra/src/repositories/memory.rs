//! In-memory persistence adapters

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use melodex_core::ports::{
    AnalyticsRepository, FriendRepository, RecommendationEngine, UserRepository,
};
use melodex_domain::{
    AnalyticsSnapshot, FriendRequest, FriendStatus, FriendSummary, MelodexError,
    RecommendationTrigger, Result, UserProfile,
};
use tracing::info;

const SEARCH_RESULT_LIMIT: usize = 10;

#[derive(Debug, Clone)]
struct StoredUser {
    display_name: String,
    refresh_token: String,
}

/// In-memory user store keyed by provider id
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, StoredUser>,
}

impl InMemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self { users: DashMap::new() }
    }

    /// Display name for a known user
    #[must_use]
    pub fn display_name_of(&self, user_id: &str) -> Option<String> {
        self.users.get(user_id).map(|u| u.display_name.clone())
    }

    /// Stored refresh token for a known user (offline pipeline access)
    #[must_use]
    pub fn refresh_token_of(&self, user_id: &str) -> Option<String> {
        self.users.get(user_id).map(|u| u.refresh_token.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn upsert_user(&self, profile: &UserProfile, refresh_token: &str) -> Result<()> {
        self.users.insert(
            profile.id.clone(),
            StoredUser {
                display_name: profile.name_or_id().to_string(),
                refresh_token: refresh_token.to_string(),
            },
        );
        Ok(())
    }

    async fn search_users(&self, query: &str, exclude_id: &str) -> Result<Vec<FriendSummary>> {
        let needle = query.to_lowercase();
        let mut matches: Vec<FriendSummary> = self
            .users
            .iter()
            .filter(|entry| entry.key() != exclude_id)
            .filter(|entry| entry.value().display_name.to_lowercase().contains(&needle))
            .map(|entry| FriendSummary {
                user_id: entry.key().clone(),
                display_name: entry.value().display_name.clone(),
            })
            .collect();

        matches.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        matches.truncate(SEARCH_RESULT_LIMIT);
        Ok(matches)
    }
}

/// In-memory friend graph
///
/// Holds directed request edges; an edge counts as a friendship once its
/// status is accepted, regardless of direction.
#[derive(Debug)]
pub struct InMemoryFriendRepository {
    users: Arc<InMemoryUserRepository>,
    links: Mutex<Vec<FriendRequest>>,
}

impl InMemoryFriendRepository {
    #[must_use]
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self { users, links: Mutex::new(Vec::new()) }
    }

    fn links(&self) -> MutexGuard<'_, Vec<FriendRequest>> {
        match self.links.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Accept a pending request (no HTTP surface yet; used operationally
    /// and by tests)
    pub fn accept(&self, requester_id: &str, receiver_id: &str) -> Result<()> {
        let mut links = self.links();
        let link = links
            .iter_mut()
            .find(|l| l.requester_id == requester_id && l.receiver_id == receiver_id)
            .ok_or_else(|| {
                MelodexError::NotFound(format!("friend request {requester_id} -> {receiver_id}"))
            })?;
        link.status = FriendStatus::Accepted;
        Ok(())
    }
}

#[async_trait]
impl FriendRepository for InMemoryFriendRepository {
    async fn send_request(&self, requester_id: &str, receiver_id: &str) -> Result<FriendRequest> {
        let mut links = self.links();

        let reverse_exists = links
            .iter()
            .any(|l| l.requester_id == receiver_id && l.receiver_id == requester_id);
        if reverse_exists {
            return Err(MelodexError::InvalidInput(
                "friend request already exists from this user; accept it instead".to_string(),
            ));
        }

        let request = FriendRequest {
            requester_id: requester_id.to_string(),
            receiver_id: receiver_id.to_string(),
            status: FriendStatus::Pending,
            created_at: Utc::now(),
        };
        links.push(request.clone());
        Ok(request)
    }

    async fn friends_of(&self, user_id: &str) -> Result<Vec<FriendSummary>> {
        let friend_ids: Vec<String> = self
            .links()
            .iter()
            .filter(|l| l.status == FriendStatus::Accepted)
            .filter_map(|l| {
                if l.requester_id == user_id {
                    Some(l.receiver_id.clone())
                } else if l.receiver_id == user_id {
                    Some(l.requester_id.clone())
                } else {
                    None
                }
            })
            .collect();

        Ok(friend_ids
            .into_iter()
            .map(|id| {
                let display_name = self.users.display_name_of(&id).unwrap_or_else(|| id.clone());
                FriendSummary { user_id: id, display_name }
            })
            .collect())
    }
}

/// In-memory analytics snapshot history, newest last
#[derive(Debug, Default)]
pub struct InMemoryAnalyticsRepository {
    snapshots: Mutex<Vec<AnalyticsSnapshot>>,
}

impl InMemoryAnalyticsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshots(&self) -> MutexGuard<'_, Vec<AnalyticsSnapshot>> {
        match self.snapshots.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl AnalyticsRepository for InMemoryAnalyticsRepository {
    async fn save_snapshot(&self, snapshot: AnalyticsSnapshot) -> Result<()> {
        self.snapshots().push(snapshot);
        Ok(())
    }

    async fn latest_snapshot(&self, user_id: &str) -> Result<Option<AnalyticsSnapshot>> {
        Ok(self.snapshots().iter().rev().find(|s| s.user_id == user_id).cloned())
    }
}

/// Recommendation engine that acknowledges triggers
///
/// The actual pipeline runs out of process; this adapter records the
/// request and answers with a receipt.
#[derive(Debug, Default)]
pub struct NoopRecommendationEngine;

impl NoopRecommendationEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RecommendationEngine for NoopRecommendationEngine {
    async fn trigger(&self, user_id: &str) -> Result<RecommendationTrigger> {
        info!(user_id = %user_id, "recommendation run triggered");
        Ok(RecommendationTrigger {
            status: "success".to_string(),
            message: "Recommendation engine triggered successfully".to_string(),
            timestamp: Utc::now(),
            user_id: user_id.to_string(),
        })
    }
}
