//! MatchSelector - Ranks candidate members for one user.
//!
//! Candidates are scored in batches whose size comes from the circuit
//! breaker, so a struggling AI backend automatically sees fewer concurrent
//! calls. A fixed pause between batches gives it room to recover.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::compatibility_engine::CompatibilityEngine;
use crate::domain::compatibility::{CompatibilityResult, MatchType};
use crate::domain::foundation::MemberId;
use crate::domain::member::{gender_preference_compatible, MemberProfile};
use crate::ports::{MemberStore, MemberStoreError};

/// Errors surfaced to callers of the selector.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error(transparent)]
    Store(#[from] MemberStoreError),

    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),

    #[error("Match search cancelled")]
    Cancelled,
}

/// Pause inserted between batches, per match type.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchDelays {
    pub similar: Duration,
    pub complementary: Duration,
    pub smart: Duration,
}

impl Default for BatchDelays {
    fn default() -> Self {
        Self {
            similar: Duration::from_millis(100),
            complementary: Duration::from_millis(120),
            smart: Duration::from_millis(150),
        }
    }
}

impl BatchDelays {
    pub fn for_match_type(&self, match_type: MatchType) -> Duration {
        match match_type {
            MatchType::Similar => self.similar,
            MatchType::Complementary => self.complementary,
            MatchType::Smart => self.smart,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectorConfig {
    pub max_results: usize,
    pub batch_delays: BatchDelays,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            batch_delays: BatchDelays::default(),
        }
    }
}

/// One ranked candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCandidate {
    pub member_id: MemberId,
    pub name: String,
    pub result: CompatibilityResult,
}

pub struct MatchSelector {
    engine: Arc<CompatibilityEngine>,
    members: Arc<dyn MemberStore>,
    config: SelectorConfig,
}

impl MatchSelector {
    pub fn new(
        engine: Arc<CompatibilityEngine>,
        members: Arc<dyn MemberStore>,
        config: SelectorConfig,
    ) -> Self {
        Self {
            engine,
            members,
            config,
        }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Best matches for `user` among `candidates`, highest score first.
    ///
    /// Excludes the user, unapproved members and gender-incompatible pairs;
    /// drops zero scores and keeps at most `max_results`.
    pub async fn find_matches(
        &self,
        user: &MemberProfile,
        candidates: &[MemberProfile],
        match_type: MatchType,
        use_ai: bool,
    ) -> Vec<MatchCandidate> {
        // Without a token nothing can cancel the search
        match self
            .find_matches_cancellable(user, candidates, match_type, use_ai, &CancellationToken::new())
            .await
        {
            Ok(matches) => matches,
            Err(_) => Vec::new(),
        }
    }

    /// Like [`find_matches`](Self::find_matches), stopping with
    /// [`MatchError::Cancelled`] once `cancel` fires.
    ///
    /// Cancellation is observed before each batch and during the pause
    /// between batches; a batch already in flight completes.
    pub async fn find_matches_cancellable(
        &self,
        user: &MemberProfile,
        candidates: &[MemberProfile],
        match_type: MatchType,
        use_ai: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<MatchCandidate>, MatchError> {
        let eligible: Vec<&MemberProfile> = candidates
            .iter()
            .filter(|c| c.student_id != user.student_id)
            .filter(|c| c.is_approved())
            .filter(|c| gender_preference_compatible(user, c))
            .collect();

        info!(
            user = %user.student_id,
            match_type = %match_type,
            use_ai,
            candidates = candidates.len(),
            eligible = eligible.len(),
            "Finding matches"
        );

        let delay = self.config.batch_delays.for_match_type(match_type);
        let mut matches = Vec::with_capacity(eligible.len());
        let mut remaining = eligible.as_slice();

        while !remaining.is_empty() {
            if cancel.is_cancelled() {
                return Err(MatchError::Cancelled);
            }

            let batch_size = self.engine.breaker().dynamic_batch_size().max(1);
            let (batch, rest) = remaining.split_at(batch_size.min(remaining.len()));
            debug!(batch_size, batch_len = batch.len(), remaining = rest.len(), "Scoring batch");

            let results = join_all(
                batch
                    .iter()
                    .map(|candidate| self.engine.score(user, candidate, match_type, use_ai)),
            )
            .await;

            matches.extend(
                batch
                    .iter()
                    .zip(results)
                    .filter(|(_, result)| result.is_match())
                    .map(|(candidate, result)| MatchCandidate {
                        member_id: candidate.student_id.clone(),
                        name: candidate.name.clone(),
                        result,
                    }),
            );

            remaining = rest;
            if !remaining.is_empty() {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(MatchError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }

        matches.sort_by(rank);
        matches.truncate(self.config.max_results);

        info!(
            user = %user.student_id,
            matches = matches.len(),
            degraded = matches.iter().filter(|m| m.result.degraded).count(),
            "Matches found"
        );
        Ok(matches)
    }

    /// Loads members from the store and ranks matches for `member_id`.
    pub async fn find_matches_for(
        &self,
        member_id: &MemberId,
        match_type: MatchType,
        use_ai: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<MatchCandidate>, MatchError> {
        let members = self.members.load_members().await?;
        let user = members
            .iter()
            .find(|m| &m.student_id == member_id)
            .ok_or_else(|| MatchError::MemberNotFound(member_id.clone()))?;

        self.find_matches_cancellable(user, &members, match_type, use_ai, cancel)
            .await
    }
}

/// Score descending, then member id for a stable order.
fn rank(a: &MatchCandidate, b: &MatchCandidate) -> Ordering {
    b.result
        .score
        .cmp(&a.result.score)
        .then_with(|| a.member_id.cmp(&b.member_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::cache::InMemoryResultCache;
    use crate::adapters::members::InMemoryMemberStore;
    use crate::application::compatibility_engine::EngineConfig;
    use crate::application::deep_analysis::DeepAnalysisPipeline;
    use crate::domain::health::HealthMonitor;
    use crate::domain::member::{Gender, GenderPreference, MemberStatus, PersonalityTraits, Questionnaire};
    use crate::domain::weights::WeightStore;
    use crate::ports::{AnalysisType, CircuitBreaker};

    fn selector_with(provider: MockAIProvider, members: Vec<MemberProfile>) -> (MatchSelector, Arc<HealthMonitor>) {
        let monitor = Arc::new(HealthMonitor::with_defaults());
        let pipeline = Arc::new(DeepAnalysisPipeline::new(Arc::new(provider), monitor.clone()));
        let engine = Arc::new(CompatibilityEngine::new(
            Arc::new(WeightStore::new()),
            monitor.clone(),
            pipeline,
            Arc::new(InMemoryResultCache::new()),
            EngineConfig::default(),
        ));
        let selector = MatchSelector::new(
            engine,
            Arc::new(InMemoryMemberStore::with_members(members)),
            SelectorConfig::default(),
        );
        (selector, monitor)
    }

    fn selector(members: Vec<MemberProfile>) -> MatchSelector {
        selector_with(MockAIProvider::new(), members).0
    }

    fn reader(id: &str, categories: &[&str]) -> MemberProfile {
        MemberProfile::new(MemberId::new(id).unwrap(), format!("Reader {}", id))
            .with_status(MemberStatus::Approved)
            .with_questionnaire(
                Questionnaire::default()
                    .with_categories(categories.iter().copied())
                    .with_traits(PersonalityTraits::uniform(3)),
            )
    }

    fn club() -> Vec<MemberProfile> {
        vec![
            reader("me", &["poetry", "drama", "history"]),
            reader("close", &["poetry", "drama", "history"]),
            reader("partial", &["poetry", "science"]),
            reader("far", &["cooking"]).with_questionnaire(
                Questionnaire::default().with_categories(["cooking"]),
            ),
            reader("pending", &["poetry", "drama", "history"]).with_status(MemberStatus::Pending),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn ranks_filters_and_drops_zero_scores() {
        let members = club();
        let selector = selector(members.clone());

        let matches = selector
            .find_matches(&members[0], &members, MatchType::Similar, false)
            .await;

        let ids: Vec<&str> = matches.iter().map(|m| m.member_id.as_str()).collect();
        assert_eq!(ids, vec!["close", "partial"]);
        assert!(matches[0].result.score > matches[1].result.score);
    }

    #[tokio::test(start_paused = true)]
    async fn truncates_to_max_results_with_stable_ties() {
        let mut members = vec![reader("me", &["poetry"])];
        members.extend((0..15).map(|i| reader(&format!("m{:02}", i), &["poetry"])));
        let selector = selector(members.clone());

        let matches = selector
            .find_matches(&members[0], &members, MatchType::Similar, false)
            .await;

        assert_eq!(matches.len(), 10);
        assert_eq!(matches[0].member_id.as_str(), "m00");
        assert_eq!(matches[9].member_id.as_str(), "m09");
    }

    #[tokio::test(start_paused = true)]
    async fn gender_incompatible_candidates_are_not_scored() {
        let me = reader("me", &["poetry"]).with_questionnaire(
            Questionnaire::default()
                .with_categories(["poetry"])
                .with_gender(Gender::Female, GenderPreference::Female),
        );
        let other = reader("other", &["poetry"]).with_questionnaire(
            Questionnaire::default()
                .with_categories(["poetry"])
                .with_gender(Gender::Male, GenderPreference::Female),
        );
        let provider = MockAIProvider::new();
        let (selector, _) = selector_with(provider.clone(), vec![]);

        let matches = selector
            .find_matches(&me, &[me.clone(), other], MatchType::Similar, true)
            .await;

        assert!(matches.is_empty());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn degraded_backend_still_returns_matches() {
        let members = club();
        let provider = MockAIProvider::new().failing_with(MockError::AuthenticationFailed);
        let (selector, monitor) = selector_with(provider, members.clone());
        for _ in 0..5 {
            monitor.record_error();
        }

        let matches = selector
            .find_matches(&members[0], &members, MatchType::Similar, true)
            .await;

        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.result.degraded));
    }

    #[tokio::test(start_paused = true)]
    async fn pre_cancelled_token_stops_before_scoring() {
        let members = club();
        let provider = MockAIProvider::new()
            .with_default_response(AnalysisType::Personality, r#"{"confidence_score": 0.9}"#);
        let (selector, _) = selector_with(provider.clone(), members.clone());
        let token = CancellationToken::new();
        token.cancel();

        let err = selector
            .find_matches_cancellable(&members[0], &members, MatchType::Similar, true, &token)
            .await
            .unwrap_err();

        assert!(matches!(err, MatchError::Cancelled));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_during_batch_pause() {
        let mut members = vec![reader("me", &["poetry"])];
        members.extend((0..8).map(|i| reader(&format!("m{}", i), &["poetry"])));
        let selector = Arc::new(selector(members.clone()));
        let token = CancellationToken::new();

        let task = tokio::spawn({
            let selector = selector.clone();
            let token = token.clone();
            async move {
                selector
                    .find_matches_cancellable(&members[0], &members, MatchType::Smart, false, &token)
                    .await
            }
        });

        // first batch of 5 completes instantly, then the 150ms pause starts
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, MatchError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn find_matches_for_loads_from_store() {
        let selector = selector(club());
        let token = CancellationToken::new();

        let matches = selector
            .find_matches_for(&MemberId::new("me").unwrap(), MatchType::Similar, false, &token)
            .await
            .unwrap();
        assert_eq!(matches.len(), 2);

        let err = selector
            .find_matches_for(&MemberId::new("ghost").unwrap(), MatchType::Similar, false, &token)
            .await
            .unwrap_err();
        assert!(matches!(err, MatchError::MemberNotFound(_)));
    }

    #[test]
    fn batch_delays_differ_by_match_type() {
        let delays = BatchDelays::default();
        assert_eq!(delays.for_match_type(MatchType::Similar), Duration::from_millis(100));
        assert_eq!(delays.for_match_type(MatchType::Complementary), Duration::from_millis(120));
        assert_eq!(delays.for_match_type(MatchType::Smart), Duration::from_millis(150));
    }
}
