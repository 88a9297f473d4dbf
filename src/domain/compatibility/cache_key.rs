//! Cache keys for compatibility results.
//!
//! Keys are symmetric in the pair, so `(a, b)` and `(b, a)` share one entry.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::result::ScoringMode;
use super::strategy::MatchType;
use crate::domain::member::MemberProfile;

const KEY_NAMESPACE: &str = "compat";

/// How the pair part of a key is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheKeyStrategy {
    /// Sorted and joined student ids.
    #[default]
    MemberPair,
    /// Content hash of both profiles; edited profiles miss the cache.
    ProfileHash,
}

/// Builds the cache key for one scoring request.
pub fn cache_key(
    strategy: CacheKeyStrategy,
    a: &MemberProfile,
    b: &MemberProfile,
    match_type: MatchType,
    mode: ScoringMode,
) -> String {
    let pair = match strategy {
        CacheKeyStrategy::MemberPair => member_pair(a, b),
        CacheKeyStrategy::ProfileHash => profile_pair_hash(a, b),
    };
    format!("{}:{}:{}:{}", KEY_NAMESPACE, match_type, mode.as_str(), pair)
}

fn member_pair(a: &MemberProfile, b: &MemberProfile) -> String {
    let (lo, hi) = sorted(a.student_id.as_str(), b.student_id.as_str());
    format!("{}|{}", lo, hi)
}

fn profile_pair_hash(a: &MemberProfile, b: &MemberProfile) -> String {
    let ha = profile_hash(a);
    let hb = profile_hash(b);
    let (lo, hi) = sorted(&ha, &hb);

    let mut hasher = Sha256::new();
    hasher.update(lo.as_bytes());
    hasher.update(b"|");
    hasher.update(hi.as_bytes());
    hex(&hasher.finalize())
}

/// SHA-256 of a member's id and questionnaire.
pub fn profile_hash(member: &MemberProfile) -> String {
    let mut hasher = Sha256::new();
    hasher.update(member.student_id.as_str().as_bytes());
    hasher.update(serde_json::to_vec(&member.questionnaire).unwrap_or_default());
    hex(&hasher.finalize())
}

fn sorted<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
