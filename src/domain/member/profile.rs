//! Member profile and questionnaire as read from the member store.

use serde::{Deserialize, Serialize};

use super::gender::{Gender, GenderPreference};
use crate::domain::foundation::MemberId;

/// Review status of a membership application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// A reading club member. Owned by the member store; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub student_id: MemberId,
    pub name: String,
    #[serde(default)]
    pub status: MemberStatus,
    #[serde(default)]
    pub questionnaire: Questionnaire,
}

impl MemberProfile {
    /// Creates a pending member with an empty questionnaire.
    pub fn new(student_id: MemberId, name: impl Into<String>) -> Self {
        Self {
            student_id,
            name: name.into(),
            status: MemberStatus::Pending,
            questionnaire: Questionnaire::default(),
        }
    }

    /// Sets the review status.
    pub fn with_status(mut self, status: MemberStatus) -> Self {
        self.status = status;
        self
    }

    /// Replaces the questionnaire.
    pub fn with_questionnaire(mut self, questionnaire: Questionnaire) -> Self {
        self.questionnaire = questionnaire;
        self
    }

    pub fn is_approved(&self) -> bool {
        self.status == MemberStatus::Approved
    }
}

/// Structured questionnaire answers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Questionnaire {
    pub gender: Option<Gender>,
    pub match_gender_preference: GenderPreference,
    pub grade: Option<String>,
    pub major: Option<String>,
    pub book_categories: Vec<String>,
    pub favorite_books: Vec<String>,
    pub interests: Vec<String>,
    pub personality_traits: PersonalityTraits,
    pub description: String,
}

impl Questionnaire {
    pub fn with_gender(mut self, gender: Gender, preference: GenderPreference) -> Self {
        self.gender = Some(gender);
        self.match_gender_preference = preference;
        self
    }

    pub fn with_basic_info(mut self, grade: impl Into<String>, major: impl Into<String>) -> Self {
        self.grade = Some(grade.into());
        self.major = Some(major.into());
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.book_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_favorite_books<I, S>(mut self, books: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.favorite_books = books.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests = interests.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_traits(mut self, traits: PersonalityTraits) -> Self {
        self.personality_traits = traits;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Book categories normalised for set comparison.
    pub fn category_set(&self) -> Vec<String> {
        normalize_keywords(&self.book_categories)
    }

    /// Interest keywords normalised for set comparison.
    pub fn interest_set(&self) -> Vec<String> {
        normalize_keywords(&self.interests)
    }
}

/// Self-assessed personality traits on a 1–5 scale. Absent traits are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalityTraits {
    pub openness: Option<u8>,
    pub conscientiousness: Option<u8>,
    pub extraversion: Option<u8>,
    pub agreeableness: Option<u8>,
}

impl PersonalityTraits {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// All four traits set to the same value.
    pub fn uniform(value: u8) -> Self {
        Self {
            openness: Some(value),
            conscientiousness: Some(value),
            extraversion: Some(value),
            agreeableness: Some(value),
        }
    }

    /// Traits in a fixed order, clamped into the 1–5 scale.
    pub fn values(&self) -> [Option<u8>; 4] {
        [
            self.openness,
            self.conscientiousness,
            self.extraversion,
            self.agreeableness,
        ]
        .map(|v| v.map(|v| v.clamp(Self::MIN, Self::MAX)))
    }
}

/// Lowercases, trims, drops empties and deduplicates while keeping order.
fn normalize_keywords(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for item in raw {
        let key = item.trim().to_lowercase();
        if !key.is_empty() && !out.contains(&key) {
            out.push(key);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str) -> MemberProfile {
        MemberProfile::new(MemberId::new(id).unwrap(), "Reader")
    }

    #[test]
    fn new_member_is_pending() {
        let m = member("s1");
        assert_eq!(m.status, MemberStatus::Pending);
        assert!(!m.is_approved());
        assert!(m.with_status(MemberStatus::Approved).is_approved());
    }

    #[test]
    fn keyword_sets_are_normalised() {
        let q = Questionnaire::default()
            .with_categories(["Sci_Fi_Fantasy", " sci_fi_fantasy", "", "history"]);
        assert_eq!(q.category_set(), vec!["sci_fi_fantasy", "history"]);
    }

    #[test]
    fn trait_values_are_clamped() {
        let traits = PersonalityTraits {
            openness: Some(9),
            conscientiousness: Some(0),
            extraversion: None,
            agreeableness: Some(3),
        };
        assert_eq!(traits.values(), [Some(5), Some(1), None, Some(3)]);
    }

    #[test]
    fn profile_deserializes_with_missing_questionnaire_fields() {
        let json = r#"{
            "student_id": "2023001",
            "name": "Lin",
            "status": "approved",
            "questionnaire": { "book_categories": ["history"], "gender": "female" }
        }"#;
        let profile: MemberProfile = serde_json::from_str(json).unwrap();
        assert!(profile.is_approved());
        assert_eq!(profile.questionnaire.gender, Some(Gender::Female));
        assert_eq!(
            profile.questionnaire.match_gender_preference,
            GenderPreference::NoPreference
        );
        assert!(profile.questionnaire.interests.is_empty());
    }
}
