//! Member module - Read-only view of reading club members.
//!
//! Profiles are owned by the external member store. This module holds the
//! shape of the questionnaire and the gender-preference gate.

mod gender;
mod profile;

pub use gender::{Gender, GenderPreference};
pub use profile::{MemberProfile, MemberStatus, PersonalityTraits, Questionnaire};

/// Gender-preference gate between two members.
///
/// Applies only when both members declare a specific preference; in that case
/// each preference must be met by the other member's declared gender.
pub fn gender_preference_compatible(a: &MemberProfile, b: &MemberProfile) -> bool {
    let qa = &a.questionnaire;
    let qb = &b.questionnaire;

    match (qa.match_gender_preference.target(), qb.match_gender_preference.target()) {
        (Some(_), Some(_)) => {
            qa.match_gender_preference.is_met_by(qb.gender)
                && qb.match_gender_preference.is_met_by(qa.gender)
        }
        _ => true,
    }
}
