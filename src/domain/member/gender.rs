//! Declared gender and gender-match preference.

use serde::{Deserialize, Serialize};

/// Gender as declared in the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Which gender a member would like to be matched with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderPreference {
    #[default]
    #[serde(alias = "any", alias = "none")]
    NoPreference,
    Male,
    Female,
}

impl GenderPreference {
    /// The gender this preference asks for, `None` when there is no preference.
    pub fn target(&self) -> Option<Gender> {
        match self {
            GenderPreference::NoPreference => None,
            GenderPreference::Male => Some(Gender::Male),
            GenderPreference::Female => Some(Gender::Female),
        }
    }

    /// Whether a member with the given declared gender satisfies this preference.
    ///
    /// An undeclared gender never satisfies a specific preference.
    pub fn is_met_by(&self, gender: Option<Gender>) -> bool {
        match self.target() {
            None => true,
            Some(wanted) => gender == Some(wanted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_preference_is_met_by_anyone() {
        let pref = GenderPreference::NoPreference;
        assert!(pref.is_met_by(Some(Gender::Male)));
        assert!(pref.is_met_by(Some(Gender::Other)));
        assert!(pref.is_met_by(None));
    }

    #[test]
    fn specific_preference_requires_declared_match() {
        let pref = GenderPreference::Female;
        assert!(pref.is_met_by(Some(Gender::Female)));
        assert!(!pref.is_met_by(Some(Gender::Male)));
        assert!(!pref.is_met_by(None));
    }

    #[test]
    fn preference_deserializes_from_aliases() {
        let pref: GenderPreference = serde_json::from_str("\"no_preference\"").unwrap();
        assert_eq!(pref, GenderPreference::NoPreference);
        let pref: GenderPreference = serde_json::from_str("\"any\"").unwrap();
        assert_eq!(pref, GenderPreference::NoPreference);
        let pref: GenderPreference = serde_json::from_str("\"female\"").unwrap();
        assert_eq!(pref, GenderPreference::Female);
    }
}
