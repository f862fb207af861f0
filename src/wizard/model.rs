//! Form data models: the entities each step produces and the persisted
//! wizard state.

use serde::{Deserialize, Serialize};

use super::steps::StepId;
use super::validation::{PersonalInfoDraft, PreferencesDraft};

/// Occupation choices offered by the personal-info step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occupation {
    Student,
    Developer,
    Designer,
    Manager,
    Other,
}

impl Occupation {
    pub const ALL: [Occupation; 5] = [
        Self::Student,
        Self::Developer,
        Self::Designer,
        Self::Manager,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Developer => "developer",
            Self::Designer => "designer",
            Self::Manager => "manager",
            Self::Other => "other",
        }
    }
}

/// Interest tags offered by the preferences step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interest {
    Technology,
    Design,
    Business,
    Marketing,
}

impl Interest {
    pub const ALL: [Interest; 4] = [
        Self::Technology,
        Self::Design,
        Self::Business,
        Self::Marketing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technology => "technology",
            Self::Design => "design",
            Self::Business => "business",
            Self::Marketing => "marketing",
        }
    }
}

/// How the user wants to be notified.
///
/// `Push` is accepted but no input control offers it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPreference {
    #[default]
    Email,
    Push,
    None,
}

impl NotificationPreference {
    pub const ALL: [NotificationPreference; 3] = [Self::Email, Self::Push, Self::None];

    /// Values the preferences step presents as choices.
    pub const OFFERED: [NotificationPreference; 2] = [Self::Email, Self::None];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Push => "push",
            Self::None => "none",
        }
    }
}

/// Theme choice. Stored with the preferences; no control renders it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemePreference {
    pub const ALL: [ThemePreference; 3] = [Self::Light, Self::Dark, Self::System];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

macro_rules! str_enum_impls {
    ($($ty:ty => $what:literal),* $(,)?) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.as_str())
                }
            }

            impl std::str::FromStr for $ty {
                type Err = String;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    let s = s.trim();
                    Self::ALL
                        .into_iter()
                        .find(|v| v.as_str() == s)
                        .ok_or_else(|| format!("Unknown {}: {}", $what, s))
                }
            }
        )*
    };
}

str_enum_impls!(
    Occupation => "occupation",
    Interest => "interest",
    NotificationPreference => "notification preference",
    ThemePreference => "theme",
);

/// Output of the personal-info step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub occupation: Occupation,
}

/// Output of the preferences step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Selected interests in selection order, without duplicates.
    pub interests: Vec<Interest>,
    pub notification_preference: NotificationPreference,
    pub theme_preference: ThemePreference,
}

/// Per-step completion flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedSteps {
    #[serde(default)]
    pub personal_info: bool,
    #[serde(default)]
    pub preferences: bool,
    #[serde(default)]
    pub review: bool,
}

impl CompletedSteps {
    pub fn is_completed(&self, step: StepId) -> bool {
        match step {
            StepId::PersonalInfo => self.personal_info,
            StepId::Preferences => self.preferences,
            StepId::Review => self.review,
        }
    }

    /// Return a copy with exactly `step` set to true.
    pub fn with_completed(mut self, step: StepId) -> Self {
        match step {
            StepId::PersonalInfo => self.personal_info = true,
            StepId::Preferences => self.preferences = true,
            StepId::Review => self.review = true,
        }
        self
    }
}

/// The wizard's durable state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    #[serde(default)]
    pub personal_info: Option<PersonalInfo>,
    #[serde(default)]
    pub preferences: Option<Preferences>,
    #[serde(default)]
    pub completed_steps: CompletedSteps,
}

impl FormState {
    /// Whether the data backing `step` is present.
    pub fn has_data_for(&self, step: StepId) -> bool {
        match step {
            StepId::PersonalInfo => self.personal_info.is_some(),
            StepId::Preferences => self.preferences.is_some(),
            StepId::Review => self.personal_info.is_some() && self.preferences.is_some(),
        }
    }

    /// Drop data that would not pass its step's validation, then clear any
    /// completion flag whose data is missing.
    ///
    /// Returns the steps whose flags were cleared.
    pub fn normalize(&mut self) -> Vec<StepId> {
        if self
            .personal_info
            .as_ref()
            .is_some_and(|info| PersonalInfoDraft::from(info).validate().is_err())
        {
            self.personal_info = None;
        }
        if self
            .preferences
            .as_ref()
            .is_some_and(|prefs| PreferencesDraft::from(prefs).validate().is_err())
        {
            self.preferences = None;
        }

        let mut cleared = Vec::new();
        for step in [StepId::PersonalInfo, StepId::Preferences, StepId::Review] {
            if self.completed_steps.is_completed(step) && !self.has_data_for(step) {
                match step {
                    StepId::PersonalInfo => self.completed_steps.personal_info = false,
                    StepId::Preferences => self.completed_steps.preferences = false,
                    StepId::Review => self.completed_steps.review = false,
                }
                cleared.push(step);
            }
        }
        cleared
    }
}

/// Storage constants.
pub mod storage_keys {
    /// Namespace key the wizard snapshot is stored under.
    pub const FORM_STATE: &str = "multi-step-form-storage";
    /// Version written into the persisted envelope.
    pub const SNAPSHOT_VERSION: u32 = 0;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> FormState {
        FormState {
            personal_info: Some(PersonalInfo {
                full_name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                occupation: Occupation::Developer,
            }),
            preferences: Some(Preferences {
                interests: vec![Interest::Design, Interest::Technology],
                notification_preference: NotificationPreference::None,
                theme_preference: ThemePreference::Dark,
            }),
            completed_steps: CompletedSteps {
                personal_info: true,
                preferences: true,
                review: false,
            },
        }
    }

    #[test]
    fn default_state_is_empty() {
        let s = FormState::default();
        assert!(s.personal_info.is_none());
        assert!(s.preferences.is_none());
        assert_eq!(s.completed_steps, CompletedSteps::default());
    }

    #[test]
    fn state_serde_uses_camel_case() {
        let json = serde_json::to_value(sample_state()).unwrap();
        assert_eq!(json["personalInfo"]["fullName"], "Ada Lovelace");
        assert_eq!(json["personalInfo"]["occupation"], "developer");
        assert_eq!(json["preferences"]["notificationPreference"], "none");
        assert_eq!(json["preferences"]["themePreference"], "dark");
        assert_eq!(json["completedSteps"]["personalInfo"], true);
        assert_eq!(json["completedSteps"]["review"], false);
    }

    #[test]
    fn state_serde_roundtrip() {
        let state = sample_state();
        let json = serde_json::to_string(&state).unwrap();
        let parsed: FormState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn null_data_deserializes_as_absent() {
        let parsed: FormState = serde_json::from_str(
            r#"{"personalInfo":null,"preferences":null,"completedSteps":{"personalInfo":false}}"#,
        )
        .unwrap();
        assert_eq!(parsed, FormState::default());
    }

    #[test]
    fn with_completed_sets_exactly_one_flag() {
        for step in [StepId::PersonalInfo, StepId::Preferences, StepId::Review] {
            let flags = CompletedSteps::default().with_completed(step);
            for other in [StepId::PersonalInfo, StepId::Preferences, StepId::Review] {
                assert_eq!(flags.is_completed(other), other == step);
            }
        }
    }

    #[test]
    fn normalize_clears_flags_without_data() {
        let mut state = FormState {
            personal_info: None,
            preferences: None,
            completed_steps: CompletedSteps {
                personal_info: true,
                preferences: true,
                review: true,
            },
        };
        let cleared = state.normalize();
        assert_eq!(cleared.len(), 3);
        assert_eq!(state.completed_steps, CompletedSteps::default());

        let mut consistent = sample_state();
        assert!(consistent.normalize().is_empty());
        assert_eq!(consistent, sample_state());
    }

    #[test]
    fn normalize_drops_data_that_fails_validation() {
        let mut state = sample_state();
        state.personal_info = Some(PersonalInfo {
            full_name: String::new(),
            email: "nope".to_string(),
            occupation: Occupation::Student,
        });
        state.preferences.as_mut().unwrap().interests.clear();

        let cleared = state.normalize();
        assert_eq!(cleared, vec![StepId::PersonalInfo, StepId::Preferences]);
        assert_eq!(state, FormState::default());
    }

    #[test]
    fn normalize_keeps_valid_data_without_flags() {
        let mut state = sample_state();
        state.completed_steps = CompletedSteps::default();
        assert!(state.normalize().is_empty());
        assert!(state.personal_info.is_some());
        assert!(state.preferences.is_some());
    }

    #[test]
    fn enums_parse_from_strings() {
        assert_eq!("student".parse::<Occupation>(), Ok(Occupation::Student));
        assert_eq!(" marketing ".parse::<Interest>(), Ok(Interest::Marketing));
        assert_eq!("push".parse::<NotificationPreference>(), Ok(NotificationPreference::Push));
        assert_eq!(
            "pilot".parse::<Occupation>(),
            Err("Unknown occupation: pilot".to_string())
        );
        assert!("Student".parse::<Occupation>().is_err());
    }

    #[test]
    fn display_matches_serde() {
        for occ in Occupation::ALL {
            let json = serde_json::to_string(&occ).unwrap();
            assert_eq!(format!("\"{occ}\""), json);
        }
        for interest in Interest::ALL {
            let json = serde_json::to_string(&interest).unwrap();
            assert_eq!(format!("\"{interest}\""), json);
        }
    }
}
