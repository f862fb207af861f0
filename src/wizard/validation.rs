//! Step input drafts and their validation.
//!
//! A draft is the transient edit buffer a step controller holds. Validation
//! turns a draft into the typed entity or reports one error per invalid
//! field.

use std::sync::LazyLock;

use regex::Regex;

use super::model::{
    Interest, NotificationPreference, Occupation, PersonalInfo, Preferences, ThemePreference,
};

/// Minimum length (in characters) of a full name.
pub const MIN_FULL_NAME_LEN: usize = 2;

/// Email syntax check. Leading dots and consecutive dots are rejected
/// separately in [`is_valid_email`].
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

/// Whether `email` is a syntactically valid address.
pub fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && EMAIL_RE.is_match(email)
}

/// Field names as they appear in the error surface.
pub mod fields {
    pub const FULL_NAME: &str = "fullName";
    pub const EMAIL: &str = "email";
    pub const OCCUPATION: &str = "occupation";
    pub const INTERESTS: &str = "interests";
    pub const NOTIFICATION_PREFERENCE: &str = "notificationPreference";
    pub const THEME_PREFERENCE: &str = "themePreference";
}

/// What went wrong with a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// No value was provided.
    Required,
    /// The string is shorter than `min` characters.
    TooShort { min: usize },
    /// Not a syntactically valid email address.
    InvalidEmail,
    /// The value is not one of the allowed choices.
    NotAllowed { value: String },
    /// A selection that needs at least one entry is empty.
    EmptySelection,
}

/// A validation failure for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: FieldErrorKind,
    /// Human-readable message for inline display.
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, kind: FieldErrorKind) -> Self {
        let message = message_for(field, &kind);
        Self {
            field,
            kind,
            message,
        }
    }
}

fn message_for(field: &str, kind: &FieldErrorKind) -> String {
    use FieldErrorKind::*;
    match (field, kind) {
        (fields::FULL_NAME, Required) => "Please enter your full name.".to_string(),
        (fields::FULL_NAME, TooShort { min }) => {
            format!("Full name must be at least {min} characters.")
        }
        (fields::EMAIL, Required) => "Please enter your email address.".to_string(),
        (fields::EMAIL, _) => "Please enter a valid email address.".to_string(),
        (fields::OCCUPATION, _) => "Please select an occupation.".to_string(),
        (fields::INTERESTS, NotAllowed { value }) => format!("Unknown interest: {value}."),
        (fields::INTERESTS, _) => "Please select at least one interest.".to_string(),
        (fields::NOTIFICATION_PREFERENCE, _) => {
            "Please select a notification preference.".to_string()
        }
        (fields::THEME_PREFERENCE, _) => "Please select a theme preference.".to_string(),
        (field, Required) => format!("{field} is required."),
        (field, TooShort { min }) => format!("{field} must be at least {min} characters."),
        (field, InvalidEmail) => format!("{field} must be a valid email address."),
        (field, NotAllowed { value }) => format!("{value} is not a valid {field}."),
        (field, EmptySelection) => format!("Select at least one {field}."),
    }
}

/// All field errors produced by one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} invalid field(s): {}", .errors.len(), field_list(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, kind: FieldErrorKind) {
        self.errors.push(FieldError::new(field, kind));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The error for `field`, if that field failed.
    pub fn field(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    /// The message for `field`, if that field failed.
    pub fn message(&self, field: &str) -> Option<&str> {
        self.field(field).map(|e| e.message.as_str())
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

fn field_list(errors: &[FieldError]) -> String {
    errors.iter().map(|e| e.field).collect::<Vec<_>>().join(", ")
}

/// Edit buffer for the personal-info step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalInfoDraft {
    pub full_name: String,
    pub email: String,
    /// Raw occupation choice; empty when nothing is selected.
    pub occupation: String,
}

impl From<&PersonalInfo> for PersonalInfoDraft {
    fn from(info: &PersonalInfo) -> Self {
        Self {
            full_name: info.full_name.clone(),
            email: info.email.clone(),
            occupation: info.occupation.to_string(),
        }
    }
}

impl PersonalInfoDraft {
    /// Set a field by its surface name. Returns false for unknown fields.
    pub fn set_field(&mut self, field: &str, value: &str) -> bool {
        let slot = match field {
            fields::FULL_NAME => &mut self.full_name,
            fields::EMAIL => &mut self.email,
            fields::OCCUPATION => &mut self.occupation,
            _ => return false,
        };
        *slot = value.to_string();
        true
    }

    /// Validate every field, collecting one error per invalid field.
    pub fn validate(&self) -> Result<PersonalInfo, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let full_name = self.full_name.as_str();
        if full_name.is_empty() {
            errors.push(fields::FULL_NAME, FieldErrorKind::Required);
        } else if full_name.chars().count() < MIN_FULL_NAME_LEN {
            errors.push(
                fields::FULL_NAME,
                FieldErrorKind::TooShort {
                    min: MIN_FULL_NAME_LEN,
                },
            );
        }

        let email = self.email.as_str();
        if email.is_empty() {
            errors.push(fields::EMAIL, FieldErrorKind::Required);
        } else if !is_valid_email(email) {
            errors.push(fields::EMAIL, FieldErrorKind::InvalidEmail);
        }

        let occupation = parse_choice::<Occupation>(&self.occupation, fields::OCCUPATION, &mut errors);

        errors.into_result(|| PersonalInfo {
            full_name: full_name.to_string(),
            email: email.to_string(),
            // Present whenever no errors were recorded.
            occupation: occupation.unwrap_or(Occupation::Other),
        })
    }
}

/// Edit buffer for the preferences step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferencesDraft {
    /// Raw interest tags in selection order.
    pub interests: Vec<String>,
    pub notification_preference: String,
    pub theme_preference: String,
}

impl Default for PreferencesDraft {
    fn default() -> Self {
        Self {
            interests: Vec::new(),
            notification_preference: NotificationPreference::default().to_string(),
            theme_preference: ThemePreference::default().to_string(),
        }
    }
}

impl From<&Preferences> for PreferencesDraft {
    fn from(prefs: &Preferences) -> Self {
        Self {
            interests: prefs.interests.iter().map(|i| i.to_string()).collect(),
            notification_preference: prefs.notification_preference.to_string(),
            theme_preference: prefs.theme_preference.to_string(),
        }
    }
}

impl PreferencesDraft {
    /// Add `interest` if absent, remove it if present. Returns whether it is
    /// selected afterwards.
    pub fn toggle_interest(&mut self, interest: &str) -> bool {
        let interest = interest.trim();
        if let Some(pos) = self.interests.iter().position(|i| i == interest) {
            self.interests.remove(pos);
            false
        } else {
            self.interests.push(interest.to_string());
            true
        }
    }

    pub fn is_selected(&self, interest: Interest) -> bool {
        self.interests.iter().any(|i| i == interest.as_str())
    }

    /// Set a scalar field by its surface name. `interests` takes a
    /// comma-separated list. Returns false for unknown fields.
    pub fn set_field(&mut self, field: &str, value: &str) -> bool {
        match field {
            fields::INTERESTS => {
                self.interests = value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            fields::NOTIFICATION_PREFERENCE => self.notification_preference = value.to_string(),
            fields::THEME_PREFERENCE => self.theme_preference = value.to_string(),
            _ => return false,
        }
        true
    }

    /// Validate every field, collecting one error per invalid field.
    pub fn validate(&self) -> Result<Preferences, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let mut interests: Vec<Interest> = Vec::new();
        let mut unknown = None;
        for raw in &self.interests {
            match raw.parse::<Interest>() {
                Ok(interest) if !interests.contains(&interest) => interests.push(interest),
                Ok(_) => {}
                Err(_) => {
                    unknown.get_or_insert_with(|| raw.clone());
                }
            }
        }
        if let Some(value) = unknown {
            errors.push(fields::INTERESTS, FieldErrorKind::NotAllowed { value });
        } else if interests.is_empty() {
            errors.push(fields::INTERESTS, FieldErrorKind::EmptySelection);
        }

        let notification = parse_choice::<NotificationPreference>(
            &self.notification_preference,
            fields::NOTIFICATION_PREFERENCE,
            &mut errors,
        );
        let theme = parse_choice::<ThemePreference>(
            &self.theme_preference,
            fields::THEME_PREFERENCE,
            &mut errors,
        );

        errors.into_result(|| Preferences {
            interests,
            notification_preference: notification.unwrap_or_default(),
            theme_preference: theme.unwrap_or_default(),
        })
    }
}

/// Parse an enumerated choice, recording `Required` or `NotAllowed`.
fn parse_choice<T: std::str::FromStr>(
    raw: &str,
    field: &'static str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.push(field, FieldErrorKind::Required);
        return None;
    }
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            errors.push(
                field,
                FieldErrorKind::NotAllowed {
                    value: raw.to_string(),
                },
            );
            None
        }
    }
}
