//! Read-only derivations over the wizard state: conditional field
//! visibility and human-readable display strings.

use super::model::{FormState, Interest, NotificationPreference, Occupation, PersonalInfo, Preferences};

/// Whether the preferences step shows its student-specific options.
pub fn shows_student_options(state: &FormState) -> bool {
    matches!(
        state.personal_info.as_ref().map(|p| p.occupation),
        Some(Occupation::Student)
    )
}

/// Upper-case the first character of `s`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "Student", "Developer", … or "Not specified" when absent.
pub fn occupation_display(occupation: Option<Occupation>) -> String {
    occupation
        .map(|o| capitalize(o.as_str()))
        .unwrap_or_else(|| "Not specified".to_string())
}

/// "No notifications" for `none`, otherwise "<Value> notifications".
pub fn notification_display(pref: NotificationPreference) -> String {
    match pref {
        NotificationPreference::None => "No notifications".to_string(),
        other => format!("{} notifications", capitalize(other.as_str())),
    }
}

pub fn interest_display(interest: Interest) -> String {
    capitalize(interest.as_str())
}

/// Read-only summary rendered by the review step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSummary {
    pub full_name: String,
    pub email: String,
    pub occupation: String,
    pub interests: Vec<String>,
    pub notifications: String,
}

impl ReviewSummary {
    pub fn new(info: &PersonalInfo, prefs: &Preferences) -> Self {
        Self {
            full_name: info.full_name.clone(),
            email: info.email.clone(),
            occupation: occupation_display(Some(info.occupation)),
            interests: prefs.interests.iter().copied().map(interest_display).collect(),
            notifications: notification_display(prefs.notification_preference),
        }
    }

    /// Render as label/value rows.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Full Name", self.full_name.clone()),
            ("Email", self.email.clone()),
            ("Occupation", self.occupation.clone()),
            ("Interests", self.interests.join(", ")),
            ("Notifications", self.notifications.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::model::ThemePreference;

    fn info(occupation: Occupation) -> PersonalInfo {
        PersonalInfo {
            full_name: "Al".to_string(),
            email: "a@b.com".to_string(),
            occupation,
        }
    }

    #[test]
    fn student_options_follow_stored_occupation() {
        let mut state = FormState::default();
        assert!(!shows_student_options(&state));

        state.personal_info = Some(info(Occupation::Student));
        assert!(shows_student_options(&state));

        for occ in [Occupation::Developer, Occupation::Designer, Occupation::Manager, Occupation::Other] {
            state.personal_info = Some(info(occ));
            assert!(!shows_student_options(&state), "{occ} should not show student options");
        }
    }

    #[test]
    fn capitalize_handles_edges() {
        assert_eq!(capitalize("student"), "Student");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("ähnlich"), "Ähnlich");
    }

    #[test]
    fn display_strings() {
        assert_eq!(occupation_display(Some(Occupation::Manager)), "Manager");
        assert_eq!(occupation_display(None), "Not specified");
        assert_eq!(notification_display(NotificationPreference::None), "No notifications");
        assert_eq!(notification_display(NotificationPreference::Email), "Email notifications");
        assert_eq!(notification_display(NotificationPreference::Push), "Push notifications");
    }

    #[test]
    fn review_summary_rows() {
        let prefs = Preferences {
            interests: vec![Interest::Technology, Interest::Marketing],
            notification_preference: NotificationPreference::None,
            theme_preference: ThemePreference::Light,
        };
        let summary = ReviewSummary::new(&info(Occupation::Student), &prefs);
        assert_eq!(summary.occupation, "Student");
        assert_eq!(summary.interests, vec!["Technology", "Marketing"]);
        assert_eq!(summary.notifications, "No notifications");

        let rows = summary.rows();
        assert_eq!(rows[0], ("Full Name", "Al".to_string()));
        assert_eq!(rows[3], ("Interests", "Technology, Marketing".to_string()));
    }
}
