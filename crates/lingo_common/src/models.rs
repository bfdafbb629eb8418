//! Core data types for Lingo

use crate::flags;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-language counters of exercises completed and points earned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageProgress {
    pub name: String,
    pub country_code: String,
    pub exercises_done: u32,
    pub points_earned: u32,
}

impl LanguageProgress {
    /// Fresh entry with zeroed counters. Known names take the flag table's
    /// spelling, and the region code comes from the same table.
    pub fn new(name: impl Into<String>) -> Self {
        let name = flags::canonical_name(&name.into());
        let country_code = flags::country_code(&name).to_string();
        Self {
            name,
            country_code,
            exercises_done: 0,
            points_earned: 0,
        }
    }

    pub fn flag(&self) -> String {
        flags::flag_emoji(&self.country_code)
    }
}

/// The single persisted user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Row id; 0 until the store assigns one
    pub id: i64,
    pub username: String,
    pub weekly_points: u32,
    /// Insertion-ordered, at most one entry per name
    pub languages: Vec<LanguageProgress>,
    pub current_language: LanguageProgress,
    pub total_exercises_done: u32,
    pub total_points: u32,
    /// Monday of the week `weekly_points` belongs to
    pub week_start: Option<NaiveDate>,
}

impl UserProfile {
    pub fn new(username: impl Into<String>, current_language: &str) -> Self {
        Self {
            id: 0,
            username: username.into(),
            weekly_points: 0,
            languages: Vec::new(),
            current_language: LanguageProgress::new(current_language),
            total_exercises_done: 0,
            total_points: 0,
            week_start: None,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }

    pub fn language(&self, name: &str) -> Option<&LanguageProgress> {
        self.languages.iter().find(|l| l.name == name)
    }

    pub(crate) fn language_mut(&mut self, name: &str) -> Option<&mut LanguageProgress> {
        self.languages.iter_mut().find(|l| l.name == name)
    }

    /// Progress for the current language, falling back to the selection itself
    pub fn current_progress(&self) -> &LanguageProgress {
        self.language(&self.current_language.name)
            .unwrap_or(&self.current_language)
    }

    /// True when both totals equal the sums over `languages`
    pub fn aggregates_consistent(&self) -> bool {
        let (exercises, points) = self.languages.iter().fold((0u32, 0u32), |(e, p), l| {
            (e.saturating_add(l.exercises_done), p.saturating_add(l.points_earned))
        });
        exercises == self.total_exercises_done && points == self.total_points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_is_empty() {
        let profile = UserProfile::new("ana", "English");
        assert_eq!(profile.id, 0);
        assert!(!profile.is_persisted());
        assert!(profile.languages.is_empty());
        assert_eq!(profile.current_language.name, "English");
        assert_eq!(profile.current_language.country_code, "gb");
        assert!(profile.aggregates_consistent());
    }

    #[test]
    fn test_current_progress_prefers_list_entry() {
        let mut profile = UserProfile::new("ana", "German");
        let mut german = LanguageProgress::new("German");
        german.exercises_done = 4;
        profile.languages.push(german);

        assert_eq!(profile.current_progress().exercises_done, 4);
        assert_eq!(profile.current_language.exercises_done, 0);
    }

    #[test]
    fn test_serde_field_names() {
        let lp = LanguageProgress::new("French");
        let json = serde_json::to_value(&lp).unwrap();
        assert_eq!(json["country_code"], "fr");
        assert_eq!(json["exercises_done"], 0);
    }
}
