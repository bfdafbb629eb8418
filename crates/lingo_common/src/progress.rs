//! Progress updater - applies one completed exercise to a profile.
//!
//! All language-list mutation goes through this module. `record_exercise`
//! counts work; `select_language` only changes which language is current.
//! Callers persist the profile afterwards.

use crate::flags;
use crate::models::{LanguageProgress, UserProfile};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Exercises credited per completed exercise
pub const EXERCISE_AMOUNT: u32 = 1;

/// Points credited per completed exercise
pub const EXERCISE_REWARD: u32 = 10;

/// What a single `record_exercise` call changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressDelta {
    pub language: String,
    /// True when the language entry was appended by this call
    pub inserted: bool,
    pub exercises_done: u32,
    pub points_earned: u32,
}

/// Credit one exercise to `language`, or to the current language when `None`.
pub fn record_exercise(profile: &mut UserProfile, language: Option<&str>) -> ProgressDelta {
    let target = flags::canonical_name(language.unwrap_or(profile.current_language.name.as_str()));

    let inserted = match profile.language_mut(&target) {
        Some(entry) => {
            entry.exercises_done = entry.exercises_done.saturating_add(EXERCISE_AMOUNT);
            entry.points_earned = entry.points_earned.saturating_add(EXERCISE_REWARD);
            false
        }
        None => {
            let mut entry = LanguageProgress::new(target.clone());
            entry.exercises_done = EXERCISE_AMOUNT;
            entry.points_earned = EXERCISE_REWARD;
            profile.languages.push(entry);
            true
        }
    };

    recompute_totals(profile);
    profile.weekly_points = profile.weekly_points.saturating_add(EXERCISE_REWARD);
    sync_current(profile);

    let (exercises_done, points_earned) = profile
        .language(&target)
        .map(|l| (l.exercises_done, l.points_earned))
        .unwrap_or_default();
    let delta = ProgressDelta {
        language: target,
        inserted,
        exercises_done,
        points_earned,
    };

    debug!(
        "Recorded exercise for {} (inserted={}, exercises={}, points={})",
        delta.language, delta.inserted, delta.exercises_done, delta.points_earned
    );
    delta
}

/// Make `name` the current language, appending a zeroed entry if it is new.
///
/// Counters, totals and weekly points are left untouched.
pub fn select_language(profile: &mut UserProfile, name: &str) {
    let name = flags::canonical_name(name);
    if profile.language(&name).is_none() {
        profile.languages.push(LanguageProgress::new(name.as_str()));
    }
    profile.current_language = LanguageProgress::new(name.as_str());
    sync_current(profile);
    debug!("Current language is now {}", name);
}

/// Recompute both totals as sums over the language list.
pub fn recompute_totals(profile: &mut UserProfile) {
    profile.total_exercises_done = profile
        .languages
        .iter()
        .fold(0u32, |acc, l| acc.saturating_add(l.exercises_done));
    profile.total_points = profile
        .languages
        .iter()
        .fold(0u32, |acc, l| acc.saturating_add(l.points_earned));
}

/// Zero the weekly counter if `today` falls in a later week than the stored one.
///
/// Returns true when a reset happened.
pub fn roll_week(profile: &mut UserProfile, today: NaiveDate) -> bool {
    let monday = week_start(today);
    match profile.week_start {
        Some(start) if start >= monday => false,
        Some(_) => {
            reset_weekly(profile);
            profile.week_start = Some(monday);
            true
        }
        None => {
            profile.week_start = Some(monday);
            false
        }
    }
}

pub fn reset_weekly(profile: &mut UserProfile) {
    profile.weekly_points = 0;
}

/// Monday of the ISO week containing `day`
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

fn sync_current(profile: &mut UserProfile) {
    if let Some(entry) = profile.language(&profile.current_language.name).cloned() {
        profile.current_language = entry;
    }
}
