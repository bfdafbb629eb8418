//! Screen controllers.
//!
//! Each screen pairs a `StateContainer` with the dependencies it needs.
//! Nothing here knows how the state is rendered.

use crate::config::ProfileSettings;
use crate::error::Result;
use crate::models::UserProfile;
use crate::progress;
use crate::store::ProfileRepository;
use chrono::NaiveDate;
use tracing::info;

pub mod chat;
pub mod exercises;
pub mod lookup;
pub mod path;
pub mod profile;

pub use chat::ChatScreen;
pub use exercises::ExerciseScreen;
pub use lookup::LookupScreen;
pub use path::PathScreen;
pub use profile::ProfileScreen;

/// The profile as of `today`: weekly points roll over when a new week
/// began, and a changed week anchor is persisted.
pub(crate) async fn load_for_day(
    repository: &ProfileRepository,
    defaults: &ProfileSettings,
    today: NaiveDate,
) -> Result<UserProfile> {
    let mut profile = repository
        .load_or_create(&defaults.username, &defaults.language)
        .await?;

    let before = profile.week_start;
    if progress::roll_week(&mut profile, today) {
        info!("New week started, weekly points reset");
    }
    if profile.week_start != before {
        repository.update(profile.clone()).await?;
    }
    Ok(profile)
}
