//! Profile screen: totals, per-language rows, rename dialog.

use crate::config::ProfileSettings;
use crate::error::Result;
use crate::models::UserProfile;
use crate::progress;
use crate::screens::load_for_day;
use crate::state::StateContainer;
use crate::store::ProfileRepository;
use chrono::{Local, NaiveDate};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRow {
    pub name: String,
    pub flag: String,
    pub exercises_done: u32,
    pub points_earned: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileState {
    pub loaded: bool,
    pub username: String,
    pub weekly_points: u32,
    pub total_exercises_done: u32,
    pub total_points: u32,
    pub languages: Vec<LanguageRow>,
    pub current_language: String,
    pub current_flag: String,
    pub rename_open: bool,
    pub rename_input: String,
}

pub enum ProfileEvent {
    Loaded(UserProfile),
    OpenRename,
    RenameInput(String),
    DismissRename,
}

pub fn reduce(state: &mut ProfileState, event: ProfileEvent) {
    match event {
        ProfileEvent::Loaded(profile) => {
            state.loaded = true;
            state.username = profile.username.clone();
            state.weekly_points = profile.weekly_points;
            state.total_exercises_done = profile.total_exercises_done;
            state.total_points = profile.total_points;
            state.languages = profile
                .languages
                .iter()
                .map(|l| LanguageRow {
                    name: l.name.clone(),
                    flag: l.flag(),
                    exercises_done: l.exercises_done,
                    points_earned: l.points_earned,
                })
                .collect();
            state.current_language = profile.current_language.name.clone();
            state.current_flag = profile.current_language.flag();
        }
        ProfileEvent::OpenRename => {
            state.rename_open = true;
            state.rename_input = state.username.clone();
        }
        ProfileEvent::RenameInput(text) => state.rename_input = text,
        ProfileEvent::DismissRename => {
            state.rename_open = false;
            state.rename_input.clear();
        }
    }
}

pub struct ProfileScreen {
    repository: ProfileRepository,
    defaults: ProfileSettings,
    state: StateContainer<ProfileState, ProfileEvent>,
}

impl ProfileScreen {
    pub fn new(repository: ProfileRepository, defaults: ProfileSettings) -> Self {
        Self {
            repository,
            defaults,
            state: StateContainer::new(ProfileState::default(), reduce),
        }
    }

    pub fn state(&self) -> &StateContainer<ProfileState, ProfileEvent> {
        &self.state
    }

    async fn profile(&self) -> Result<UserProfile> {
        self.repository
            .load_or_create(&self.defaults.username, &self.defaults.language)
            .await
    }

    pub async fn load(&self) -> Result<()> {
        self.load_on(Local::now().date_naive()).await
    }

    /// Load for a given day; weekly points start over in a new week
    pub async fn load_on(&self, today: NaiveDate) -> Result<()> {
        let profile = load_for_day(&self.repository, &self.defaults, today).await?;
        self.state.send(ProfileEvent::Loaded(profile));
        Ok(())
    }

    pub fn open_rename(&self) {
        self.state.send(ProfileEvent::OpenRename);
    }

    pub fn rename_input(&self, text: impl Into<String>) {
        self.state.send(ProfileEvent::RenameInput(text.into()));
    }

    pub fn dismiss_rename(&self) {
        self.state.send(ProfileEvent::DismissRename);
    }

    /// Save the dialog's text as the new username; blank input is ignored
    pub async fn confirm_rename(&self) -> Result<bool> {
        let name = self.state.snapshot().rename_input.trim().to_string();
        if name.is_empty() {
            return Ok(false);
        }

        let mut profile = self.profile().await?;
        profile.username = name;
        self.repository.update(profile.clone()).await?;
        info!("Renamed profile {} to {}", profile.id, profile.username);

        self.state.send(ProfileEvent::Loaded(profile));
        self.state.send(ProfileEvent::DismissRename);
        Ok(true)
    }

    pub async fn select_language(&self, name: &str) -> Result<()> {
        let mut profile = self.profile().await?;
        progress::select_language(&mut profile, name);
        self.repository.update(profile.clone()).await?;
        self.state.send(ProfileEvent::Loaded(profile));
        Ok(())
    }
}
