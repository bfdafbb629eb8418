//! Path screen: the gamified sequence of exercise nodes.
//!
//! Node `i` is unlocked once `i` exercises have been completed in the
//! current language, and completed once more than `i` have.

use crate::catalog;
use crate::config::ProfileSettings;
use crate::error::{LingoError, Result};
use crate::models::UserProfile;
use crate::screens::exercises::ExerciseScreen;
use crate::screens::load_for_day;
use crate::state::StateContainer;
use crate::store::ProfileRepository;
use chrono::{Local, NaiveDate};

/// Nodes shown per language
pub const PATH_LENGTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    Completed,
    Unlocked,
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathNode {
    pub index: usize,
    pub status: NodeStatus,
}

pub fn node_status(index: usize, exercises_done: u32) -> NodeStatus {
    let done = exercises_done as usize;
    if index < done {
        NodeStatus::Completed
    } else if index == done {
        NodeStatus::Unlocked
    } else {
        NodeStatus::Locked
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathState {
    pub language: String,
    pub flag: String,
    pub weekly_points: u32,
    pub nodes: Vec<PathNode>,
}

pub enum PathEvent {
    Loaded(UserProfile),
}

pub fn reduce(state: &mut PathState, event: PathEvent) {
    match event {
        PathEvent::Loaded(profile) => {
            let current = profile.current_progress();
            state.language = current.name.clone();
            state.flag = current.flag();
            state.weekly_points = profile.weekly_points;
            state.nodes = (0..PATH_LENGTH)
                .map(|index| PathNode {
                    index,
                    status: node_status(index, current.exercises_done),
                })
                .collect();
        }
    }
}

pub struct PathScreen {
    repository: ProfileRepository,
    defaults: ProfileSettings,
    state: StateContainer<PathState, PathEvent>,
}

impl PathScreen {
    pub fn new(repository: ProfileRepository, defaults: ProfileSettings) -> Self {
        Self {
            repository,
            defaults,
            state: StateContainer::new(PathState::default(), reduce),
        }
    }

    pub fn state(&self) -> &StateContainer<PathState, PathEvent> {
        &self.state
    }

    pub async fn load(&self) -> Result<()> {
        self.load_on(Local::now().date_naive()).await
    }

    /// Load for a given day; rolls the weekly counter when a new week began
    pub async fn load_on(&self, today: NaiveDate) -> Result<()> {
        let profile = load_for_day(&self.repository, &self.defaults, today).await?;
        self.state.send(PathEvent::Loaded(profile));
        Ok(())
    }

    /// Start the exercise set behind node `index`
    pub fn open(&self, index: usize) -> Result<ExerciseScreen> {
        let state = self.state.snapshot();
        let node = state
            .nodes
            .get(index)
            .ok_or(LingoError::Locked(index))?;
        if node.status == NodeStatus::Locked {
            return Err(LingoError::Locked(index));
        }

        let exercises = catalog::exercise_set(&state.language, index)
            .ok_or_else(|| LingoError::NoExercises(state.language.clone()))?;
        let screen = ExerciseScreen::new(
            self.repository.clone(),
            self.defaults.clone(),
            &state.language,
            index,
            exercises,
        );
        Ok(if node.status == NodeStatus::Completed {
            screen.into_review()
        } else {
            screen
        })
    }

    /// First unlocked node, if any remain on the path
    pub fn next_node(&self) -> Option<usize> {
        self.state
            .snapshot()
            .nodes
            .iter()
            .find(|n| n.status == NodeStatus::Unlocked)
            .map(|n| n.index)
    }
}
