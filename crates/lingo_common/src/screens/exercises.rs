//! Exercise screen: one path node's set of vocabulary exercises.

use crate::catalog::Exercise;
use crate::config::ProfileSettings;
use crate::error::Result;
use crate::progress::{self, ProgressDelta};
use crate::state::StateContainer;
use crate::store::ProfileRepository;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect { expected: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseState {
    pub language: String,
    pub node: usize,
    pub exercises: Vec<Exercise>,
    pub index: usize,
    pub answer: String,
    pub feedback: Option<Feedback>,
    pub finished: bool,
    /// Set once progress for this set has been persisted
    pub recorded: bool,
    /// Replay of a completed node; finishing it credits nothing
    pub review: bool,
}

impl ExerciseState {
    pub fn current(&self) -> Option<&Exercise> {
        self.exercises.get(self.index)
    }

    fn is_last(&self) -> bool {
        self.index + 1 >= self.exercises.len()
    }
}

pub enum ExerciseEvent {
    AnswerInput(String),
    Submit,
    Next,
    Recorded,
}

pub fn reduce(state: &mut ExerciseState, event: ExerciseEvent) {
    match event {
        ExerciseEvent::AnswerInput(text) => {
            if !state.finished {
                state.answer = text;
            }
        }
        ExerciseEvent::Submit => {
            if state.finished || state.feedback == Some(Feedback::Correct) {
                return;
            }
            let Some(exercise) = state.current() else {
                state.finished = true;
                return;
            };
            if exercise.accepts(&state.answer) {
                state.feedback = Some(Feedback::Correct);
                if state.is_last() {
                    state.finished = true;
                }
            } else {
                state.feedback = Some(Feedback::Incorrect {
                    expected: exercise.expected().to_string(),
                });
            }
        }
        ExerciseEvent::Next => {
            if state.finished || state.feedback != Some(Feedback::Correct) {
                return;
            }
            state.index += 1;
            state.answer.clear();
            state.feedback = None;
        }
        ExerciseEvent::Recorded => state.recorded = true,
    }
}

pub struct ExerciseScreen {
    repository: ProfileRepository,
    defaults: ProfileSettings,
    state: StateContainer<ExerciseState, ExerciseEvent>,
}

impl ExerciseScreen {
    pub fn new(
        repository: ProfileRepository,
        defaults: ProfileSettings,
        language: &str,
        node: usize,
        exercises: Vec<Exercise>,
    ) -> Self {
        let finished = exercises.is_empty();
        let initial = ExerciseState {
            language: language.to_string(),
            node,
            exercises,
            index: 0,
            answer: String::new(),
            feedback: None,
            finished,
            recorded: false,
            review: false,
        };
        Self {
            repository,
            defaults,
            state: StateContainer::new(initial, reduce),
        }
    }

    /// Mark the set as a replay of a node that already counted
    pub fn into_review(self) -> Self {
        self.state.update(|s| s.review = true);
        self
    }

    pub fn state(&self) -> &StateContainer<ExerciseState, ExerciseEvent> {
        &self.state
    }

    pub fn answer_input(&self, text: impl Into<String>) {
        self.state.send(ExerciseEvent::AnswerInput(text.into()));
    }

    pub fn next(&self) {
        self.state.send(ExerciseEvent::Next);
    }

    /// Check the current answer. Finishing the set credits one exercise
    /// to the set's language and persists the profile; reviews credit nothing.
    pub async fn submit(&self) -> Result<Option<ProgressDelta>> {
        self.state.send(ExerciseEvent::Submit);

        let state = self.state.snapshot();
        if !state.finished || state.recorded || state.exercises.is_empty() {
            return Ok(None);
        }
        if state.review {
            info!("Reviewed node {} in {}", state.node, state.language);
            return Ok(None);
        }

        let mut profile = self
            .repository
            .load_or_create(&self.defaults.username, &self.defaults.language)
            .await?;
        let delta = progress::record_exercise(&mut profile, Some(&state.language));
        self.repository.update(profile).await?;
        self.state.send(ExerciseEvent::Recorded);

        info!(
            "Finished node {} in {} (+{} points)",
            state.node,
            delta.language,
            progress::EXERCISE_REWARD
        );
        Ok(Some(delta))
    }
}
