//! Translation lookup screen.

use crate::dispatch::dispatch;
use crate::error::{GatewayError, LingoError};
use crate::flags;
use crate::state::StateContainer;
use crate::translate::{self, Translation, TranslationGateway};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupState {
    pub text: String,
    pub target_language: String,
    pub target_flag: String,
    pub result: Option<Translation>,
    pub pending: bool,
    pub last_error: Option<String>,
}

impl LookupState {
    fn new(target_language: &str) -> Self {
        Self {
            text: String::new(),
            target_language: target_language.to_string(),
            target_flag: flags::language_flag(target_language),
            result: None,
            pending: false,
            last_error: None,
        }
    }
}

pub enum LookupEvent {
    TextInput(String),
    TargetSelected(String),
    Started,
    Translated(Translation),
    Failed(String),
}

pub fn reduce(state: &mut LookupState, event: LookupEvent) {
    match event {
        LookupEvent::TextInput(text) => state.text = text,
        LookupEvent::TargetSelected(name) => {
            state.target_flag = flags::language_flag(&name);
            state.target_language = name;
            state.result = None;
        }
        LookupEvent::Started => {
            state.pending = true;
            state.result = None;
            state.last_error = None;
        }
        LookupEvent::Translated(translation) => {
            state.pending = false;
            state.result = Some(translation);
        }
        LookupEvent::Failed(message) => {
            state.pending = false;
            state.last_error = Some(message);
        }
    }
}

pub struct LookupScreen {
    gateway: Option<Arc<dyn TranslationGateway>>,
    state: Arc<StateContainer<LookupState, LookupEvent>>,
}

impl LookupScreen {
    pub fn new(gateway: Option<Arc<dyn TranslationGateway>>, target_language: &str) -> Self {
        Self {
            gateway,
            state: Arc::new(StateContainer::new(LookupState::new(target_language), reduce)),
        }
    }

    pub fn state(&self) -> &StateContainer<LookupState, LookupEvent> {
        &self.state
    }

    pub fn is_available(&self) -> bool {
        self.gateway.is_some()
    }

    pub fn text_input(&self, text: impl Into<String>) {
        self.state.send(LookupEvent::TextInput(text.into()));
    }

    pub fn select_target(&self, language: impl Into<String>) {
        self.state.send(LookupEvent::TargetSelected(language.into()));
    }

    /// Translate the text field into the selected language in the background
    pub fn translate(&self) -> Option<JoinHandle<()>> {
        let snapshot = self.state.snapshot();
        let text = snapshot.text.trim().to_string();
        if text.is_empty() || snapshot.pending {
            return None;
        }

        let Some(code) = translate::target_code(&snapshot.target_language) else {
            self.state.send(LookupEvent::Failed(format!(
                "unknown language: {}",
                snapshot.target_language
            )));
            return None;
        };

        let Some(gateway) = self.gateway.clone() else {
            let err = GatewayError::Unavailable("translation".to_string());
            self.state.send(LookupEvent::Failed(err.to_string()));
            return None;
        };

        self.state.send(LookupEvent::Started);
        let state = Arc::clone(&self.state);
        Some(dispatch(
            async move {
                gateway
                    .translate(&text, code)
                    .await
                    .map_err(LingoError::from)
            },
            move |result| match result {
                Ok(translation) => state.send(LookupEvent::Translated(translation)),
                Err(e) => {
                    warn!("Translation failed: {}", e);
                    state.send(LookupEvent::Failed(e.to_string()));
                }
            },
        ))
    }
}
