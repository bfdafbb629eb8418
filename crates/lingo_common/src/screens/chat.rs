//! Chat screen: conversation with the AI tutor.

use crate::chat::{ChatGateway, ChatRole, ChatTurn};
use crate::dispatch::dispatch;
use crate::error::{GatewayError, LingoError};
use crate::state::StateContainer;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatState {
    pub turns: Vec<ChatTurn>,
    pub input: String,
    pub pending: bool,
    pub last_error: Option<String>,
}

pub enum ChatEvent {
    Input(String),
    /// The input field was sent as a user turn
    Submitted,
    Replied(String),
    Failed(String),
    ClearError,
}

pub fn reduce(state: &mut ChatState, event: ChatEvent) {
    match event {
        ChatEvent::Input(text) => state.input = text,
        ChatEvent::Submitted => {
            let text = std::mem::take(&mut state.input);
            state.turns.push(ChatTurn::user(text.trim()));
            state.pending = true;
            state.last_error = None;
        }
        ChatEvent::Replied(text) => {
            state.turns.push(ChatTurn::tutor(text));
            state.pending = false;
        }
        ChatEvent::Failed(message) => {
            // The unanswered turn goes back to the input so history keeps alternating
            if state.turns.last().map(|t| t.role) == Some(ChatRole::User) {
                if let Some(turn) = state.turns.pop() {
                    if state.input.trim().is_empty() {
                        state.input = turn.text;
                    }
                }
            }
            state.pending = false;
            state.last_error = Some(message);
        }
        ChatEvent::ClearError => state.last_error = None,
    }
}

pub struct ChatScreen {
    gateway: Option<Arc<dyn ChatGateway>>,
    state: Arc<StateContainer<ChatState, ChatEvent>>,
}

impl ChatScreen {
    pub fn new(gateway: Option<Arc<dyn ChatGateway>>) -> Self {
        Self {
            gateway,
            state: Arc::new(StateContainer::new(ChatState::default(), reduce)),
        }
    }

    pub fn state(&self) -> &StateContainer<ChatState, ChatEvent> {
        &self.state
    }

    pub fn is_available(&self) -> bool {
        self.gateway.is_some()
    }

    pub fn input(&self, text: impl Into<String>) {
        self.state.send(ChatEvent::Input(text.into()));
    }

    /// Send the input field to the tutor in the background.
    ///
    /// Returns `None` when there was nothing to send or a reply is still
    /// pending. The reply (or failure) arrives as a state update.
    pub fn send(&self) -> Option<JoinHandle<()>> {
        let snapshot = self.state.snapshot();
        let input = snapshot.input.trim().to_string();
        if input.is_empty() || snapshot.pending {
            return None;
        }

        let history = snapshot.turns;
        self.state.send(ChatEvent::Submitted);

        let Some(gateway) = self.gateway.clone() else {
            let err = GatewayError::Unavailable("chat".to_string());
            self.state.send(ChatEvent::Failed(err.to_string()));
            return None;
        };

        let state = Arc::clone(&self.state);
        Some(dispatch(
            async move {
                gateway
                    .send(&history, &input)
                    .await
                    .map_err(LingoError::from)
            },
            move |result| match result {
                Ok(reply) => state.send(ChatEvent::Replied(reply)),
                Err(e) => {
                    warn!("Chat request failed: {}", e);
                    state.send(ChatEvent::Failed(e.to_string()));
                }
            },
        ))
    }

    pub fn clear_error(&self) {
        self.state.send(ChatEvent::ClearError);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::FakeChatGateway;

    #[tokio::test]
    async fn test_reply_is_appended() {
        let fake = Arc::new(FakeChatGateway::always("¡Muy bien!"));
        let screen = ChatScreen::new(Some(fake.clone()));

        screen.input("Hola, ¿cómo estás?");
        let handle = screen.send().unwrap();
        assert!(screen.state().snapshot().pending);
        handle.await.unwrap();

        let state = screen.state().snapshot();
        assert!(!state.pending);
        assert_eq!(state.turns.len(), 2);
        assert_eq!(state.turns[0].role, ChatRole::User);
        assert_eq!(state.turns[1].text, "¡Muy bien!");
        assert!(state.input.is_empty());
        assert_eq!(fake.inputs(), vec!["Hola, ¿cómo estás?"]);
    }

    #[tokio::test]
    async fn test_failure_returns_turn_to_input() {
        let fake = Arc::new(FakeChatGateway::failing(GatewayError::UnexpectedStatus {
            status: 500,
            message: "oops".into(),
        }));
        let screen = ChatScreen::new(Some(fake));

        screen.input("hello");
        screen.send().unwrap().await.unwrap();

        let state = screen.state().snapshot();
        assert!(state.turns.is_empty());
        assert_eq!(state.input, "hello");
        assert!(!state.pending);
        assert_eq!(
            state.last_error.as_deref(),
            Some("unexpected status code 500: oops")
        );

        screen.clear_error();
        assert!(screen.state().snapshot().last_error.is_none());
    }

    #[tokio::test]
    async fn test_retry_after_failure_alternates_roles() {
        let fake = Arc::new(FakeChatGateway::new(vec![
            Ok("Hallo!".to_string()),
            Err(GatewayError::RequestFailed("connection reset".into())),
            Ok("Gut, und dir?".to_string()),
        ]));
        let screen = ChatScreen::new(Some(fake.clone()));

        screen.input("Hallo");
        screen.send().unwrap().await.unwrap();
        screen.input("Wie geht's?");
        screen.send().unwrap().await.unwrap();
        assert!(screen.state().snapshot().last_error.is_some());

        // The failed text is still in the input field
        screen.send().unwrap().await.unwrap();

        let histories = fake.histories();
        assert_eq!(histories.len(), 3);
        assert_eq!(histories[2], vec![ChatRole::User, ChatRole::Tutor]);
        assert_eq!(fake.inputs()[2], "Wie geht's?");

        let state = screen.state().snapshot();
        let roles: Vec<ChatRole> = state.turns.iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![ChatRole::User, ChatRole::Tutor, ChatRole::User, ChatRole::Tutor]
        );
        assert!(state.last_error.is_none());
    }

    #[tokio::test]
    async fn test_empty_input_is_ignored() {
        let screen = ChatScreen::new(Some(Arc::new(FakeChatGateway::always("x"))));
        screen.input("   ");
        assert!(screen.send().is_none());
        assert!(screen.state().snapshot().turns.is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_gateway_reports_error() {
        let screen = ChatScreen::new(None);
        assert!(!screen.is_available());
        screen.input("hello");
        assert!(screen.send().is_none());

        let state = screen.state().snapshot();
        assert_eq!(state.last_error.as_deref(), Some("chat is not configured"));
        assert!(!state.pending);
        assert!(state.turns.is_empty());
        assert_eq!(state.input, "hello");
    }
}
