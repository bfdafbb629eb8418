//! Application context: everything a screen might need, built once at startup.

use crate::chat::{ChatGateway, GeminiChatClient};
use crate::config::LingoConfig;
use crate::error::Result;
use crate::screens::{ChatScreen, LookupScreen, PathScreen, ProfileScreen};
use crate::secrets::Secrets;
use crate::store::{ProfileRepository, ProfileStore};
use crate::translate::{DeepLClient, TranslationGateway};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppContext {
    pub config: LingoConfig,
    pub repository: ProfileRepository,
    pub chat: Option<Arc<dyn ChatGateway>>,
    pub translation: Option<Arc<dyn TranslationGateway>>,
}

impl AppContext {
    /// Open the store and set up whichever gateways have credentials
    pub fn build(config: LingoConfig) -> Result<Self> {
        let store = ProfileStore::open(&config.storage.effective_db_path())?;
        let secrets = Secrets::load(&config.secrets);

        let chat: Option<Arc<dyn ChatGateway>> =
            match GeminiChatClient::from_config(&config.chat, secrets.chat_api_key.as_deref()) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    warn!("Tutor chat unavailable: {}", e);
                    None
                }
            };

        let translation: Option<Arc<dyn TranslationGateway>> = match DeepLClient::from_config(
            &config.translation,
            secrets.translation_api_key.as_deref(),
        ) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                warn!("Translation lookup unavailable: {}", e);
                None
            }
        };

        info!(
            "App ready (chat: {}, translation: {})",
            chat.is_some(),
            translation.is_some()
        );

        Ok(Self::with_parts(
            config,
            ProfileRepository::new(store),
            chat,
            translation,
        ))
    }

    pub fn with_parts(
        config: LingoConfig,
        repository: ProfileRepository,
        chat: Option<Arc<dyn ChatGateway>>,
        translation: Option<Arc<dyn TranslationGateway>>,
    ) -> Self {
        Self {
            config,
            repository,
            chat,
            translation,
        }
    }

    pub fn profile_screen(&self) -> ProfileScreen {
        ProfileScreen::new(self.repository.clone(), self.config.profile.clone())
    }

    pub fn path_screen(&self) -> PathScreen {
        PathScreen::new(self.repository.clone(), self.config.profile.clone())
    }

    pub fn chat_screen(&self) -> ChatScreen {
        ChatScreen::new(self.chat.clone())
    }

    pub fn lookup_screen(&self, target_language: &str) -> LookupScreen {
        LookupScreen::new(self.translation.clone(), target_language)
    }
}
