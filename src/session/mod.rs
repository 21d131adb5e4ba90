use reqwest::{Client, StatusCode};
use teloxide::types::ChatId;

use crate::bot_state::StateError;

/// Уровень сжатия zstd для записей
const ZSTD_LEVEL: i32 = 3;

/// Клиент внешнего key-value хранилища сессий
///
/// Записи сжимаются zstd перед отправкой и распаковываются при чтении:
/// у хранилища есть лимит на размер поля. Ядро бота сжатых байтов
/// не видит.
#[derive(Clone, Debug)]
pub struct SessionStore {
    base_url: String,
    client: Client,
}

impl SessionStore {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn record_url(&self, chat_id: ChatId) -> String {
        format!("{}/sessions/{}", self.base_url, chat_id.0)
    }

    pub async fn load(&self, chat_id: ChatId) -> Result<Option<Vec<u8>>, StateError> {
        let response = self.client.get(self.record_url(chat_id)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(StateError::Status(response.status()));
        }

        let compressed = response.bytes().await?;
        let raw = zstd::decode_all(compressed.as_ref())?;
        Ok(Some(raw))
    }

    pub async fn save(&self, chat_id: ChatId, raw: &[u8]) -> Result<(), StateError> {
        let compressed = zstd::encode_all(raw, ZSTD_LEVEL)?;

        let response = self
            .client
            .put(self.record_url(chat_id))
            .body(compressed)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StateError::Status(response.status()));
        }
        Ok(())
    }

    pub async fn delete(&self, chat_id: ChatId) -> Result<(), StateError> {
        let response = self.client.delete(self.record_url(chat_id)).send().await?;

        // Удаление отсутствующей записи не ошибка
        if !response.status().is_success() && response.status() != StatusCode::NOT_FOUND {
            return Err(StateError::Status(response.status()));
        }
        Ok(())
    }
}
