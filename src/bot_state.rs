use std::time::Instant;

use teloxide::types::ChatId;
use thiserror::Error;

use crate::models::ChatRecord;
use crate::session::SessionStore;

/// Лимит сериализованной записи до сжатия
const MAX_RECORD_BYTES: usize = 512 * 1024;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("session store request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("session store returned {0}")]
    Status(reqwest::StatusCode),
    #[error("compression error: {0}")]
    Compression(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("record too large: {0} bytes")]
    RecordTooLarge(usize),
}

/// Доступ к записям чатов во внешнем хранилище
///
/// Хранилище — единственная точка синхронизации: каждая операция
/// читает запись целиком и пишет целиком, конфликт решается
/// последней записью.
#[derive(Clone)]
pub struct BotState {
    store: SessionStore,
}

impl BotState {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }

    /// Отсутствие записи означает, что чат не подписан
    pub async fn load_record(&self, chat_id: ChatId) -> Result<Option<ChatRecord>, StateError> {
        let Some(raw) = self.store.load(chat_id).await? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(&raw)?))
    }

    pub async fn save_record(&self, chat_id: ChatId, record: &ChatRecord) -> Result<(), StateError> {
        let start_time = Instant::now();

        let raw = serde_json::to_vec(record)?;
        if raw.len() > MAX_RECORD_BYTES {
            return Err(StateError::RecordTooLarge(raw.len()));
        }

        self.store.save(chat_id, &raw).await?;

        log::debug!(
            "💾 Record saved for chat {} ({} bytes) in {:?}",
            chat_id,
            raw.len(),
            start_time.elapsed()
        );
        Ok(())
    }

    pub async fn delete_record(&self, chat_id: ChatId) -> Result<(), StateError> {
        self.store.delete(chat_id).await?;
        log::debug!("🗑️ Record deleted for chat {}", chat_id);
        Ok(())
    }
}
