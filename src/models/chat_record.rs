use serde::{Deserialize, Serialize};

use super::chat_config::{ChatConfig, IntervalUnit};
use crate::tracker::TrackedPrices;

/// Какой свободный ввод ожидается от пользователя
///
/// Состояние живёт до валидного ввода, перевыбора категории
/// или возврата в меню настроек.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AwaitingInput {
    Percent,
    Interval(IntervalUnit),
}

/// Полная запись чата во внешнем хранилище сессий
///
/// Каждая точка входа читает запись целиком, меняет и пишет обратно.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRecord {
    pub config: ChatConfig,
    pub coins: Vec<String>,
    pub prices: TrackedPrices,
    pub pending: Option<AwaitingInput>,
}
