use serde::{Deserialize, Serialize};

use crate::localization::Language;

/// Границы процента изменения цены
pub const PERCENT_BOUNDS: (u32, u32) = (1, 100);

/// Единица временного интервала опроса цен
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    Minutes,
    Hours,
    Days,
    Months,
}

impl IntervalUnit {
    /// Допустимые значения интервала для каждой единицы
    pub fn bounds(self) -> (u32, u32) {
        match self {
            IntervalUnit::Minutes => (5, 30),
            IntervalUnit::Hours => (1, 12),
            IntervalUnit::Days => (1, 31),
            IntervalUnit::Months => (1, 12),
        }
    }

    pub fn contains(self, value: u32) -> bool {
        let (min, max) = self.bounds();
        (min..=max).contains(&value)
    }
}

/// Временной интервал: единица + значение
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub unit: IntervalUnit,
    pub value: u32,
}

impl TimeInterval {
    pub fn minutes(value: u32) -> Self {
        Self {
            unit: IntervalUnit::Minutes,
            value,
        }
    }
}

/// Конфигурация одного чата
///
/// `cron_job_id` — идентификатор задания во внешнем планировщике,
/// создаётся/обновляется/удаляется вместе с изменениями percent/interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub percent: u32,
    pub interval: TimeInterval,
    pub lang: Language,
    pub cron_job_id: Option<i64>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            percent: 20,
            interval: TimeInterval::minutes(15),
            lang: Language::By,
            cron_job_id: None,
        }
    }
}
