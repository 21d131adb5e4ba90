use std::env;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, Timelike, Utc};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::Deserialize;
use serde_json::json;
use teloxide::types::ChatId;

use crate::models::{ChatConfig, IntervalUnit, TimeInterval};

const ENDPOINT: &str = "https://api.cron-job.org";
const RETRIES: u32 = 1;
const CRON_API_KEY_ENV: &str = "CRON_API_KEY";
const PUBLIC_BASE_URL_ENV: &str = "PUBLIC_BASE_URL";

/// Пятипольное cron-выражение для интервала
///
/// Кадансы крупнее минут якорятся на момент создания/обновления
/// задания: час/день/месяц расписания наследуют текущие минуту,
/// час и день.
pub fn cron_expression(interval: TimeInterval, now: DateTime<Utc>) -> String {
    let value = interval.value;
    match interval.unit {
        IntervalUnit::Minutes => format!("*/{value} * * * *"),
        IntervalUnit::Hours => format!("{} */{value} * * *", now.minute()),
        IntervalUnit::Days => format!("{} {} */{value} * *", now.minute(), now.hour()),
        IntervalUnit::Months => {
            format!("{} {} {} */{value} *", now.minute(), now.hour(), now.day())
        }
    }
}

/// Раскрытые поля расписания для API планировщика
///
/// `[-1]` означает «любое значение»; шаговые поля перечисляются явно.
fn schedule_fields(
    interval: TimeInterval,
    now: DateTime<Utc>,
) -> (Vec<i64>, Vec<i64>, Vec<i64>, Vec<i64>) {
    let step_from = |start: u32, end: u32| -> Vec<i64> {
        (start..=end)
            .step_by(interval.value.max(1) as usize)
            .map(i64::from)
            .collect()
    };
    let minute = i64::from(now.minute());
    let hour = i64::from(now.hour());
    let day = i64::from(now.day());

    match interval.unit {
        IntervalUnit::Minutes => (step_from(0, 59), vec![-1], vec![-1], vec![-1]),
        IntervalUnit::Hours => (vec![minute], step_from(0, 23), vec![-1], vec![-1]),
        IntervalUnit::Days => (vec![minute], vec![hour], step_from(1, 31), vec![-1]),
        IntervalUnit::Months => (vec![minute], vec![hour], vec![day], step_from(1, 12)),
    }
}

/// Клиент внешнего планировщика cron-job.org
#[derive(Clone)]
pub struct CronClient {
    api_key: String,
    callback_url: String,
    client: ClientWithMiddleware,
}

#[derive(Debug, Deserialize)]
struct CreatedJob {
    #[serde(rename = "jobId")]
    job_id: i64,
}

impl CronClient {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(CRON_API_KEY_ENV)?;
        let base_url = env::var(PUBLIC_BASE_URL_ENV)?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(RETRIES);
        let client = ClientBuilder::new(Client::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            api_key,
            callback_url: format!("{}/trigger", base_url.trim_end_matches('/')),
            client,
        })
    }

    fn job_body(&self, chat_id: ChatId, interval: TimeInterval, percent: u32) -> serde_json::Value {
        let (minutes, hours, mdays, months) = schedule_fields(interval, Utc::now());

        json!({
            "job": {
                "url": self.callback_url,
                "requestMethod": 1,
                "enabled": true,
                "schedule": {
                    "timezone": "Europe/Minsk",
                    "expiresAt": 0,
                    "minutes": minutes,
                    "hours": hours,
                    "mdays": mdays,
                    "months": months,
                    "wdays": [-1]
                },
                "extendedData": {
                    "body": json!({ "chatId": chat_id.0, "percent": percent }).to_string()
                }
            }
        })
    }

    pub async fn create_job(
        &self,
        chat_id: ChatId,
        interval: TimeInterval,
        percent: u32,
    ) -> Result<i64> {
        let response = self
            .client
            .put(format!("{ENDPOINT}/jobs"))
            .bearer_auth(&self.api_key)
            .json(&self.job_body(chat_id, interval, percent))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("create job failed: {}", response.status()));
        }

        let created: CreatedJob = response.json().await?;
        Ok(created.job_id)
    }

    pub async fn update_job(
        &self,
        job_id: i64,
        chat_id: ChatId,
        interval: TimeInterval,
        percent: u32,
    ) -> Result<bool> {
        let response = self
            .client
            .patch(format!("{ENDPOINT}/jobs/{job_id}"))
            .bearer_auth(&self.api_key)
            .json(&self.job_body(chat_id, interval, percent))
            .send()
            .await?;

        Ok(response.status().is_success())
    }

    pub async fn delete_job(&self, job_id: i64) -> Result<bool> {
        let response = self
            .client
            .delete(format!("{ENDPOINT}/jobs/{job_id}"))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        Ok(response.status().is_success())
    }

    /// Синхронизация внешнего расписания с конфигурацией чата
    ///
    /// Обновляет существующее задание, иначе создаёт новое и записывает
    /// его id в конфигурацию. Ошибка планировщика логируется, настройки
    /// применяются локально в любом случае.
    pub async fn sync_job(&self, chat_id: ChatId, config: &mut ChatConfig) {
        let result = match config.cron_job_id {
            Some(job_id) => {
                match self
                    .update_job(job_id, chat_id, config.interval, config.percent)
                    .await
                {
                    Ok(true) => Ok(()),
                    Ok(false) => Err(anyhow!("update rejected for job {job_id}")),
                    Err(e) => Err(e),
                }
            }
            None => match self.create_job(chat_id, config.interval, config.percent).await {
                Ok(job_id) => {
                    config.cron_job_id = Some(job_id);
                    Ok(())
                }
                Err(e) => Err(e),
            },
        };

        match result {
            Ok(()) => log::info!(
                "⏰ Schedule synced for chat {}: {}",
                chat_id,
                cron_expression(config.interval, Utc::now())
            ),
            Err(e) => log::error!("[ Cron Job ] sync failed for chat {}: {}", chat_id, e),
        }
    }

    /// Удаление задания при отписке/сбросе; отсутствие задания — no-op
    pub async fn remove_job(&self, chat_id: ChatId, config: &ChatConfig) {
        let Some(job_id) = config.cron_job_id else {
            return;
        };

        match self.delete_job(job_id).await {
            Ok(true) => log::info!("🗑️ Schedule job {} deleted for chat {}", job_id, chat_id),
            Ok(false) => log::error!("[ Cron Job ] delete rejected for job {job_id}"),
            Err(e) => log::error!("[ Cron Job ] delete failed for job {job_id}: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 14, 37, 0).unwrap()
    }

    #[test]
    fn minute_interval_needs_no_anchor() {
        let interval = TimeInterval {
            unit: IntervalUnit::Minutes,
            value: 15,
        };
        assert_eq!(cron_expression(interval, anchor()), "*/15 * * * *");
    }

    #[test]
    fn hour_interval_is_anchored_to_current_minute() {
        let interval = TimeInterval {
            unit: IntervalUnit::Hours,
            value: 3,
        };
        assert_eq!(cron_expression(interval, anchor()), "37 */3 * * *");
    }

    #[test]
    fn day_interval_is_anchored_to_current_time() {
        let interval = TimeInterval {
            unit: IntervalUnit::Days,
            value: 2,
        };
        assert_eq!(cron_expression(interval, anchor()), "37 14 */2 * *");
    }

    #[test]
    fn month_interval_is_anchored_to_current_day() {
        let interval = TimeInterval {
            unit: IntervalUnit::Months,
            value: 6,
        };
        assert_eq!(cron_expression(interval, anchor()), "37 14 17 */6 *");
    }

    #[test]
    fn minute_schedule_expands_to_step_list() {
        let interval = TimeInterval {
            unit: IntervalUnit::Minutes,
            value: 15,
        };
        let (minutes, hours, mdays, months) = schedule_fields(interval, anchor());
        assert_eq!(minutes, vec![0, 15, 30, 45]);
        assert_eq!(hours, vec![-1]);
        assert_eq!(mdays, vec![-1]);
        assert_eq!(months, vec![-1]);
    }

    #[test]
    fn month_schedule_pins_minute_hour_and_day() {
        let interval = TimeInterval {
            unit: IntervalUnit::Months,
            value: 3,
        };
        let (minutes, hours, mdays, months) = schedule_fields(interval, anchor());
        assert_eq!(minutes, vec![37]);
        assert_eq!(hours, vec![14]);
        assert_eq!(mdays, vec![17]);
        assert_eq!(months, vec![1, 4, 7, 10]);
    }
}
