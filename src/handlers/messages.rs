use std::error::Error;

use teloxide::prelude::*;

use crate::bot_state::BotState;
use crate::cron::CronClient;
use crate::handlers::utils::make_back_keyboard;
use crate::localization;
use crate::models::{AwaitingInput, ChatRecord, TimeInterval, PERCENT_BOUNDS};

/// Исход обработки свободного ввода
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Ввод не ожидался
    Idle,
    NotANumber,
    OutOfBounds { min: u32, max: u32 },
    Applied,
}

/// Переход автомата настроек: (ожидание, ввод) -> (новое ожидание, исход)
///
/// Невалидный ввод не меняет ни конфигурацию, ни ожидание — пользователь
/// может повторить. Валидный ввод применяется и сбрасывает ожидание.
pub fn apply_pending_input(record: &mut ChatRecord, text: &str) -> InputOutcome {
    let Some(pending) = record.pending else {
        return InputOutcome::Idle;
    };

    let Ok(value) = text.trim().parse::<i64>() else {
        return InputOutcome::NotANumber;
    };

    match pending {
        AwaitingInput::Percent => {
            let (min, max) = PERCENT_BOUNDS;
            match u32::try_from(value) {
                Ok(percent) if (min..=max).contains(&percent) => {
                    record.config.percent = percent;
                }
                _ => return InputOutcome::OutOfBounds { min, max },
            }
        }
        AwaitingInput::Interval(unit) => {
            let (min, max) = unit.bounds();
            match u32::try_from(value) {
                Ok(interval_value) if unit.contains(interval_value) => {
                    record.config.interval = TimeInterval {
                        unit,
                        value: interval_value,
                    };
                }
                _ => return InputOutcome::OutOfBounds { min, max },
            }
        }
    }

    record.pending = None;
    InputOutcome::Applied
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    state: BotState,
    cron: CronClient,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    // Команды обрабатываются отдельной веткой
    if text.starts_with('/') {
        return Ok(());
    }

    let chat_id = msg.chat.id;
    let Some(mut record) = state.load_record(chat_id).await? else {
        return Ok(());
    };
    let lang = record.config.lang;

    match apply_pending_input(&mut record, text) {
        InputOutcome::Idle => {}
        InputOutcome::NotANumber => {
            bot.send_message(chat_id, localization::not_a_number(lang))
                .await?;
        }
        InputOutcome::OutOfBounds { min, max } => {
            bot.send_message(chat_id, localization::out_of_bounds(lang, min, max))
                .await?;
        }
        InputOutcome::Applied => {
            cron.sync_job(chat_id, &mut record.config).await;
            state.save_record(chat_id, &record).await?;

            bot.send_message(chat_id, localization::updated(lang))
                .reply_markup(make_back_keyboard())
                .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IntervalUnit;

    fn awaiting(pending: AwaitingInput) -> ChatRecord {
        ChatRecord {
            pending: Some(pending),
            ..ChatRecord::default()
        }
    }

    #[test]
    fn text_without_pending_state_is_ignored() {
        let mut record = ChatRecord::default();
        assert_eq!(apply_pending_input(&mut record, "25"), InputOutcome::Idle);
        assert_eq!(record.config.percent, 20);
    }

    #[test]
    fn non_numeric_input_keeps_state_and_config() {
        let mut record = awaiting(AwaitingInput::Percent);

        assert_eq!(
            apply_pending_input(&mut record, "abc"),
            InputOutcome::NotANumber
        );
        assert_eq!(record.pending, Some(AwaitingInput::Percent));
        assert_eq!(record.config.percent, 20);
    }

    #[test]
    fn out_of_bounds_percent_keeps_state() {
        let mut record = awaiting(AwaitingInput::Percent);

        assert_eq!(
            apply_pending_input(&mut record, "0"),
            InputOutcome::OutOfBounds { min: 1, max: 100 }
        );
        assert_eq!(
            apply_pending_input(&mut record, "101"),
            InputOutcome::OutOfBounds { min: 1, max: 100 }
        );
        assert_eq!(record.pending, Some(AwaitingInput::Percent));
        assert_eq!(record.config.percent, 20);
    }

    #[test]
    fn negative_input_is_out_of_bounds_not_a_crash() {
        let mut record = awaiting(AwaitingInput::Interval(IntervalUnit::Minutes));

        assert_eq!(
            apply_pending_input(&mut record, "-5"),
            InputOutcome::OutOfBounds { min: 5, max: 30 }
        );
        assert_eq!(
            record.pending,
            Some(AwaitingInput::Interval(IntervalUnit::Minutes))
        );
    }

    #[test]
    fn valid_percent_is_applied_and_clears_state() {
        let mut record = awaiting(AwaitingInput::Percent);

        assert_eq!(apply_pending_input(&mut record, "35"), InputOutcome::Applied);
        assert_eq!(record.config.percent, 35);
        assert_eq!(record.pending, None);
    }

    #[test]
    fn minute_interval_bounds_match_the_table() {
        for (input, expected) in [
            ("4", InputOutcome::OutOfBounds { min: 5, max: 30 }),
            ("5", InputOutcome::Applied),
        ] {
            let mut record = awaiting(AwaitingInput::Interval(IntervalUnit::Minutes));
            assert_eq!(apply_pending_input(&mut record, input), expected);
        }

        for (input, expected) in [
            ("30", InputOutcome::Applied),
            ("31", InputOutcome::OutOfBounds { min: 5, max: 30 }),
        ] {
            let mut record = awaiting(AwaitingInput::Interval(IntervalUnit::Minutes));
            assert_eq!(apply_pending_input(&mut record, input), expected);
        }
    }

    #[test]
    fn valid_interval_sets_unit_and_value() {
        let mut record = awaiting(AwaitingInput::Interval(IntervalUnit::Hours));

        assert_eq!(apply_pending_input(&mut record, "6"), InputOutcome::Applied);
        assert_eq!(record.config.interval.unit, IntervalUnit::Hours);
        assert_eq!(record.config.interval.value, 6);
        assert_eq!(record.pending, None);
    }
}
