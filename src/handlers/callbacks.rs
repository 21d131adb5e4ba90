use std::error::Error;

use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::bot_state::BotState;
use crate::localization::{self, Language};
use crate::models::{AwaitingInput, IntervalUnit};
use crate::handlers::utils::{
    make_interval_units_keyboard, make_language_keyboard, make_settings_keyboard,
};

pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    if let Some(data) = q.data.as_deref() {
        if let Some(ref message) = q.message {
            let chat_id = message.chat().id;
            let message_id = message.id();

            // Нет записи — чат не подписан, навигацию игнорируем
            if let Some(mut record) = state.load_record(chat_id).await? {
                let lang = record.config.lang;

                match data {
                    "time-interval" => {
                        bot.edit_message_text(
                            chat_id,
                            message_id,
                            localization::interval_menu_title(lang),
                        )
                        .reply_markup(make_interval_units_keyboard(lang))
                        .await?;
                    }

                    "interval-minutes" | "interval-hours" | "interval-days"
                    | "interval-months" => {
                        let unit = match data {
                            "interval-minutes" => IntervalUnit::Minutes,
                            "interval-hours" => IntervalUnit::Hours,
                            "interval-days" => IntervalUnit::Days,
                            _ => IntervalUnit::Months,
                        };

                        record.pending = Some(AwaitingInput::Interval(unit));
                        state.save_record(chat_id, &record).await?;

                        bot.edit_message_text(
                            chat_id,
                            message_id,
                            localization::interval_prompt(lang, record.config.interval, unit),
                        )
                        .parse_mode(ParseMode::MarkdownV2)
                        .await?;
                    }

                    "percent-change" => {
                        record.pending = Some(AwaitingInput::Percent);
                        state.save_record(chat_id, &record).await?;

                        bot.edit_message_text(
                            chat_id,
                            message_id,
                            localization::percent_prompt(lang, record.config.percent),
                        )
                        .parse_mode(ParseMode::MarkdownV2)
                        .await?;
                    }

                    "language" => {
                        bot.edit_message_text(
                            chat_id,
                            message_id,
                            localization::language_title(lang),
                        )
                        .reply_markup(make_language_keyboard())
                        .await?;
                    }

                    "lang-by" | "lang-ru" => {
                        record.config.lang = if data == "lang-ru" {
                            Language::Ru
                        } else {
                            Language::By
                        };
                        state.save_record(chat_id, &record).await?;

                        bot.edit_message_text(
                            chat_id,
                            message_id,
                            localization::settings_title(record.config.lang, record.coins.len()),
                        )
                        .parse_mode(ParseMode::MarkdownV2)
                        .reply_markup(make_settings_keyboard(&record.config))
                        .await?;
                    }

                    "back" => {
                        // Возврат в настройки сбрасывает ожидание ввода
                        record.pending = None;
                        state.save_record(chat_id, &record).await?;

                        bot.edit_message_text(
                            chat_id,
                            message_id,
                            localization::settings_title(lang, record.coins.len()),
                        )
                        .parse_mode(ParseMode::MarkdownV2)
                        .reply_markup(make_settings_keyboard(&record.config))
                        .await?;
                    }

                    _ => {}
                }
            }
        }

        bot.answer_callback_query(q.id.clone()).await?;
    }

    Ok(())
}
