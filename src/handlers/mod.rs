pub mod callbacks;
pub mod commands;
pub mod messages;
pub mod utils;

pub use callbacks::callback_handler;
pub use commands::command_handler;
pub use messages::message_handler;

use std::error::Error;

use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::bot_state::BotState;
use crate::handlers::utils::build_notification;
use crate::market;
use crate::tracker;

/// Плановый цикл проверки цен одного чата
///
/// Вызывается внешним планировщиком. Неудачный запрос цен пропускает
/// цикл, не трогая отслеженные значения; `percent` из полезной нагрузки
/// задания имеет приоритет над сохранённым порогом.
pub async fn run_price_check(
    bot: &Bot,
    state: &BotState,
    chat_id: ChatId,
    percent: Option<u32>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let Some(mut record) = state.load_record(chat_id).await? else {
        // Чат не подписан
        return Ok(());
    };

    if record.coins.is_empty() {
        match market::fetch_coin_list().await {
            Ok(coins) => record.coins = coins,
            Err(e) => log::error!("[ Get Coins Error ] {e}"),
        }
    }

    match market::fetch_prices(&record.coins).await {
        Ok(fresh) => tracker::update_prices(&mut record.prices, &fresh),
        Err(e) => {
            log::error!("[ Get Coin Prices Error ] {e}");
            state.save_record(chat_id, &record).await?;
            return Ok(());
        }
    }

    let threshold = percent.unwrap_or(record.config.percent);
    let crossings = tracker::evaluate(&record.prices, threshold);

    log::debug!(
        "🔎 Chat {}: {} of {} coins crossed {}%",
        chat_id,
        crossings.len(),
        record.prices.len(),
        threshold
    );

    if let Some(text) = build_notification(record.config.lang, &crossings, record.config.interval)
    {
        bot.send_message(chat_id, text)
            .parse_mode(ParseMode::MarkdownV2)
            .await?;
    }

    state.save_record(chat_id, &record).await?;
    Ok(())
}
