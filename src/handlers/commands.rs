use std::error::Error;

use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::bot_state::BotState;
use crate::cron::CronClient;
use crate::handlers::utils::{escape_markdown_v2, make_settings_keyboard};
use crate::localization::{self, Language};
use crate::market;
use crate::models::ChatRecord;
use crate::Command;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: BotState,
    cron: CronClient,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match cmd {
        Command::Start => handle_start(bot, msg, state, cron).await?,
        Command::Stop => handle_stop(bot, msg, state, cron).await?,
        Command::Reset => handle_reset(bot, msg, state, cron).await?,
        Command::Settings => handle_settings(bot, msg, state).await?,
        Command::Help => handle_help(bot, msg, state).await?,
    }
    Ok(())
}

/// Создание записи с настройками по умолчанию и заданием в планировщике
async fn subscribe(
    chat_id: ChatId,
    state: &BotState,
    cron: &CronClient,
) -> Result<ChatRecord, Box<dyn Error + Send + Sync>> {
    let mut record = ChatRecord::default();

    match market::fetch_coin_list().await {
        Ok(coins) => record.coins = coins,
        // Список добьём при первом плановом цикле
        Err(e) => log::error!("[ Get Coins Error ] {e}"),
    }

    cron.sync_job(chat_id, &mut record.config).await;
    state.save_record(chat_id, &record).await?;

    log::info!("✅ Chat {} subscribed ({} coins)", chat_id, record.coins.len());
    Ok(record)
}

async fn handle_start(
    bot: Bot,
    msg: Message,
    state: BotState,
    cron: CronClient,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let chat_id = msg.chat.id;

    // Повторный /start перезаписывает запись настройками по умолчанию,
    // старое задание планировщика убираем
    if let Some(old) = state.load_record(chat_id).await? {
        cron.remove_job(chat_id, &old.config).await;
    }

    subscribe(chat_id, &state, &cron).await?;

    let user_name = msg
        .from
        .as_ref()
        .map(|user| user.first_name.as_str())
        .unwrap_or("Пользователь");

    bot.send_message(chat_id, localization::welcome(&escape_markdown_v2(user_name)))
        .parse_mode(ParseMode::MarkdownV2)
        .await?;

    Ok(())
}

async fn handle_stop(
    bot: Bot,
    msg: Message,
    state: BotState,
    cron: CronClient,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let chat_id = msg.chat.id;
    let Some(record) = state.load_record(chat_id).await? else {
        return Ok(());
    };

    cron.remove_job(chat_id, &record.config).await;
    state.delete_record(chat_id).await?;

    bot.send_message(chat_id, localization::goodbye(record.config.lang))
        .await?;

    log::info!("👋 Chat {} unsubscribed", chat_id);
    Ok(())
}

async fn handle_reset(
    bot: Bot,
    msg: Message,
    state: BotState,
    cron: CronClient,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let chat_id = msg.chat.id;
    let Some(old) = state.load_record(chat_id).await? else {
        return Ok(());
    };

    cron.remove_job(chat_id, &old.config).await;
    state.delete_record(chat_id).await?;

    subscribe(chat_id, &state, &cron).await?;

    // Подтверждаем на прежнем языке чата
    bot.send_message(chat_id, localization::reset_done(old.config.lang))
        .await?;

    Ok(())
}

async fn handle_settings(
    bot: Bot,
    msg: Message,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let chat_id = msg.chat.id;
    let Some(mut record) = state.load_record(chat_id).await? else {
        return Ok(());
    };

    // Вход в меню сбрасывает ожидание ввода
    record.pending = None;
    state.save_record(chat_id, &record).await?;

    bot.send_message(
        chat_id,
        localization::settings_title(record.config.lang, record.coins.len()),
    )
    .parse_mode(ParseMode::MarkdownV2)
    .reply_markup(make_settings_keyboard(&record.config))
    .await?;

    Ok(())
}

async fn handle_help(
    bot: Bot,
    msg: Message,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let chat_id = msg.chat.id;
    let lang = state
        .load_record(chat_id)
        .await?
        .map(|record| record.config.lang)
        .unwrap_or(Language::By);

    bot.send_message(chat_id, localization::help_text(lang))
        .parse_mode(ParseMode::MarkdownV2)
        .await?;

    Ok(())
}
