use std::env;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use teloxide::{prelude::*, utils::command::BotCommands};
use tokio::net::TcpListener;

mod bot_state;
mod cron;
mod handlers;
mod localization;
mod market;
mod models;
mod session;
mod tracker;

use crate::bot_state::BotState;
use crate::cron::CronClient;
use crate::handlers::{callback_handler, command_handler, message_handler};
use crate::session::SessionStore;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
enum Command {
    #[command(description = "подписаться на памы/дампы")]
    Start,
    #[command(description = "отписаться от уведомлений")]
    Stop,
    #[command(description = "сбросить настройки")]
    Reset,
    #[command(description = "настройки бота")]
    Settings,
    #[command(description = "показать помощь")]
    Help,
}

/// Полезная нагрузка задания внешнего планировщика
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TriggerRequest {
    chat_id: i64,
    percent: Option<u32>,
}

#[derive(Clone)]
struct TriggerContext {
    bot: Bot,
    state: BotState,
}

/// Точка входа «проверить сейчас», дёргается планировщиком
async fn trigger_handler(
    State(ctx): State<TriggerContext>,
    Json(request): Json<TriggerRequest>,
) -> StatusCode {
    let chat_id = ChatId(request.chat_id);

    match handlers::run_price_check(&ctx.bot, &ctx.state, chat_id, request.percent).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            log::error!("Trigger failed for chat {}: {}", chat_id, e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Загружаем .env и инициализируем логирование
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Starting pump/dump alert bot...");

    let store_url = env::var("SESSION_STORE_URL").expect("SESSION_STORE_URL must be set");
    let state = BotState::new(SessionStore::new(&store_url));
    let cron = CronClient::from_env()?;
    let bot = Bot::from_env();

    // HTTP-вход для внешнего планировщика
    let bind_addr =
        env::var("TRIGGER_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let app = Router::new()
        .route("/trigger", post(trigger_handler))
        .with_state(TriggerContext {
            bot: bot.clone(),
            state: state.clone(),
        });
    let listener = TcpListener::bind(&bind_addr).await?;
    log::info!("🚀 Trigger endpoint listening on {}", bind_addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            log::error!("Trigger server error: {}", e);
        }
    });

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(Update::filter_callback_query().endpoint(callback_handler))
        .branch(Update::filter_message().endpoint(message_handler));

    log::info!("🚀 Starting dispatcher...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state, cron])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
