use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::localization::{self, Language};
use crate::models::{ChatConfig, IntervalUnit, TimeInterval};
use crate::tracker::Crossing;

/// Экранирование MarkdownV2
///
/// Канал резервирует `.`, `+` и `-`; экранируется каждое подставляемое
/// значение, звёздочки разметки не трогаются.
pub fn escape_markdown_v2(text: &str) -> String {
    let specials = ['.', '+', '-'];
    let mut out = String::with_capacity(text.len() * 2);

    for ch in text.chars() {
        if specials.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Сообщение об одной монете, пересёкшей порог
pub fn format_alert(lang: Language, crossing: &Crossing, interval: TimeInterval) -> String {
    let is_positive = crossing.percent_change > 0.0;
    let icon = if is_positive { "📈" } else { "📉" };
    let sign = if is_positive { '+' } else { '-' };
    let percent = crossing.percent_change.abs().round() as i64;

    escape_markdown_v2(&format!(
        "{icon} *{symbol}*\n{sign}{percent}% за {value} {unit}.\n{price_label} {price}.",
        symbol = crossing.symbol,
        value = interval.value,
        unit = localization::unit_label(lang, interval.unit),
        price_label = localization::current_price_label(lang),
        price = crossing.last_price,
    ))
}

/// Склейка уведомлений цикла в одно исходящее сообщение
///
/// Пустой список — нет сообщения.
pub fn build_notification(
    lang: Language,
    crossings: &[Crossing],
    interval: TimeInterval,
) -> Option<String> {
    if crossings.is_empty() {
        return None;
    }

    Some(
        crossings
            .iter()
            .map(|crossing| format_alert(lang, crossing, interval))
            .collect::<Vec<_>>()
            .join("\n\n"),
    )
}

/// Меню настроек с текущими значениями параметров
pub fn make_settings_keyboard(config: &ChatConfig) -> InlineKeyboardMarkup {
    let lang = config.lang;

    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback(
                localization::interval_button(lang, config.interval),
                "time-interval",
            ),
            InlineKeyboardButton::callback(
                localization::percent_button(lang, config.percent),
                "percent-change",
            ),
        ],
        vec![InlineKeyboardButton::callback(
            localization::language_button(lang),
            "language",
        )],
    ])
}

/// Выбор единицы времени для интервала
pub fn make_interval_units_keyboard(lang: Language) -> InlineKeyboardMarkup {
    let unit_key = |unit: IntervalUnit, data: &str| {
        InlineKeyboardButton::callback(localization::unit_button(lang, unit), data.to_string())
    };

    InlineKeyboardMarkup::new(vec![
        vec![
            unit_key(IntervalUnit::Minutes, "interval-minutes"),
            unit_key(IntervalUnit::Hours, "interval-hours"),
        ],
        vec![
            unit_key(IntervalUnit::Days, "interval-days"),
            unit_key(IntervalUnit::Months, "interval-months"),
        ],
        vec![InlineKeyboardButton::callback(
            localization::back_button(),
            "back",
        )],
    ])
}

/// Выбор языка
pub fn make_language_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("🇧🇾 Беларуская", "lang-by"),
            InlineKeyboardButton::callback("🇷🇺 Русский", "lang-ru"),
        ],
        vec![InlineKeyboardButton::callback(
            localization::back_button(),
            "back",
        )],
    ])
}

/// Возврат в меню настроек
pub fn make_back_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        localization::back_button(),
        "back",
    )]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crossing(symbol: &str, percent_change: f64, last_price: f64) -> Crossing {
        Crossing {
            symbol: symbol.to_string(),
            percent_change,
            last_price,
        }
    }

    #[test]
    fn reserved_characters_are_escaped() {
        assert_eq!(escape_markdown_v2("+25% 1.5 -3"), "\\+25% 1\\.5 \\-3");
    }

    #[test]
    fn positive_alert_has_plus_sign_and_pump_icon() {
        let interval = TimeInterval::minutes(15);
        let alert = format_alert(Language::By, &crossing("BTC", 25.0, 125.0), interval);

        assert_eq!(
            alert,
            "📈 *BTC*\n\\+25% за 15 хвіл\\.\nБягучая цана 125\\."
        );
    }

    #[test]
    fn negative_alert_has_minus_sign_and_dump_icon() {
        let interval = TimeInterval::minutes(15);
        let alert = format_alert(Language::Ru, &crossing("ETH", -20.0, 80.0), interval);

        assert_eq!(alert, "📉 *ETH*\n\\-20% за 15 мин\\.\nТекущая цена 80\\.");
    }

    #[test]
    fn fractional_percent_is_rounded_for_display() {
        let interval = TimeInterval::minutes(5);
        let alert = format_alert(Language::Ru, &crossing("BTC", 24.6, 103.42), interval);

        assert!(alert.contains("\\+25%"));
        assert!(alert.contains("103\\.42"));
    }

    #[test]
    fn alerts_are_joined_with_blank_line() {
        let interval = TimeInterval::minutes(15);
        let crossings = vec![crossing("BTC", 25.0, 125.0), crossing("ETH", -30.0, 7.0)];

        let notification = build_notification(Language::Ru, &crossings, interval).unwrap();
        assert_eq!(notification.matches("\n\n").count(), 1);
        assert!(notification.starts_with("📈 *BTC*"));
        assert!(notification.contains("📉 *ETH*"));
    }

    #[test]
    fn no_crossings_means_no_message() {
        let interval = TimeInterval::minutes(15);
        assert!(build_notification(Language::Ru, &[], interval).is_none());
    }
}
