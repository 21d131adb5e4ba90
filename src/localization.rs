use serde::{Deserialize, Serialize};

use crate::models::{IntervalUnit, TimeInterval};

/// Язык уведомлений и меню
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    By,
    Ru,
}

impl Language {
    pub fn flag(self) -> &'static str {
        match self {
            Language::By => "🇧🇾",
            Language::Ru => "🇷🇺",
        }
    }
}

/// Короткая подпись единицы интервала ("за 15 мин.")
pub fn unit_label(lang: Language, unit: IntervalUnit) -> &'static str {
    match lang {
        Language::Ru => match unit {
            IntervalUnit::Minutes => "мин",
            IntervalUnit::Hours => "ч",
            IntervalUnit::Days => "дн",
            IntervalUnit::Months => "мес",
        },
        Language::By => match unit {
            IntervalUnit::Minutes => "хвіл",
            IntervalUnit::Hours => "гадз",
            IntervalUnit::Days => "дзён",
            IntervalUnit::Months => "мес",
        },
    }
}

/// Название единицы для кнопки выбора
pub fn unit_button(lang: Language, unit: IntervalUnit) -> &'static str {
    match lang {
        Language::Ru => match unit {
            IntervalUnit::Minutes => "Минуты",
            IntervalUnit::Hours => "Часы",
            IntervalUnit::Days => "Дни",
            IntervalUnit::Months => "Месяцы",
        },
        Language::By => match unit {
            IntervalUnit::Minutes => "Хвіліны",
            IntervalUnit::Hours => "Гадзіны",
            IntervalUnit::Days => "Дні",
            IntervalUnit::Months => "Месяцы",
        },
    }
}

pub fn settings_title(lang: Language, coins_number: usize) -> String {
    match lang {
        Language::Ru => format!(
            "*Настройки бота*\n\nМонет мониторится: {coins_number}\\.\n\nВыберите один из параметров, который вы хотите изменить\\."
        ),
        Language::By => format!(
            "*Налады бота*\n\nМанет маніторыцца: {coins_number}\\.\n\nАбярыце адзін з параметраў, які вы хочаце змяніць\\."
        ),
    }
}

pub fn interval_menu_title(lang: Language) -> &'static str {
    match lang {
        Language::Ru => "Выберите единицу времени для интервала отслеживания:",
        Language::By => "Абярыце адзінку часу для інтэрвалу адсочвання:",
    }
}

pub fn interval_prompt(lang: Language, current: TimeInterval, unit: IntervalUnit) -> String {
    let (min, max) = unit.bounds();
    let value = current.value;
    let label = unit_label(lang, current.unit);
    match lang {
        Language::Ru => format!(
            "Текущий временной интервал: *{value}* {label}\\.\n\nИзменение цены, за какой промежуток времени следует отслеживать\\.\n\nВведите новое значение от {min} до {max}:"
        ),
        Language::By => format!(
            "Бягучы часавы інтэрвал: *{value}* {label}\\.\n\nЗмяненне кошту, за які прамежак часу варта адсочваць\\.\n\nУвядзіце новае значэнне ад {min} да {max}:"
        ),
    }
}

pub fn percent_prompt(lang: Language, percent: u32) -> String {
    match lang {
        Language::Ru => format!(
            "Текущий процент изменения: *{percent}* %\\.\n\nО каком изменении цены за указанный промежуток времени стоит уведомлять\\.\n\nВведите новое значение от 1 до 100:"
        ),
        Language::By => format!(
            "Бягучы адсотак змены: *{percent}* %\\.\n\nАб якой змене цаны за ўказаны прамежак часу варта паведамляць\\.\n\nУвядзіце новае значэнне ад 1 да 100:"
        ),
    }
}

pub fn language_title(lang: Language) -> String {
    match lang {
        Language::Ru => format!("Текущий язык: {}.", lang.flag()),
        Language::By => format!("Бягучая мова: {}.", lang.flag()),
    }
}

pub fn not_a_number(lang: Language) -> &'static str {
    match lang {
        Language::Ru => "Значение должно быть целым числом.",
        Language::By => "Значэнне павінна быць цэлым лікам.",
    }
}

pub fn out_of_bounds(lang: Language, min: u32, max: u32) -> String {
    match lang {
        Language::Ru => format!("Значение должно быть от {min} до {max}."),
        Language::By => format!("Значэнне павінна быць ад {min} да {max}."),
    }
}

pub fn updated(lang: Language) -> &'static str {
    match lang {
        Language::Ru => "Успешно! Параметр обновлён.",
        Language::By => "Паспяхова! Параметр абноўлены.",
    }
}

pub fn welcome(user_name: &str) -> String {
    format!(
        "*Добро пожаловать, {user_name}*\\.\n\nТеперь вы подписаны на все памы/дампы\\.\n\nИспользуя команду /settings, вы можете изменить ряд ключевых параметров работы бота\\."
    )
}

pub fn goodbye(lang: Language) -> &'static str {
    match lang {
        Language::Ru => "Больше я не буду присылать вам уведомлений 😔",
        Language::By => "Больш я не буду дасылаць вам апавяшчэнняў 😔",
    }
}

pub fn reset_done(lang: Language) -> &'static str {
    match lang {
        Language::Ru => "Настройки сброшены. Вы снова подписаны с параметрами по умолчанию.",
        Language::By => "Налады скінуты. Вы зноў падпісаны з параметрамі па змаўчанні.",
    }
}

pub fn current_price_label(lang: Language) -> &'static str {
    match lang {
        Language::Ru => "Текущая цена",
        Language::By => "Бягучая цана",
    }
}

/// Подписи кнопок меню настроек с текущими значениями
pub fn interval_button(lang: Language, interval: TimeInterval) -> String {
    let label = unit_label(lang, interval.unit);
    match lang {
        Language::Ru => format!("Время: {} {}.", interval.value, label),
        Language::By => format!("Час: {} {}.", interval.value, label),
    }
}

pub fn percent_button(lang: Language, percent: u32) -> String {
    match lang {
        Language::Ru => format!("Процент: {percent}"),
        Language::By => format!("Працэнт: {percent}"),
    }
}

pub fn language_button(lang: Language) -> String {
    match lang {
        Language::Ru => format!("Язык {}", lang.flag()),
        Language::By => format!("Мова {}", lang.flag()),
    }
}

pub fn back_button() -> &'static str {
    "← Назад"
}

pub fn help_text(lang: Language) -> &'static str {
    match lang {
        Language::Ru => {
            "*Помощь по боту*\n\n\
            /start – подписаться на памы/дампы\n\
            /stop – отписаться от уведомлений\n\
            /reset – сбросить настройки\n\
            /settings – настройки бота\n\n\
            Бот следит за ценами топовых монет и присылает уведомление, когда цена меняется сильнее заданного процента за выбранный интервал\\."
        }
        Language::By => {
            "*Дапамога па боце*\n\n\
            /start – падпісацца на памы/дампы\n\
            /stop – адпісацца ад апавяшчэнняў\n\
            /reset – скінуць налады\n\
            /settings – налады бота\n\n\
            Бот сочыць за коштамі топавых манет і дасылае апавяшчэнне, калі кошт змяняецца мацней зададзенага адсотка за абраны інтэрвал\\."
        }
    }
}
