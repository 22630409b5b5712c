//! Keyboard layouts: the persistent reply keyboard, the documentation-base
//! brand links, and the FAQ menu tree.

use crate::bot::api::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, ReplyKeyboardMarkup, ReplyMarkup,
};

pub const BTN_DOCS: &str = "📚 База документации";
pub const BTN_COURSES: &str = "🎓 Обучающие материалы";
pub const BTN_FAQ: &str = "❓ FAQ: Часто Задаваемые Вопросы";
pub const BTN_SUPPORT: &str = "📞 Тех. специалист";

pub const DOCS_BASE_URL: &str = "https://disk.360.yandex.ru/d/xJi6eEXBTq01sw";
pub const COURSES_URL: &str = "https://iotsystems.getcourse.ru/teach/control";
pub const SUPPORT_CHAT_URL: &str = "https://t.me/hdl_support";

fn url_row(text: &str, url: &str) -> Vec<InlineKeyboardButton> {
    vec![InlineKeyboardButton::url(text, url)]
}

fn callback_row(text: &str, data: &str) -> Vec<InlineKeyboardButton> {
    vec![InlineKeyboardButton::callback(text, data)]
}

fn back_row() -> Vec<InlineKeyboardButton> {
    callback_row("⬅️ Назад", "faq_back_to_main")
}

/// The persistent reply keyboard shown under the input field.
pub fn main_reply_keyboard() -> ReplyMarkup {
    ReplyMarkup::Reply(ReplyKeyboardMarkup {
        keyboard: vec![
            vec![
                KeyboardButton {
                    text: BTN_DOCS.into(),
                },
                KeyboardButton {
                    text: BTN_COURSES.into(),
                },
            ],
            vec![
                KeyboardButton {
                    text: BTN_FAQ.into(),
                },
                KeyboardButton {
                    text: BTN_SUPPORT.into(),
                },
            ],
        ],
        resize_keyboard: true,
        one_time_keyboard: false,
    })
}

/// Brand folders of the documentation base.
pub fn docs_inline_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![
            url_row("iOT Systems", "https://disk.360.yandex.ru/d/xJi6eEXBTq01sw/01.%20iOT%20Systems"),
            url_row("HDL", "https://disk.360.yandex.ru/d/xJi6eEXBTq01sw/02.%20HDL"),
            url_row("Coolautomation", "https://disk.360.yandex.ru/d/xJi6eEXBTq01sw/03.%20Coolautomation"),
            url_row("Insprid", "https://disk.360.yandex.ru/d/xJi6eEXBTq01sw/04.%20Insprid"),
            url_row("Moorgen", "https://disk.360.yandex.ru/d/xJi6eEXBTq01sw/05.%20Moorgen"),
            url_row("Yeelight Pro", "https://disk.360.yandex.ru/d/xJi6eEXBTq01sw/06.%20Yeelight%20Pro"),
            url_row("Casa Tunes", "https://disk.360.yandex.ru/d/xJi6eEXBTq01sw/07.%20CasaTunes"),
            url_row("Matech", "https://disk.360.yandex.ru/d/xJi6eEXBTq01sw/08.%20Matech"),
            url_row("Creatrol", "https://disk.360.yandex.ru/d/xJi6eEXBTq01sw/09.%20Creatrol%20%D1%81%D0%B5%D0%BD%D1%81%D0%BE%D1%80%D1%8B"),
            url_row("URRI", "https://disk.360.yandex.ru/d/xJi6eEXBTq01sw/10.%20URRI.%20%D0%9F%D0%BB%D0%B5%D0%B5%D1%80%D1%8B%2C%20%D1%80%D0%B5%D1%81%D0%B8%D0%B2%D0%B5%D1%80%D1%8B"),
        ],
    }
}

/// Top-level FAQ menu.
pub fn faq_main_inline() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![
            callback_row("1. Вопросы по ПО", "faq_software"),
            callback_row("2. Вопросы по оборудованию", "faq_hardware"),
            callback_row("3. Вопросы о сотрудничестве", "faq_partnership"),
            callback_row("4. KNX", "faq_knx"),
            callback_row("5. BusPro", "faq_buspro"),
            callback_row("6. Приложения/интеграции", "faq_integrations"),
            callback_row("7. Общие вопросы", "faq_general"),
        ],
    }
}

/// FAQ submenu for a callback id, if it names one.
pub fn faq_submenu(data: &str) -> Option<InlineKeyboardMarkup> {
    let rows = match data {
        "faq_software" => vec![
            url_row("1. Софт", "https://hdlautomation.ru/faq/voprosy-po-programmnomu-obespecheniyu/soft/"),
            url_row("2. Прошивки", "https://hdlautomation.ru/faq/voprosy-po-programmnomu-obespecheniyu/proshivki/"),
            url_row("3. Отдельные вопросы по ПО", "https://hdlautomation.ru/faq/voprosy-po-programmnomu-obespecheniyu/otdelnye-voprosy-po-programmnomu-obespecheniyu/"),
            back_row(),
        ],
        "faq_hardware" => vec![
            url_row("1. Техническая Документация", "https://hdlautomation.ru/faq/voprosy-po-oborudovaniyu/tekhnicheskaya-dokumentatsiya/"),
            url_row("2. Техническая Информация", "https://hdlautomation.ru/faq/voprosy-po-oborudovaniyu/tekhnicheskaya-dokumentatsiya/"),
            back_row(),
        ],
        "faq_partnership" => vec![
            url_row("1. Начало Сотрудничества", "https://hdlautomation.ru/faq/voprosy-po-prodazham/kak-stat-nashim-partnerom-/"),
            url_row("2. Тренинги HDL Buspro", "https://hdlautomation.ru/faq/voprosy-po-prodazham/treningi-hdl-buspro/"),
            back_row(),
        ],
        "faq_knx" => vec![
            url_row("1. Шлюзы", "https://hdlautomation.ru/faq/KNX/shlyuzy/"),
            url_row("2. Шинные соединители", "https://hdlautomation.ru/faq/KNX/shinnye-soediniteli/"),
            url_row("3. Панели управления / клавишные устройства", "https://hdlautomation.ru/faq/KNX/paneli-upravleniya-klavishnye-ustrojstva/"),
            url_row("4. Датчики", "https://hdlautomation.ru/faq/KNX/datchiki/"),
            url_row("5. Управление освещением", "https://hdlautomation.ru/faq/KNX/upravlenie-osveshcheniem/"),
            url_row("6. Управление отоплением", "https://hdlautomation.ru/faq/KNX/upravlenie-otopleniem/"),
            back_row(),
        ],
        "faq_buspro" => vec![
            url_row("1. Датчики", "https://hdlautomation.ru/faq/BusPro/datchiki/"),
            url_row("2. Шлюзы", "https://hdlautomation.ru/faq/BusPro/shlyuzy/"),
            url_row("3. Панели управления", "https://hdlautomation.ru/faq/BusPro/paneli-upravleniya/"),
            url_row("4. Сухие контакты", "https://hdlautomation.ru/faq/BusPro/sukhie-kontakty/"),
            url_row("5. Управление освещением", "https://hdlautomation.ru/faq/BusPro/upravlenie-osveshcheniem/"),
            url_row("6. Управление отоплением", "https://hdlautomation.ru/faq/BusPro/upravlenie-otopleniem/"),
            url_row("7. Модуль логики", "https://hdlautomation.ru/faq/BusPro/modul-logiki/"),
            back_row(),
        ],
        "faq_integrations" => vec![
            url_row("Приложения / интеграции с голосовыми помощниками", "https://hdlautomation.ru/faq/prilozheniya/"),
            back_row(),
        ],
        "faq_general" => vec![
            url_row("Общие вопросы", "https://hdlautomation.ru/faq/obshchie-voprosy/"),
            back_row(),
        ],
        _ => return None,
    };
    Some(InlineKeyboardMarkup {
        inline_keyboard: rows,
    })
}

/// Yes/no prompt under answers.
pub fn helpful_inline() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![vec![
            InlineKeyboardButton::callback("✅ Да", "info_helpful:yes"),
            InlineKeyboardButton::callback("❌ Нет", "info_helpful:no"),
        ]],
    }
}

pub fn new_search_inline() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![callback_row("🔍 Новый поиск", "new_search")],
    }
}

pub fn clarify_or_support_inline() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![vec![
            InlineKeyboardButton::callback("🔄 Уточнить запрос", "ask_ai"),
            InlineKeyboardButton::callback("📞 Специалист", "support_form"),
        ]],
    }
}

pub fn ask_ai_inline() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![callback_row("🧠 Спросить у ИИ", "ask_ai")],
    }
}

pub fn support_chat_inline() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![url_row("💬 Написать специалисту", SUPPORT_CHAT_URL)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_faq_entry_has_a_submenu_with_back_button() {
        for data in [
            "faq_software",
            "faq_hardware",
            "faq_partnership",
            "faq_knx",
            "faq_buspro",
            "faq_integrations",
            "faq_general",
        ] {
            let menu = faq_submenu(data).unwrap_or_else(|| panic!("missing submenu {data}"));
            let last = menu.inline_keyboard.last().unwrap();
            assert_eq!(last[0].callback_data.as_deref(), Some("faq_back_to_main"));
        }
        assert!(faq_submenu("faq_back_to_main").is_none());
    }

    #[test]
    fn reply_keyboard_lists_all_menu_buttons() {
        let ReplyMarkup::Reply(kb) = main_reply_keyboard() else {
            panic!("expected reply keyboard");
        };
        let texts: Vec<&str> = kb
            .keyboard
            .iter()
            .flatten()
            .map(|b| b.text.as_str())
            .collect();
        assert_eq!(texts, vec![BTN_DOCS, BTN_COURSES, BTN_FAQ, BTN_SUPPORT]);
    }
}
