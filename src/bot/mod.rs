//! Telegram dispatcher: long-polling loop, message/callback routing, the
//! support-ticket form, and the admin broadcast.

pub mod api;
pub mod keyboards;

use std::collections::HashMap;

use anyhow::Result;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use tracing::{error, info, warn};

use crate::ai::{self, AiClient};
use crate::bot::api::{
    CallbackQuery, Message, ReplyMarkup, TelegramClient, TelegramError, Update,
};
use crate::config::AppConfig;
use crate::disk::build_docs_url;
use crate::model::types::{SearchResult, SupportTicket};
use crate::search::{has_only_technical_files, AiRoutingPolicy, SearchEngine, DEFAULT_LIMIT};

/// Bare salutations answered without running a search.
const GREETINGS: &[&str] = &[
    "привет",
    "здравствуйте",
    "добрый день",
    "доброе утро",
    "добрый вечер",
    "доброй ночи",
    "доброго дня",
    "приветствую",
    "хай",
    "hello",
    "hi",
];

/// The YE00820 KNX cable datasheet lives behind a viewer URL that the
/// generic builder cannot reproduce (the file sits in a nested shared
/// folder), so it is pinned.
const KNX_CABLE_VIEWER_URL: &str = "https://docs.360.yandex.ru/docs/view?url=ya-disk-public%3A%2F%2Fh1up8PyRs7zLi0hvFuTbhsLh7Nh2dv1lmMR1wsc5WOjH0pYg8ba5c4cLlLY6oeuWtFP6gwbjvtaafTptcua4SA%3D%3D%3A%2F01.%20iOT%20Systems%2F02.%20iOT%20%D0%9A%D0%B0%D0%B1%D0%B5%D0%BB%D1%8C%2FYE00820%20KNX%20%D0%BA%D0%B0%D0%B1%D0%B5%D0%BB%D1%8C%20J-Y(ST)Y%2C%202x2x0%2C8%2C%20%D1%8D%D0%BA%D1%80%D0%B0%D0%BD%D0%B8%D1%80%D0%BE%D0%B2%D0%B0%D0%BD%D0%BD%D1%8B%D0%B9%20(%D0%BF%D0%BE%D1%81%D1%82%D0%B0%D0%B2%D0%BB%D1%8F%D0%B5%D1%82%D1%81%D1%8F%20%D0%BF%D0%BE%20100%D0%BC)%2FYE00820%20ru.pdf&name=YE00820%20ru.pdf&nosw=1";

static NON_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D").expect("valid regex"));

/// Per-chat conversation state.
#[derive(Debug, Clone, Default)]
enum ChatFlow {
    #[default]
    Idle,
    AwaitingName,
    AwaitingPhone {
        name: String,
    },
    AwaitingBroadcast,
}

#[derive(Debug, Clone, Default)]
struct ChatState {
    flow: ChatFlow,
    last_query: Option<String>,
    clicked_no_once: bool,
}

/// Normalize a user-entered phone to `+7XXXXXXXXXX`, requiring exactly ten
/// digits (without the +7 prefix).
fn validate_phone(input: &str) -> Option<String> {
    let digits = NON_DIGITS.replace_all(input, "");
    (digits.len() == 10).then(|| format!("+7{digits}"))
}

fn is_greeting(text: &str) -> bool {
    let trimmed = text
        .to_lowercase()
        .trim_matches(['.', ',', '!', '?', ' '])
        .to_string();
    GREETINGS.contains(&trimmed.as_str())
}

pub struct BotApp {
    api: TelegramClient,
    engine: SearchEngine,
    ai: AiClient,
    policy: AiRoutingPolicy,
    config: AppConfig,
    states: Mutex<HashMap<i64, ChatState>>,
}

impl BotApp {
    pub fn new(config: AppConfig, engine: SearchEngine) -> Self {
        Self {
            api: TelegramClient::new(&config.bot_token),
            ai: AiClient::new(config.openrouter_api_key.clone()),
            policy: AiRoutingPolicy::default(),
            engine,
            config,
            states: Mutex::new(HashMap::new()),
        }
    }

    /// Long-polling loop; exits on Ctrl-C.
    pub async fn run(self) -> Result<()> {
        info!(documents = self.engine.len(), "bot started");
        let mut offset: Option<i64> = None;
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("shutting down");
                    return Ok(());
                }
                updates = self.api.get_updates(offset) => match updates {
                    Ok(updates) => {
                        for update in updates {
                            offset = Some(offset.unwrap_or(0).max(update.update_id + 1));
                            self.handle_update(update).await;
                        }
                    }
                    Err(err) => {
                        warn!(%err, "getUpdates failed, backing off");
                        tokio::time::sleep(std::time::Duration::from_secs(3)).await;
                    }
                }
            }
        }
    }

    async fn handle_update(&self, update: Update) {
        let result = if let Some(message) = update.message {
            self.handle_message(message).await
        } else if let Some(callback) = update.callback_query {
            self.handle_callback(callback).await
        } else {
            Ok(())
        };
        if let Err(err) = result {
            error!(%err, "update handling failed");
        }
    }

    fn take_flow(&self, chat_id: i64) -> ChatFlow {
        let mut states = self.states.lock();
        std::mem::take(&mut states.entry(chat_id).or_default().flow)
    }

    fn set_flow(&self, chat_id: i64, flow: ChatFlow) {
        self.states.lock().entry(chat_id).or_default().flow = flow;
    }

    fn remember_query(&self, chat_id: i64, query: &str) {
        let mut states = self.states.lock();
        let state = states.entry(chat_id).or_default();
        state.last_query = Some(query.to_string());
        state.clicked_no_once = false;
    }

    fn last_query(&self, chat_id: i64) -> Option<String> {
        self.states.lock().get(&chat_id).and_then(|s| s.last_query.clone())
    }

    async fn handle_message(&self, message: Message) -> Result<(), TelegramError> {
        let chat_id = message.chat.id;
        let Some(text) = message.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
        else {
            return Ok(());
        };

        match self.take_flow(chat_id) {
            ChatFlow::AwaitingName => {
                self.set_flow(
                    chat_id,
                    ChatFlow::AwaitingPhone {
                        name: text.to_string(),
                    },
                );
                self.api
                    .send_message(
                        chat_id,
                        "📱 Укажите ваш номер телефона (10 цифр, без +7):\n\n\
                         Пример: <code>9777809807</code>",
                        None,
                    )
                    .await?;
                return Ok(());
            }
            ChatFlow::AwaitingPhone { name } => {
                return self.finish_support_form(chat_id, &message, name, text).await;
            }
            ChatFlow::AwaitingBroadcast => {
                let from_admin = message
                    .from
                    .as_ref()
                    .is_some_and(|u| self.config.is_admin(u.id));
                if from_admin {
                    return self.broadcast(chat_id, text).await;
                }
                // Not an admin anymore mid-flow; fall through to normal handling.
            }
            ChatFlow::Idle => {}
        }

        match text {
            "/start" => {
                self.api
                    .send_message(
                        chat_id,
                        "Привет! 👨‍💻 Я HDL Assistant — помогу найти документацию \
                         или подключу к специалисту.\n\n\
                         🤔 Запутались в документации? 📑 Нужна спецификация или мануал? \
                         🚀 Я с радостью помогу! ✨\n\
                         Используйте кнопки ниже или напишите запрос вручную:",
                        Some(keyboards::main_reply_keyboard()),
                    )
                    .await?;
            }
            "/admin" => {
                let from_admin = message
                    .from
                    .as_ref()
                    .is_some_and(|u| self.config.is_admin(u.id));
                if from_admin {
                    self.set_flow(chat_id, ChatFlow::AwaitingBroadcast);
                    self.api
                        .send_message(
                            chat_id,
                            "📬 Введите текст рассылки для выбранных пользователей:",
                            None,
                        )
                        .await?;
                } else {
                    self.api
                        .send_message(chat_id, "🔒 У вас нет доступа к этой команде.", None)
                        .await?;
                }
            }
            keyboards::BTN_DOCS => {
                self.api
                    .send_message(
                        chat_id,
                        &format!(
                            "📂 База технической документации:\n{}",
                            keyboards::DOCS_BASE_URL
                        ),
                        Some(ReplyMarkup::Inline(keyboards::docs_inline_keyboard())),
                    )
                    .await?;
            }
            keyboards::BTN_COURSES => {
                self.api
                    .send_message(
                        chat_id,
                        &format!("🎓 Обучающая платформа HDL:\n{}", keyboards::COURSES_URL),
                        None,
                    )
                    .await?;
            }
            keyboards::BTN_FAQ => {
                self.api
                    .send_message(
                        chat_id,
                        "❓ Выберите раздел FAQ:",
                        Some(ReplyMarkup::Inline(keyboards::faq_main_inline())),
                    )
                    .await?;
            }
            keyboards::BTN_SUPPORT => {
                self.set_flow(chat_id, ChatFlow::AwaitingName);
                self.api
                    .send_message(chat_id, "Пожалуйста, укажите ваше ФИО:", None)
                    .await?;
            }
            _ if is_greeting(text) => {
                self.api
                    .send_message(
                        chat_id,
                        "Здравствуйте! 👋\n\nИспользуйте кнопки ниже или напишите запрос \
                         вручную — я с радостью помогу!",
                        Some(keyboards::main_reply_keyboard()),
                    )
                    .await?;
            }
            _ => return self.handle_query(chat_id, text).await,
        }
        Ok(())
    }

    /// The main documentation flow: AI gate, then hybrid search.
    async fn handle_query(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        self.remember_query(chat_id, text);

        if self.policy.should_use_ai_directly(text) {
            info!(query = text, route = "ai", "query_routed");
            return self.answer_with_ai(chat_id, text).await;
        }
        info!(query = text, route = "search", "query_routed");

        let results = self.engine.hybrid_search(text, DEFAULT_LIMIT);
        if results.is_empty() {
            return self.answer_with_ai(chat_id, text).await;
        }

        if results.iter().all(SearchResult::is_folder_link) {
            return self.send_folder_links(chat_id, text, &results).await;
        }

        let body = self.render_documents(text, &results);
        self.api
            .send_message(
                chat_id,
                &body,
                Some(ReplyMarkup::Inline(keyboards::helpful_inline())),
            )
            .await?;

        if results.len() == 1 && has_only_technical_files(&results) {
            self.api
                .send_message(
                    chat_id,
                    "🤔 Кажется, это техническая документация, а не руководство по \
                     интеграции.\n\nМогу подключить ИИ-помощника для более точного ответа:",
                    Some(ReplyMarkup::Inline(keyboards::ask_ai_inline())),
                )
                .await?;
        }
        Ok(())
    }

    async fn send_folder_links(
        &self,
        chat_id: i64,
        query: &str,
        results: &[SearchResult],
    ) -> Result<(), TelegramError> {
        let mut body = format!("📁 <b>Документация по запросу: {query}</b>\n\n");
        for result in results {
            if let SearchResult::FolderLink { link, .. } = result {
                body.push_str(&format!(
                    "🔗 <a href='{}'>{}</a>\n",
                    link.folder_link, link.name
                ));
            }
        }
        body.push_str(
            "\nВ папке вы найдете все доступные документы, инструкции и технические паспорта.",
        );
        self.api.send_message(chat_id, &body, None).await?;
        Ok(())
    }

    fn render_documents(&self, query: &str, results: &[SearchResult]) -> String {
        let mut body = format!(
            "🔍 Ищу документацию по: <b>{query}</b>\n\n✅ Найдено документов: {}\n\n",
            results.len()
        );
        for (i, result) in results.iter().enumerate() {
            let SearchResult::Document { record, .. } = result else {
                continue;
            };
            let name_lower = record.name.to_lowercase();
            let link = if name_lower.contains("ye00820") && name_lower.contains("knx") {
                KNX_CABLE_VIEWER_URL.to_string()
            } else {
                build_docs_url(
                    &record.path,
                    &self.config.docs_public_key,
                    &self.config.disk_folder_path,
                )
            };
            body.push_str(&format!(
                "{}. <b>{}</b>\n   └─ 📎 <a href='{link}'>Открыть документ</a>\n\n",
                i + 1,
                record.name
            ));
        }
        body.push_str("Полученная информация вам помогла?");
        body
    }

    async fn answer_with_ai(&self, chat_id: i64, query: &str) -> Result<(), TelegramError> {
        let thinking = self
            .api
            .send_message(
                chat_id,
                "Сортирую информацию по полочкам... Сейчас всё объясню! 🗂️",
                None,
            )
            .await?;

        let query_lower = query.to_lowercase();
        let context = if ["алис", "голосов", "alisa"]
            .iter()
            .any(|kw| query_lower.contains(kw))
        {
            ai::voice_context()
        } else {
            ai::standard_context()
        };

        let answer = self.ai.ask(query, context).await;
        self.api
            .edit_message_text(
                chat_id,
                thinking.message_id,
                &format!("🧠 {answer}\n\nПолученная информация вам помогла?"),
                Some(keyboards::helpful_inline()),
            )
            .await?;
        Ok(())
    }

    async fn finish_support_form(
        &self,
        chat_id: i64,
        message: &Message,
        name: String,
        phone_input: &str,
    ) -> Result<(), TelegramError> {
        let Some(phone) = validate_phone(phone_input) else {
            // Keep waiting for a valid phone.
            self.set_flow(chat_id, ChatFlow::AwaitingPhone { name });
            self.api
                .send_message(
                    chat_id,
                    "❌ Неверный формат. Введите ровно 10 цифр (без +7):\n\
                     Пример: <code>9777809807</code>",
                    None,
                )
                .await?;
            return Ok(());
        };

        let ticket = SupportTicket {
            full_name: name,
            phone,
            user_id: message.from.as_ref().map(|u| u.id).unwrap_or(chat_id),
            username: message.from.as_ref().and_then(|u| u.username.clone()),
            original_query: self.last_query(chat_id),
            created_at: chrono::Utc::now(),
        };

        match self
            .api
            .send_message(self.config.support_group_chat_id, &ticket.render(), None)
            .await
        {
            Ok(_) => {
                info!(user_id = ticket.user_id, "support ticket delivered");
                self.api
                    .send_message(
                        chat_id,
                        "✅ Заявка отправлена! Специалист скоро свяжется с вами.",
                        Some(ReplyMarkup::Inline(keyboards::support_chat_inline())),
                    )
                    .await?;
            }
            Err(err) => {
                error!(%err, "support ticket delivery failed");
                self.api
                    .send_message(
                        chat_id,
                        &format!(
                            "Не удалось отправить заявку. Напишите напрямую: {}",
                            keyboards::SUPPORT_CHAT_URL
                        ),
                        None,
                    )
                    .await?;
            }
        }
        Ok(())
    }

    async fn broadcast(&self, admin_chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let recipients = &self.config.broadcast_ids;
        let mut delivered = 0usize;
        for user_id in recipients {
            match self.api.send_message(*user_id, text, None).await {
                Ok(_) => delivered += 1,
                Err(err) => warn!(user_id, %err, "broadcast delivery failed"),
            }
        }
        self.api
            .send_message(
                admin_chat_id,
                &format!(
                    "✅ Рассылка отправлена {delivered} из {} получателей.",
                    recipients.len()
                ),
                None,
            )
            .await?;
        Ok(())
    }

    async fn handle_callback(&self, callback: CallbackQuery) -> Result<(), TelegramError> {
        self.api.answer_callback_query(&callback.id).await?;
        let Some(message) = callback.message else {
            return Ok(());
        };
        let chat_id = message.chat.id;
        let data = callback.data.as_deref().unwrap_or("");

        match data {
            "support_form" => {
                self.set_flow(chat_id, ChatFlow::AwaitingName);
                self.api
                    .send_message(chat_id, "Пожалуйста, укажите ваше ФИО:", None)
                    .await?;
            }
            "new_search" => {
                self.api
                    .send_message(
                        chat_id,
                        "🔍 Напишите ваш новый запрос и я с радостью помогу!",
                        None,
                    )
                    .await?;
            }
            "ask_ai" => {
                if let Some(query) = self.last_query(chat_id) {
                    self.answer_with_ai(chat_id, &query).await?;
                } else {
                    self.api
                        .send_message(chat_id, "🔍 Напишите ваш запрос — я помогу!", None)
                        .await?;
                }
            }
            "info_helpful:yes" => {
                self.api
                    .send_message(
                        chat_id,
                        "Спасибо что воспользовались HDL Assistant! 🎉",
                        Some(ReplyMarkup::Inline(keyboards::new_search_inline())),
                    )
                    .await?;
                let _ = self
                    .api
                    .edit_message_reply_markup(chat_id, message.message_id, None)
                    .await;
            }
            "info_helpful:no" => {
                let already = {
                    let mut states = self.states.lock();
                    let state = states.entry(chat_id).or_default();
                    std::mem::replace(&mut state.clicked_no_once, true)
                };
                if already {
                    self.api
                        .send_message(
                            chat_id,
                            "Уточните запрос - я с радостью помогу! 💡",
                            Some(ReplyMarkup::Inline(keyboards::clarify_or_support_inline())),
                        )
                        .await?;
                } else {
                    self.api
                        .send_message(chat_id, "Уточните запрос - я с радостью помогу! 💡", None)
                        .await?;
                }
                let _ = self
                    .api
                    .edit_message_reply_markup(chat_id, message.message_id, None)
                    .await;
            }
            "faq_back_to_main" => {
                self.api
                    .send_message(
                        chat_id,
                        "❓ Выберите раздел FAQ:",
                        Some(ReplyMarkup::Inline(keyboards::faq_main_inline())),
                    )
                    .await?;
            }
            _ => {
                if let Some(submenu) = keyboards::faq_submenu(data) {
                    self.api
                        .send_message(chat_id, "Выберите тему:", Some(ReplyMarkup::Inline(submenu)))
                        .await?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_requires_exactly_ten_digits() {
        assert_eq!(
            validate_phone("9777809807").as_deref(),
            Some("+79777809807")
        );
        assert_eq!(
            validate_phone("977 780-98-07").as_deref(),
            Some("+79777809807")
        );
        assert_eq!(validate_phone("12345"), None);
        assert_eq!(validate_phone("+79777809807"), None); // 11 digits
        assert_eq!(validate_phone("abc"), None);
    }

    #[test]
    fn greeting_detection_ignores_case_and_punctuation() {
        assert!(is_greeting("Привет!"));
        assert!(is_greeting("ЗДРАВСТВУЙТЕ"));
        assert!(is_greeting("добрый день."));
        assert!(!is_greeting("привет, найди паспорт"));
    }
}
