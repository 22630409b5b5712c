//! OpenRouter chat-completion client.
//!
//! The bot only ever needs a string to show the user, so `ask` is total:
//! every transport or API failure maps to a canned fallback text. Typed
//! errors stay internal.

use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const MODEL: &str = "google/gemma-2-9b-it:free";
const HTTP_REFERER: &str = "https://t.me/HDL_Assistant_Bot";
const X_TITLE: &str = "HDL Assistant Bot";
const HTTP_TIMEOUT_SECS: u64 = 30;
const MAX_QUERY_CHARS: usize = 500;
const MAX_TOKENS: u32 = 350;
const TEMPERATURE: f64 = 0.3;
const RETRY_DELAY_SECS: u64 = 2;

#[derive(Debug, Error)]
enum AiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("rate limited")]
    RateLimited,
    #[error("privacy policy not configured")]
    PolicyNotConfigured,
    #[error("status {0}: {1}")]
    Status(reqwest::StatusCode, String),
    #[error("empty completion")]
    EmptyCompletion,
}

#[derive(Debug, Deserialize)]
struct Completion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

pub struct AiClient {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl AiClient {
    pub fn new(api_key: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .expect("reqwest client with static config");
        Self { http, api_key }
    }

    /// Ask the assistant. Always returns user-facing text.
    pub async fn ask(&self, user_query: &str, context: &str) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            return "ИИ временно недоступен. API ключ не настроен.".to_string();
        };

        let query: String = user_query.chars().take(MAX_QUERY_CHARS).collect();

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.ask_once(api_key, &query, context).await {
                Ok(answer) => {
                    info!(attempt, "ai answered");
                    return answer;
                }
                Err(err) if attempt == 1 && retryable(&err) => {
                    warn!(%err, "ai request failed, retrying");
                    tokio::time::sleep(Duration::from_secs(RETRY_DELAY_SECS)).await;
                }
                Err(AiError::RateLimited) => {
                    warn!("ai rate limited");
                    return "⚠️ ИИ временно недоступен из-за высокой нагрузки. \
                            Попробуйте через 1–2 минуты или уточните запрос."
                        .to_string();
                }
                Err(AiError::PolicyNotConfigured) => {
                    warn!("openrouter privacy policy not configured");
                    return "🤖 ИИ временно недоступен.\n\n\
                            Для активации ИИ необходимо настроить политику приватности OpenRouter.\n\n\
                            А пока я могу:\n\
                            • 🔍 Найти документацию по вашему запросу\n\
                            • 📚 Показать базу технической документации\n\
                            • 📞 Связать с техническим специалистом"
                        .to_string();
                }
                Err(AiError::Http(err)) if err.is_connect() || err.is_timeout() => {
                    warn!(%err, "ai connection failed");
                    return "ИИ временно недоступен. Проблемы с подключением.".to_string();
                }
                Err(err) => {
                    warn!(%err, "ai request failed");
                    return fallback_response();
                }
            }
        }
    }

    async fn ask_once(&self, api_key: &str, query: &str, context: &str) -> Result<String, AiError> {
        let mut system_prompt = String::from(
            "Вы — эксперт по технической документации оборудования умного дома \
             (HDL, Buspro, Matech, URRI). Отвечайте кратко и по делу. \
             Если не знаете ответ — предложите связаться со специалистом.",
        );
        if !context.is_empty() {
            system_prompt.push(' ');
            system_prompt.push_str(context);
        }

        let body = json!({
            "model": MODEL,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": query},
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        let response = self
            .http
            .post(OPENROUTER_URL)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("HTTP-Referer", HTTP_REFERER)
            .header("X-Title", X_TITLE)
            .json(&body)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let completion: Completion = response.json().await?;
                let answer = completion
                    .choices
                    .into_iter()
                    .next()
                    .map(|c| c.message.content.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .ok_or(AiError::EmptyCompletion)?;
                Ok(answer)
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => Err(AiError::RateLimited),
            reqwest::StatusCode::NOT_FOUND => Err(AiError::PolicyNotConfigured),
            status => {
                let text = response.text().await.unwrap_or_default();
                Err(AiError::Status(status, text))
            }
        }
    }
}

fn retryable(err: &AiError) -> bool {
    matches!(
        err,
        AiError::Http(_) | AiError::Status(_, _) | AiError::EmptyCompletion
    )
}

/// Generic fallback shown when the assistant is unreachable.
pub fn fallback_response() -> String {
    "🤖 ИИ временно недоступен.\n\n\
     Что я могу сделать:\n\
     • 🔍 Найти документацию по вашему запросу\n\
     • 📚 Показать базу технической документации\n\
     • 📞 Связать с техническим специалистом\n\n\
     Попробуйте уточнить запрос или используйте кнопки ниже."
        .to_string()
}

/// System-prompt context for the standard documentation questions.
pub fn standard_context() -> &'static str {
    "Бренды: HDL, Buspro, Matech, URRI, Yeelight Pro, CoolAutomation, iOT Systems. \
     ОТВЕЧАЙ ТОЛЬКО НА РУССКОМ ЯЗЫКЕ. Не используй английский язык в ответах."
}

/// System-prompt context for voice-assistant integration questions.
pub fn voice_context() -> &'static str {
    "Ты технический эксперт по интеграции систем умного дома. \
     ОТВЕЧАЙ ТОЛЬКО НА РУССКОМ ЯЗЫКЕ. \
     Интеграция Яндекс Алисы с системами KNX: требуется шлюз или контроллер с \
     поддержкой голосового управления; HDL предлагает решения через Smart Gateway; \
     необходимо настроить навык Алисы; KNX — проводной протокол, нужно совместимое \
     оборудование. Если нужны конкретные модели или инструкции — предложи связаться \
     со специалистом."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_api_key_yields_canned_text() {
        let client = AiClient::new(None);
        let answer = client.ask("любой вопрос", "").await;
        assert!(answer.contains("API ключ не настроен"));
    }

    #[test]
    fn completion_payload_parses() {
        let raw = r#"{"choices": [{"message": {"role": "assistant", "content": " ответ "}}]}"#;
        let completion: Completion = serde_json::from_str(raw).unwrap();
        assert_eq!(completion.choices[0].message.content.trim(), "ответ");
    }
}
