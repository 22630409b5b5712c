//! Environment-driven application configuration.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Default location written by `hdla index` and read by the engine.
pub const DEFAULT_INDEX_PATH: &str = "data/cache/file_index.json";

/// Staff group receiving support tickets.
const DEFAULT_SUPPORT_GROUP_CHAT_ID: i64 = -1003044266223;

/// Everything the bot process needs, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bot_token: String,
    pub docs_public_key: String,
    pub disk_folder_path: String,
    pub openrouter_api_key: Option<String>,
    pub support_group_chat_id: i64,
    pub admin_ids: Vec<i64>,
    pub broadcast_ids: Vec<i64>,
    pub index_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let bot_token = dotenvy::var("BOT_TOKEN").context("BOT_TOKEN not set")?;
        let docs_public_key =
            dotenvy::var("DOCS_PUBLIC_KEY").context("DOCS_PUBLIC_KEY not set")?;
        let disk_folder_path =
            dotenvy::var("YANDEX_DISK_FOLDER_PATH").unwrap_or_else(|_| "/".to_string());
        let openrouter_api_key = dotenvy::var("OPENROUTER_API_KEY").ok();
        let support_group_chat_id = dotenvy::var("SUPPORT_GROUP_CHAT_ID")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SUPPORT_GROUP_CHAT_ID);

        Ok(Self {
            bot_token,
            docs_public_key,
            disk_folder_path,
            openrouter_api_key,
            support_group_chat_id,
            admin_ids: parse_id_list(dotenvy::var("ADMIN_IDS").ok().as_deref()),
            broadcast_ids: parse_id_list(dotenvy::var("BROADCAST_IDS").ok().as_deref()),
            index_path: index_path_from_env(),
        })
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_ids.contains(&user_id)
    }
}

/// Credentials for the index crawl (`hdla index`), separate so the bot can
/// run without them and vice versa.
#[derive(Debug, Clone)]
pub struct DiskConfig {
    pub token: String,
    pub folder_path: String,
}

impl DiskConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            token: dotenvy::var("YANDEX_DISK_TOKEN").context("YANDEX_DISK_TOKEN not set")?,
            folder_path: dotenvy::var("YANDEX_DISK_FOLDER_PATH")
                .unwrap_or_else(|_| "/".to_string()),
        })
    }
}

pub fn index_path_from_env() -> PathBuf {
    dotenvy::var("FILE_INDEX_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_INDEX_PATH))
}

fn parse_id_list(raw: Option<&str>) -> Vec<i64> {
    raw.map(|s| {
        s.split(',')
            .filter_map(|part| part.trim().parse().ok())
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_list_parsing_skips_garbage() {
        assert_eq!(parse_id_list(Some("1, 2,x, 3")), vec![1, 2, 3]);
        assert_eq!(parse_id_list(Some("")), Vec::<i64>::new());
        assert_eq!(parse_id_list(None), Vec::<i64>::new());
    }
}
