use crate::core::session::Session;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// 保存登入後取得的 bearer token
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<Option<Session>>;
    async fn save(&self, session: &Session) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn timeout(&self) -> Duration;
    fn session_path(&self) -> &str;
}
