use redis::{AsyncCommands, Client, RedisError};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

// Redis cache key prefixes
pub const USER_PROFILE_KEY_PREFIX: &str = "user:profile";
pub const POST_KEY_PREFIX: &str = "post:view";
pub const NOTIFICATION_CHANNEL_PREFIX: &str = "notifications:user";
const USER_PROFILE_TTL_SECONDS: u64 = 600; // 10 minutes
const POST_CACHE_TTL_SECONDS: u64 = 300; // 5 minutes

// Redis cache configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub user_profile_ttl: Duration,
    pub post_ttl: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            user_profile_ttl: Duration::from_secs(USER_PROFILE_TTL_SECONDS),
            post_ttl: Duration::from_secs(POST_CACHE_TTL_SECONDS),
        }
    }
}

pub fn user_profile_key(user_id: &Uuid) -> String {
    format!("{}:{}", USER_PROFILE_KEY_PREFIX, user_id)
}

pub fn post_key(post_id: i64) -> String {
    format!("{}:{}", POST_KEY_PREFIX, post_id)
}

/// Pub/sub channel carrying one user's notifications
pub fn notification_channel(user_id: &Uuid) -> String {
    format!("{}:{}", NOTIFICATION_CHANNEL_PREFIX, user_id)
}

#[derive(Debug, Clone)]
pub struct RedisCache {
    client: Client,
    config: RedisConfig,
}

impl RedisCache {
    pub fn new(client: Client, config: Option<RedisConfig>) -> Self {
        // Connection validation will happen on first use
        Self {
            client,
            config: config.unwrap_or_default(),
        }
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }

    async fn get_json(&self, key: &str) -> Result<Option<String>, RedisError> {
        let mut connection = self.client.get_multiplexed_async_connection().await?;
        let result: Option<String> = connection.get(key).await?;

        if result.is_some() {
            debug!("Cache hit for {}", key);
        } else {
            debug!("Cache miss for {}", key);
        }

        Ok(result)
    }

    async fn set_json(&self, key: &str, json_data: &str, ttl: Duration) -> Result<(), RedisError> {
        self.client
            .get_multiplexed_async_connection()
            .await?
            .set_ex(key, json_data, ttl.as_secs())
            .await
    }

    pub async fn get_user_profile(&self, user_id: &Uuid) -> Result<Option<String>, RedisError> {
        self.get_json(&user_profile_key(user_id)).await
    }

    pub async fn cache_user_profile(
        &self,
        user_id: &Uuid,
        json_data: &str,
    ) -> Result<(), RedisError> {
        self.set_json(
            &user_profile_key(user_id),
            json_data,
            self.config.user_profile_ttl,
        )
        .await
    }

    /// Drop cached profiles; a follow edge changes two of them at once
    pub async fn invalidate_user_profiles(&self, user_ids: &[Uuid]) -> Result<(), RedisError> {
        if user_ids.is_empty() {
            return Ok(());
        }

        let keys: Vec<String> = user_ids.iter().map(user_profile_key).collect();
        let mut connection = self.client.get_multiplexed_async_connection().await?;
        connection.del::<_, ()>(&keys).await?;

        info!("Invalidated cached profiles for {} users", keys.len());
        Ok(())
    }

    pub async fn get_post(&self, post_id: i64) -> Result<Option<String>, RedisError> {
        self.get_json(&post_key(post_id)).await
    }

    pub async fn cache_post(&self, post_id: i64, json_data: &str) -> Result<(), RedisError> {
        self.set_json(&post_key(post_id), json_data, self.config.post_ttl)
            .await
    }

    pub async fn invalidate_post(&self, post_id: i64) -> Result<(), RedisError> {
        self.client
            .get_multiplexed_async_connection()
            .await?
            .del(post_key(post_id))
            .await
    }

    /// Publish a serialized notification to the recipient's channel
    pub async fn publish_notification(
        &self,
        recipient_id: &Uuid,
        json_data: &str,
    ) -> Result<(), RedisError> {
        self.client
            .get_multiplexed_async_connection()
            .await?
            .publish(notification_channel(recipient_id), json_data)
            .await
    }
}
