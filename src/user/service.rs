use crate::cache::redis::RedisCache;
use crate::notification::model::{NotificationPayload, NotificationType};
use crate::notification::service::NotificationService;
use crate::user::model::{
    normalize_interests, validate_username, CreateProfileRequest, UpdateProfileRequest,
    UserError, UserProfile, UserRow, UserSummary, MAX_BIO_LENGTH,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

pub const DEFAULT_SEARCH_LIMIT: i64 = 20;
pub const MAX_SEARCH_LIMIT: i64 = 50;

const SELECT_USER: &str = r#"
    SELECT id, email, username, bio, photo_url, interests, created_at
    FROM travelgram.users
    WHERE id = $1
"#;

/// Escape LIKE wildcards so the query is matched literally
pub fn like_prefix_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 1);
    for c in query.trim().to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(Debug, Clone)]
pub struct UserService {
    pool: PgPool,
    redis_cache: Option<RedisCache>,
    notifications: Arc<NotificationService>,
}

impl UserService {
    pub fn new(
        pool: PgPool,
        redis_cache: Option<RedisCache>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            pool,
            redis_cache,
            notifications,
        }
    }

    pub async fn create_profile(
        &self,
        uid: Uuid,
        email: &str,
        request: CreateProfileRequest,
    ) -> Result<UserProfile, UserError> {
        let username = validate_username(&request.username)?;
        let interests = normalize_interests(request.interests);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO travelgram.users (id, email, username, interests)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            RETURNING id, email, username, bio, photo_url, interests, created_at
            "#,
        )
        .bind(uid)
        .bind(email)
        .bind(&username)
        .bind(&interests)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(UserError::ProfileExists)?;

        info!("Created profile {} for user {}", username, uid);
        Ok(UserProfile::from_row(row, Vec::new(), Vec::new()))
    }

    pub async fn get_profile(&self, user_id: &Uuid) -> Result<UserProfile, UserError> {
        if let Some(redis) = &self.redis_cache {
            match redis.get_user_profile(user_id).await {
                Ok(Some(cached)) => match serde_json::from_str::<UserProfile>(&cached) {
                    Ok(profile) => return Ok(profile),
                    Err(e) => warn!("Discarding unreadable cached profile {}: {}", user_id, e),
                },
                Ok(None) => {}
                Err(e) => warn!("Redis error reading profile {}: {}", user_id, e),
            }
        }

        let profile = self.load_profile(user_id).await?;

        if let Some(redis) = &self.redis_cache {
            let json = serde_json::to_string(&profile)?;
            if let Err(e) = redis.cache_user_profile(user_id, &json).await {
                warn!("Failed to cache profile {}: {}", user_id, e);
            }
        }

        Ok(profile)
    }

    async fn load_profile(&self, user_id: &Uuid) -> Result<UserProfile, UserError> {
        let row = sqlx::query_as::<_, UserRow>(SELECT_USER)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(UserError::NotFound)?;

        let followers: Vec<Uuid> = sqlx::query_scalar(
            "SELECT follower_id FROM travelgram.follows WHERE followee_id = $1 ORDER BY created_at, follower_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let following: Vec<Uuid> = sqlx::query_scalar(
            "SELECT followee_id FROM travelgram.follows WHERE follower_id = $1 ORDER BY created_at, followee_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(UserProfile::from_row(row, followers, following))
    }

    pub async fn update_profile(
        &self,
        caller: &Uuid,
        user_id: &Uuid,
        request: UpdateProfileRequest,
    ) -> Result<UserProfile, UserError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM travelgram.users WHERE id = $1)")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Err(UserError::NotFound);
        }
        if caller != user_id {
            return Err(UserError::Forbidden);
        }

        let username = request
            .username
            .as_deref()
            .map(validate_username)
            .transpose()?;
        if let Some(bio) = &request.bio {
            if bio.chars().count() > MAX_BIO_LENGTH {
                return Err(UserError::InvalidInput(format!(
                    "Bio must be at most {} characters",
                    MAX_BIO_LENGTH
                )));
            }
        }
        let interests = request.interests.map(normalize_interests);
        let photo_url = photo_url_change(request.photo_url);

        sqlx::query(
            r#"
            UPDATE travelgram.users SET
                username = COALESCE($2, username),
                bio = COALESCE($3, bio),
                photo_url = CASE WHEN $4 THEN $5 ELSE photo_url END,
                interests = COALESCE($6, interests)
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(username)
        .bind(request.bio)
        .bind(photo_url.is_some())
        .bind(photo_url.flatten())
        .bind(interests)
        .execute(&self.pool)
        .await?;

        self.invalidate(&[*user_id]).await;
        info!("Updated profile for user {}", user_id);

        self.load_profile(user_id).await
    }

    /// Returns whether a new edge was created
    pub async fn follow(&self, follower: &Uuid, followee: &Uuid) -> Result<bool, UserError> {
        if follower == followee {
            return Err(UserError::SelfFollow);
        }

        let mut tx = self.pool.begin().await?;

        let both_exist: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM travelgram.users WHERE id = $1 OR id = $2",
        )
        .bind(follower)
        .bind(followee)
        .fetch_one(&mut *tx)
        .await?;
        if both_exist < 2 {
            return Err(UserError::NotFound);
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO travelgram.follows (follower_id, followee_id)
            VALUES ($1, $2)
            ON CONFLICT (follower_id, followee_id) DO NOTHING
            "#,
        )
        .bind(follower)
        .bind(followee)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            == 1;

        tx.commit().await?;
        self.invalidate(&[*follower, *followee]).await;

        if inserted {
            info!("User {} followed {}", follower, followee);
            self.notifications
                .dispatch(NotificationPayload {
                    recipient_id: *followee,
                    sender_id: *follower,
                    notification_type: NotificationType::Follow,
                    post_id: None,
                    content: String::new(),
                })
                .await;
        }

        Ok(inserted)
    }

    /// Returns whether an edge was removed
    pub async fn unfollow(&self, follower: &Uuid, followee: &Uuid) -> Result<bool, UserError> {
        if follower == followee {
            return Err(UserError::SelfFollow);
        }

        let mut tx = self.pool.begin().await?;

        let target_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM travelgram.users WHERE id = $1)")
                .bind(followee)
                .fetch_one(&mut *tx)
                .await?;
        if !target_exists {
            return Err(UserError::NotFound);
        }

        let removed = sqlx::query(
            "DELETE FROM travelgram.follows WHERE follower_id = $1 AND followee_id = $2",
        )
        .bind(follower)
        .bind(followee)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            == 1;

        tx.commit().await?;
        self.invalidate(&[*follower, *followee]).await;

        if removed {
            info!("User {} unfollowed {}", follower, followee);
        }
        Ok(removed)
    }

    pub async fn search(
        &self,
        query: &str,
        limit: Option<i64>,
    ) -> Result<Vec<UserSummary>, UserError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let limit = limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT);

        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, username, photo_url
            FROM travelgram.users
            WHERE lower(username) LIKE $1 ESCAPE '\'
            ORDER BY username
            LIMIT $2
            "#,
        )
        .bind(like_prefix_pattern(query))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Interests of a profile, for recommendation prompts
    pub async fn interests(&self, user_id: &Uuid) -> Result<Vec<String>, UserError> {
        sqlx::query_scalar("SELECT interests FROM travelgram.users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(UserError::NotFound)
    }

    async fn invalidate(&self, user_ids: &[Uuid]) {
        if let Some(redis) = &self.redis_cache {
            if let Err(e) = redis.invalidate_user_profiles(user_ids).await {
                error!("Failed to invalidate cached profiles: {}", e);
            }
        }
    }
}

/// `None` keeps the stored photo; a blank value clears it
fn photo_url_change(value: Option<String>) -> Option<Option<String>> {
    value.map(|url| {
        let url = url.trim();
        (!url.is_empty()).then(|| url.to_string())
    })
}
