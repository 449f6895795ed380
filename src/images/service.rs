use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::model::{
    ImageError, ImageRecord, DELETE_FAILED, FETCH_FAILED, LIST_FAILED, UPLOAD_FAILED,
};
use super::upload::{generate_filename, UploadedFile};

const SELECT_IMAGES: &str = r#"
    SELECT id, filename, original_name, content_type, size, user_id,
           description, location, upload_date
    FROM travelgram.images
"#;

/// Stored bytes with the content type they were uploaded as
#[derive(Debug)]
pub struct ImageContent {
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ImageService {
    pool: PgPool,
}

impl ImageService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store blob and metadata together; neither exists without the other
    pub async fn upload(
        &self,
        user_id: &Uuid,
        file: UploadedFile,
        description: &str,
        location: &str,
    ) -> Result<ImageRecord, ImageError> {
        let filename = generate_filename(&file.extension);
        let size = file.data.len() as i64;
        let db_error = || ImageError::database(UPLOAD_FAILED);

        let mut tx = self.pool.begin().await.map_err(db_error())?;

        sqlx::query(
            "INSERT INTO travelgram.image_blobs (filename, data, length) VALUES ($1, $2, $3)",
        )
        .bind(&filename)
        .bind(&file.data)
        .bind(size)
        .execute(&mut *tx)
        .await
        .map_err(db_error())?;

        let record = sqlx::query_as::<_, ImageRecord>(
            r#"
            INSERT INTO travelgram.images
                (filename, original_name, content_type, size, user_id, description, location)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, filename, original_name, content_type, size, user_id,
                      description, location, upload_date
            "#,
        )
        .bind(&filename)
        .bind(&file.original_name)
        .bind(&file.content_type)
        .bind(size)
        .bind(user_id)
        .bind(description.trim())
        .bind(location.trim())
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error())?;

        tx.commit().await.map_err(db_error())?;

        info!(
            "User {} uploaded image {} ({} bytes)",
            user_id, record.filename, size
        );
        Ok(record)
    }

    pub async fn list_for_user(&self, user_id: &Uuid) -> Result<Vec<ImageRecord>, ImageError> {
        sqlx::query_as::<_, ImageRecord>(&format!(
            "{} WHERE user_id = $1 ORDER BY upload_date DESC, id DESC",
            SELECT_IMAGES
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(ImageError::database(LIST_FAILED))
    }

    async fn find(&self, id: i64, context: &'static str) -> Result<ImageRecord, ImageError> {
        sqlx::query_as::<_, ImageRecord>(&format!("{} WHERE id = $1", SELECT_IMAGES))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(ImageError::database(context))?
            .ok_or(ImageError::NotFound)
    }

    pub async fn content(&self, id: i64) -> Result<ImageContent, ImageError> {
        let record = self.find(id, FETCH_FAILED).await?;

        let data: Vec<u8> =
            sqlx::query_scalar("SELECT data FROM travelgram.image_blobs WHERE filename = $1")
                .bind(&record.filename)
                .fetch_optional(&self.pool)
                .await
                .map_err(ImageError::database(FETCH_FAILED))?
                .ok_or(ImageError::BlobMissing)?;

        Ok(ImageContent {
            content_type: record.content_type,
            data,
        })
    }

    /// Owner-only; record and blob go in one transaction
    pub async fn delete(&self, id: i64, user_id: &Uuid) -> Result<(), ImageError> {
        let db_error = || ImageError::database(DELETE_FAILED);
        let mut tx = self.pool.begin().await.map_err(db_error())?;

        let (owner, filename): (Uuid, String) = sqlx::query_as(
            "SELECT user_id, filename FROM travelgram.images WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error())?
        .ok_or(ImageError::NotFound)?;

        if owner != *user_id {
            return Err(ImageError::Forbidden);
        }

        sqlx::query("DELETE FROM travelgram.images WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error())?;

        sqlx::query("DELETE FROM travelgram.image_blobs WHERE filename = $1")
            .bind(&filename)
            .execute(&mut *tx)
            .await
            .map_err(db_error())?;

        tx.commit().await.map_err(db_error())?;

        info!("User {} deleted image {}", user_id, id);
        Ok(())
    }
}
