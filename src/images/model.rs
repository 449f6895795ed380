use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::classifier::Classification;
use crate::controller::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: i64,
    /// Generated storage name: 32 hex characters plus the original extension
    #[schema(example = "9f86d081884c7d659a2feaa0c55ad015.jpg")]
    pub filename: String,
    pub original_name: String,
    pub content_type: String,
    pub size: i64,
    #[schema(value_type = UuidWrapper)]
    pub user_id: Uuid,
    pub description: String,
    pub location: String,
    #[schema(value_type = DateTimeWrapper)]
    pub upload_date: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub image_id: i64,
    pub filename: String,
    #[schema(example = "Resim başarıyla yüklendi")]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImageListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<ImageRecord>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    #[schema(example = "Resim başarıyla silindi")]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClassifyResponse {
    pub success: bool,
    pub classification: Classification,
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Hiçbir dosya yüklenmedi")]
    NoFile,

    #[error("Lütfen bir görüntü yükleyin")]
    NoImageToClassify,

    #[error("Dosya boyutu 5MB sınırını aşıyor")]
    TooLarge,

    #[error("Sadece resim dosyaları yüklenebilir!")]
    UnsupportedType,

    #[error("Geçersiz form verisi: {0}")]
    InvalidMultipart(String),

    #[error("Resim bulunamadı")]
    NotFound,

    #[error("Dosya bulunamadı")]
    BlobMissing,

    #[error("Bu resmi silme yetkiniz yok")]
    Forbidden,

    /// `context` is the caller-facing message for the failed operation
    #[error("{context}: {source}")]
    Database {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

pub const UPLOAD_FAILED: &str = "Resim yüklenirken bir hata oluştu";
pub const FETCH_FAILED: &str = "Resim görüntülenirken bir hata oluştu";
pub const LIST_FAILED: &str = "Resimler listelenirken bir hata oluştu";
pub const DELETE_FAILED: &str = "Resim silinirken bir hata oluştu";

impl ImageError {
    pub fn database(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Database { context, source }
    }
}

impl ApiError for ImageError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NoFile | Self::NoImageToClassify | Self::InvalidMultipart(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::NotFound | Self::BlobMissing => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::NoFile | Self::NoImageToClassify => "NO_FILE",
            Self::TooLarge => "FILE_TOO_LARGE",
            Self::UnsupportedType => "UNSUPPORTED_TYPE",
            Self::InvalidMultipart(_) => "INVALID_INPUT",
            Self::NotFound | Self::BlobMissing => "NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::Database { .. } => "INTERNAL_ERROR",
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Database { context, .. } => context.to_string(),
            Self::InvalidMultipart(_) => "Geçersiz form verisi".to_string(),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statuses_and_messages() {
        assert_eq!(ImageError::TooLarge.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            ImageError::UnsupportedType.status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(ImageError::NoFile.public_message(), "Hiçbir dosya yüklenmedi");
        assert_eq!(ImageError::Forbidden.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_database_errors_use_operation_message() {
        let err = ImageError::database(DELETE_FAILED)(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), DELETE_FAILED);
    }

    #[test]
    fn test_upload_response_shape() {
        let json = serde_json::to_value(UploadResponse {
            success: true,
            image_id: 4,
            filename: "abc.png".to_string(),
            message: "Resim başarıyla yüklendi".to_string(),
        })
        .unwrap();
        assert_eq!(json["imageId"], 4);
        assert_eq!(json["success"], true);
    }
}
