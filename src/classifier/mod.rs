pub mod onnx;
pub mod preprocess;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::controller::ApiError;
use onnx::OnnxClassifier;

/// Arg-max of the model output
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Classification {
    pub class: usize,
    pub probability: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Sınıflandırma modeli hazır değil")]
    Unavailable,

    #[error("Geçersiz görüntü dosyası: {0}")]
    InvalidImage(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Failed to load model: {0}")]
    Load(String),
}

impl ApiError for ClassifierError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::InvalidImage(_) => StatusCode::BAD_REQUEST,
            Self::Inference(_) | Self::Load(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Unavailable => "MODEL_UNAVAILABLE",
            Self::InvalidImage(_) => "INVALID_IMAGE",
            Self::Inference(_) | Self::Load(_) => "CLASSIFICATION_FAILED",
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Unavailable => self.to_string(),
            Self::InvalidImage(_) => "Geçersiz görüntü dosyası".to_string(),
            Self::Inference(_) | Self::Load(_) => {
                "Görüntü sınıflandırma sırasında bir hata oluştu".to_string()
            }
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait Classifier: Send + Sync {
    fn classify(&self, image: &[u8]) -> Result<Classification, ClassifierError>;
}

/// Shared, load-once classifier with a readiness flag
#[derive(Clone)]
pub struct ClassifierHandle {
    inner: Option<Arc<dyn Classifier>>,
}

impl ClassifierHandle {
    pub fn ready(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            inner: Some(classifier),
        }
    }

    pub fn unavailable() -> Self {
        Self { inner: None }
    }

    /// Load the model at `path`. A failure leaves the handle unavailable
    /// and the server keeps running.
    pub fn load(path: &Path) -> Self {
        match OnnxClassifier::load(path) {
            Ok(classifier) => {
                info!("Classification model loaded from {}", path.display());
                Self::ready(Arc::new(classifier))
            }
            Err(e) => {
                error!("Classification model unavailable: {}", e);
                Self::unavailable()
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.inner.is_some()
    }

    /// Runs on the blocking pool
    pub async fn classify(&self, image: Vec<u8>) -> Result<Classification, ClassifierError> {
        let classifier = self.inner.clone().ok_or(ClassifierError::Unavailable)?;

        tokio::task::spawn_blocking(move || classifier.classify(&image))
            .await
            .map_err(|e| ClassifierError::Inference(e.to_string()))?
    }
}
