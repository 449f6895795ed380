use axum::{
    body::Full,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::info;

use super::model::{
    ClassifyResponse, DeleteResponse, ImageError, ImageListResponse, UploadResponse,
};
use super::service::ImageService;
use super::upload::read_image_form;
use crate::auth::middleware::AuthUser;
use crate::classifier::ClassifierHandle;
use crate::controller::{error_response, ErrorResponse};

/// Upload an image (multipart field `image`, optional `description` and `location`)
#[utoipa::path(
    post,
    path = "/api/images/upload",
    request_body(content = String, content_type = "multipart/form-data", description = "Fields: image, description, location"),
    responses(
        (status = 201, description = "Image stored", body = UploadResponse),
        (status = 400, description = "No file", body = ErrorResponse),
        (status = 413, description = "File larger than 5 MB", body = ErrorResponse),
        (status = 415, description = "Not a jpeg/png/gif image", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "images"
)]
pub async fn upload_image(
    user: AuthUser,
    State(service): State<Arc<ImageService>>,
    mut multipart: Multipart,
) -> Response {
    let form = match read_image_form(&mut multipart).await {
        Ok(form) => form,
        Err(e) => return error_response(e),
    };
    let Some(file) = form.file else {
        return error_response(ImageError::NoFile);
    };

    match service
        .upload(&user.uid, file, &form.description, &form.location)
        .await
    {
        Ok(record) => (
            StatusCode::CREATED,
            Json(UploadResponse {
                success: true,
                image_id: record.id,
                filename: record.filename,
                message: "Resim başarıyla yüklendi".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// List the caller's images, newest first
#[utoipa::path(
    get,
    path = "/api/images/myimages",
    responses(
        (status = 200, description = "The caller's images", body = ImageListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "images"
)]
pub async fn get_user_images(
    user: AuthUser,
    State(service): State<Arc<ImageService>>,
) -> Response {
    match service.list_for_user(&user.uid).await {
        Ok(data) => (
            StatusCode::OK,
            Json(ImageListResponse {
                success: true,
                count: data.len(),
                data,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// Image bytes with their stored content type
#[utoipa::path(
    get,
    path = "/api/images/{id}",
    params(("id" = i64, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image bytes"),
        (status = 404, description = "Image not found", body = ErrorResponse)
    ),
    tag = "images"
)]
pub async fn get_image(State(service): State<Arc<ImageService>>, Path(id): Path<i64>) -> Response {
    match service.content(id).await {
        Ok(content) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content.content_type)],
            Full::from(content.data),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/images/{id}",
    params(("id" = i64, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image deleted", body = DeleteResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "images"
)]
pub async fn delete_image(
    user: AuthUser,
    State(service): State<Arc<ImageService>>,
    Path(id): Path<i64>,
) -> Response {
    match service.delete(id, &user.uid).await {
        Ok(()) => (
            StatusCode::OK,
            Json(DeleteResponse {
                success: true,
                message: "Resim başarıyla silindi".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// Classify an uploaded image with the loaded model
#[utoipa::path(
    post,
    path = "/api/images/classify",
    request_body(content = String, content_type = "multipart/form-data", description = "Field: image"),
    responses(
        (status = 200, description = "Arg-max class and its probability", body = ClassifyResponse),
        (status = 400, description = "No image or unreadable image", body = ErrorResponse),
        (status = 413, description = "File larger than 5 MB", body = ErrorResponse),
        (status = 503, description = "Model not loaded", body = ErrorResponse)
    ),
    tag = "images"
)]
pub async fn classify_image(
    State(classifier): State<ClassifierHandle>,
    mut multipart: Multipart,
) -> Response {
    let form = match read_image_form(&mut multipart).await {
        Ok(form) => form,
        Err(e) => return error_response(e),
    };
    let Some(file) = form.file else {
        return error_response(ImageError::NoImageToClassify);
    };

    match classifier.classify(file.data).await {
        Ok(classification) => {
            info!(
                "Classified {} as class {} ({:.3})",
                file.original_name, classification.class, classification.probability
            );
            (
                StatusCode::OK,
                Json(ClassifyResponse {
                    success: true,
                    classification,
                }),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}
