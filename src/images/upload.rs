use axum::extract::multipart::{Field, Multipart, MultipartError};
use axum::http::StatusCode;
use std::path::Path;
use tracing::debug;

use super::model::ImageError;

/// Per-file limit, enforced while the body streams in
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;
/// Whole request limit for image routes; the file limit above is the real one
pub const MAX_BODY_SIZE: usize = 2 * MAX_FILE_SIZE;

pub const FILE_FIELD: &str = "image";
const ALLOWED_TYPES: [&str; 4] = ["jpeg", "jpg", "png", "gif"];

#[derive(Debug)]
pub struct UploadedFile {
    pub original_name: String,
    pub content_type: String,
    /// Lowercased, including the leading dot
    pub extension: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct ImageForm {
    pub file: Option<UploadedFile>,
    pub description: String,
    pub location: String,
}

/// Accepts `image/{jpeg,jpg,png,gif}` with a `.jpeg/.jpg/.png/.gif` name.
/// Returns the normalized extension.
pub fn validate_type(original_name: &str, content_type: &str) -> Result<String, ImageError> {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .filter(|ext| ALLOWED_TYPES.contains(&ext.as_str()))
        .ok_or(ImageError::UnsupportedType)?;

    let subtype = content_type
        .trim()
        .to_lowercase()
        .strip_prefix("image/")
        .map(|s| s.split(';').next().unwrap_or_default().trim().to_string())
        .ok_or(ImageError::UnsupportedType)?;

    if !ALLOWED_TYPES.contains(&subtype.as_str()) {
        return Err(ImageError::UnsupportedType);
    }

    Ok(format!(".{}", extension))
}

/// Random 32-hex-character stem plus the extension
pub fn generate_filename(extension: &str) -> String {
    let bytes: [u8; 16] = rand::random();
    let stem: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{}{}", stem, extension)
}

fn multipart_error(err: MultipartError) -> ImageError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ImageError::TooLarge
    } else {
        ImageError::InvalidMultipart(err.body_text())
    }
}

async fn read_file(mut field: Field<'_>) -> Result<UploadedFile, ImageError> {
    let original_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().unwrap_or_default().to_string();
    let extension = validate_type(&original_name, &content_type)?;

    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if data.len() + chunk.len() > MAX_FILE_SIZE {
            debug!("Rejecting {} after {} bytes", original_name, data.len());
            return Err(ImageError::TooLarge);
        }
        data.extend_from_slice(&chunk);
    }

    Ok(UploadedFile {
        original_name,
        content_type,
        extension,
        data,
    })
}

/// Read the image form. The file is type-checked before its bytes are read
/// and rejected once it grows past `MAX_FILE_SIZE`.
pub async fn read_image_form(multipart: &mut Multipart) -> Result<ImageForm, ImageError> {
    let mut form = ImageForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) if form.file.is_none() => {
                form.file = Some(read_file(field).await?);
            }
            Some("description") => {
                form.description = field.text().await.map_err(multipart_error)?;
            }
            Some("location") => {
                form.location = field.text().await.map_err(multipart_error)?;
            }
            other => debug!("Ignoring multipart field {:?}", other),
        }
    }

    // An empty file part counts as no file
    if form.file.as_ref().is_some_and(|f| f.data.is_empty()) {
        form.file = None;
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_type_accepts_images() {
        assert_eq!(validate_type("beach.JPG", "image/jpeg").unwrap(), ".jpg");
        assert_eq!(validate_type("map.png", "image/png").unwrap(), ".png");
        assert_eq!(validate_type("loop.gif", "image/gif").unwrap(), ".gif");
        assert_eq!(validate_type("a.jpeg", "image/jpg").unwrap(), ".jpeg");
    }

    #[test]
    fn test_validate_type_rejects_others() {
        assert!(validate_type("notes.txt", "text/plain").is_err());
        assert!(validate_type("photo.webp", "image/webp").is_err());
        assert!(validate_type("photo.png", "application/octet-stream").is_err());
        assert!(validate_type("script.png.exe", "image/png").is_err());
        assert!(validate_type("noextension", "image/png").is_err());
    }

    #[test]
    fn test_generate_filename() {
        let name = generate_filename(".png");
        assert_eq!(name.len(), 32 + 4);
        assert!(name.ends_with(".png"));
        assert!(name[..32].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(generate_filename(".png"), name);
    }
}
