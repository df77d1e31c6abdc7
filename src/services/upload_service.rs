use std::path::Path;

use axum::extract::Multipart;
use serde_json::json;
use uuid::Uuid;

use crate::{
    audit,
    dto::uploads::UploadedImage,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    response::{ApiResponse, Meta},
    state::AppState,
};

const IMAGE_FIELD: &str = "image";
const FEATURED_URL: &str = "/featured";
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "svg", "avif"];

/// Store the `image` field of a multipart form under a fresh name.
pub async fn upload_image(
    state: &AppState,
    user: &AuthUser,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<UploadedImage>> {
    ensure_admin(user)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(AppError::BadRequest("only image uploads are accepted".into()));
        }
        let ext = extension_for(&content_type, field.file_name());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        if bytes.is_empty() {
            return Err(AppError::BadRequest("uploaded image is empty".into()));
        }

        let filename = format!("{}.{ext}", Uuid::new_v4());
        let dir = &state.config.upload_dir;
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        tokio::fs::write(dir.join(&filename), &bytes)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

        tracing::info!(%filename, size = bytes.len(), "image stored");
        audit::record(
            &state.pool,
            Some(user.user_id),
            "image_upload",
            "images",
            json!({ "filename": filename }),
        )
        .await;

        let url = format!(
            "{}/{filename}",
            state.config.image_base_url.trim_end_matches('/')
        );
        return Ok(ApiResponse::success(
            "Image uploaded",
            UploadedImage { filename, url },
            Some(Meta::empty()),
        ));
    }

    Err(AppError::BadRequest("multipart field `image` is missing".into()))
}

/// Preset pictures an admin can pick for an item instead of uploading one.
/// A missing directory just means there are none.
pub async fn featured_images(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<UploadedImage>>> {
    ensure_admin(user)?;

    let dir = &state.config.featured_dir;
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(dir = %dir.display(), "no featured image directory");
            return Ok(ApiResponse::success("Featured images", Vec::new(), Some(Meta::new(0))));
        }
        Err(err) => return Err(AppError::Internal(err.into())),
    };

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::Internal(e.into()))?
    {
        let is_file = entry
            .file_type()
            .await
            .map(|t| t.is_file())
            .unwrap_or(false);
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if is_file && is_image_name(&name) {
            names.push(name);
        }
    }
    names.sort();

    let images: Vec<UploadedImage> = names
        .into_iter()
        .map(|filename| UploadedImage {
            url: format!("{FEATURED_URL}/{filename}"),
            filename,
        })
        .collect();
    let total = images.len() as i64;
    Ok(ApiResponse::success("Featured images", images, Some(Meta::new(total))))
}

fn is_image_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Extension from the content type, falling back to the client file name.
pub fn extension_for(content_type: &str, file_name: Option<&str>) -> String {
    let known = match content_type {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/svg+xml" => Some("svg"),
        "image/avif" => Some("avif"),
        _ => None,
    };
    if let Some(ext) = known {
        return ext.to_string();
    }
    file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "img".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_prefers_content_type() {
        assert_eq!(extension_for("image/jpeg", Some("photo.PNG")), "jpg");
        assert_eq!(extension_for("image/x-icon", Some("fav.ICO")), "ico");
        assert_eq!(extension_for("image/x-icon", Some("../../etc/pa$$")), "img");
        assert_eq!(extension_for("image/heic", None), "img");
    }

    #[test]
    fn featured_listing_keeps_only_pictures() {
        assert!(is_image_name("burger.PNG"));
        assert!(is_image_name("a.b.webp"));
        assert!(!is_image_name("notes.txt"));
        assert!(!is_image_name("png"));
    }
}
