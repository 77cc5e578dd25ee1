use serde::Serialize;
use utoipa::ToSchema;

use crate::models::ProductImage;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoredFile {
    pub field: String,
    pub original_name: String,
    pub filename: String,
    pub url: String,
    pub content_type: String,
    pub size: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResult {
    pub files: Vec<StoredFile>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductImageUpload {
    pub files: Vec<StoredFile>,
    pub images: Vec<ProductImage>,
}
