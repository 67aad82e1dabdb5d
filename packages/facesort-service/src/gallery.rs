use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, FacesortService, Result};
use facesort_storage::{models::GalleryImage, queries};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AddGalleryImageRequest {
	pub school_id: String,
	pub image_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AddGalleryImageResponse {
	pub gallery_image_id: Uuid,
	pub face_count: usize,
}

impl FacesortService {
	/// Registers a gallery photo for a school, storing one embedding per
	/// detected face. A photo with no detectable face is still stored; the
	/// matcher skips it.
	pub async fn add_gallery_image(
		&self,
		req: AddGalleryImageRequest,
	) -> Result<AddGalleryImageResponse> {
		let school_id = req.school_id.trim();
		let image_url = req.image_url.trim();

		if school_id.is_empty() {
			return Err(Error::InvalidRequest { message: "school_id is required.".to_string() });
		}
		if image_url.is_empty() {
			return Err(Error::InvalidRequest { message: "image_url is required.".to_string() });
		}

		let faces =
			self.providers.face.detect_faces(&self.cfg.providers.face, image_url).await?;

		for embedding in &faces {
			if embedding.len() != self.cfg.matching.embedding_dim as usize {
				return Err(Error::Provider {
					message: format!(
						"Face engine returned a {}-dimensional embedding, expected {}.",
						embedding.len(),
						self.cfg.matching.embedding_dim
					),
				});
			}
		}

		let image = GalleryImage {
			image_id: Uuid::new_v4(),
			school_id: school_id.to_string(),
			image_url: image_url.to_string(),
			embedding: None,
			created_at: OffsetDateTime::now_utc(),
		};

		queries::insert_gallery_image(&self.db, &image, &faces).await?;

		tracing::info!(
			school_id,
			gallery_image_id = %image.image_id,
			face_count = faces.len(),
			"Stored gallery image."
		);

		Ok(AddGalleryImageResponse { gallery_image_id: image.image_id, face_count: faces.len() })
	}
}
