use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub struct StudentRecord {
	pub student_id: String,
	pub school_id: String,
	pub student_name: String,
	pub reference_image_url: Option<String>,
	/// NULL until enrollment has produced a face embedding; matching
	/// requires it to be present.
	pub embedding: Option<Vec<f32>>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct GalleryImage {
	pub image_id: Uuid,
	pub school_id: String,
	pub image_url: String,
	/// Legacy single-face column; newer rows carry gallery_image_faces
	/// rows instead.
	pub embedding: Option<Vec<f32>>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct GalleryImageFace {
	pub image_id: Uuid,
	pub face_index: i32,
	pub embedding: Vec<f32>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct MatchRecord {
	pub student_id: String,
	pub gallery_image_id: Uuid,
	pub school_id: String,
	pub image_url: String,
	pub similarity: f32,
	pub student_vector: Vec<f32>,
	pub gallery_vector: Vec<f32>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
