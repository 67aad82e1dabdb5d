use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, FacesortService, Result};
use facesort_storage::{models::StudentRecord, queries};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnrollStudentRequest {
	pub student_id: String,
	pub school_id: String,
	pub student_name: String,
	pub photo_url: String,
}

#[derive(Clone, Debug, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollOp {
	Created,
	Updated,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnrollStudentResponse {
	pub student_id: String,
	pub op: EnrollOp,
	pub faces_detected: usize,
}

impl FacesortService {
	/// Enrolls (or re-enrolls) a student from a reference photo. The face
	/// engine downloads the photo; the first detected face becomes the
	/// student's embedding.
	pub async fn enroll_student(&self, req: EnrollStudentRequest) -> Result<EnrollStudentResponse> {
		let student_id = req.student_id.trim();
		let school_id = req.school_id.trim();
		let student_name = req.student_name.trim();
		let photo_url = req.photo_url.trim();

		for (label, value) in [
			("student_id", student_id),
			("school_id", school_id),
			("student_name", student_name),
			("photo_url", photo_url),
		] {
			if value.is_empty() {
				return Err(Error::InvalidRequest { message: format!("{label} is required.") });
			}
		}

		let faces =
			self.providers.face.detect_faces(&self.cfg.providers.face, photo_url).await?;
		let faces_detected = faces.len();
		let Some(embedding) = faces.into_iter().next() else {
			return Err(Error::InvalidState {
				message: "No face detected in the enrollment photo.".to_string(),
			});
		};

		if embedding.len() != self.cfg.matching.embedding_dim as usize {
			return Err(Error::Provider {
				message: format!(
					"Face engine returned a {}-dimensional embedding, expected {}.",
					embedding.len(),
					self.cfg.matching.embedding_dim
				),
			});
		}

		let existing = queries::find_student(&self.db, student_id).await?;
		let now = OffsetDateTime::now_utc();
		let op = match existing {
			Some(_) => EnrollOp::Updated,
			None => EnrollOp::Created,
		};
		let created_at = existing.map(|record| record.created_at).unwrap_or(now);
		let student = StudentRecord {
			student_id: student_id.to_string(),
			school_id: school_id.to_string(),
			student_name: student_name.to_string(),
			reference_image_url: Some(photo_url.to_string()),
			embedding: Some(embedding),
			created_at,
			updated_at: now,
		};

		queries::upsert_student(&self.db, &student).await?;

		tracing::info!(student_id, school_id, faces_detected, "Enrolled student embedding.");

		Ok(EnrollStudentResponse { student_id: student_id.to_string(), op, faces_detected })
	}
}
