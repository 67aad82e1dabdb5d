use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, FacesortService, Result};
use facesort_domain::matching::{self, CandidateEmbeddings, GalleryCandidate};
use facesort_storage::{models::MatchRecord, queries};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FindMatchesRequest {
	pub student_id: String,
	/// Overrides `matching.default_threshold` for this request. Similarity
	/// must strictly exceed the threshold to qualify.
	pub threshold: Option<f32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchItem {
	pub gallery_image_id: Uuid,
	pub image_url: String,
	pub similarity: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FindMatchesResponse {
	pub student_id: String,
	pub school_id: String,
	pub matches: Vec<MatchItem>,
	pub count: usize,
}

impl FacesortService {
	/// Matches a student's stored embedding against their school's gallery
	/// and persists the qualifying matches, overwriting earlier results for
	/// the same (student, image) pair.
	pub async fn find_matches(&self, req: FindMatchesRequest) -> Result<FindMatchesResponse> {
		let student_id = req.student_id.trim();

		if student_id.is_empty() {
			return Err(Error::InvalidRequest { message: "student_id is required.".to_string() });
		}

		let threshold = resolve_threshold(req.threshold, self.cfg.matching.default_threshold)?;
		let Some(student) = queries::find_student(&self.db, student_id).await? else {
			return Err(Error::NotFound {
				message: format!("Student {student_id} is not enrolled."),
			});
		};
		let Some(student_embedding) = student.embedding else {
			return Err(Error::InvalidState {
				message: format!("Student {student_id} has no embedding."),
			});
		};
		let school_id = student.school_id;
		let images = queries::list_gallery_images(&self.db, &school_id).await?;
		let faces = queries::list_gallery_faces(&self.db, &school_id).await?;

		tracing::debug!(
			school_id = school_id.as_str(),
			image_count = images.len(),
			threshold,
			"Fetched gallery for matching."
		);

		let mut faces_by_image: HashMap<Uuid, Vec<Vec<f32>>> = HashMap::new();

		for face in faces {
			faces_by_image.entry(face.image_id).or_default().push(face.embedding);
		}

		let mut gallery = Vec::with_capacity(images.len());

		for image in images {
			let face_vectors = faces_by_image.remove(&image.image_id).unwrap_or_default();
			let Some(embeddings) = CandidateEmbeddings::resolve(face_vectors, image.embedding)
			else {
				tracing::debug!(
					image_id = %image.image_id,
					"Gallery image has no embedding; skipping."
				);

				continue;
			};

			gallery.push(GalleryCandidate {
				image_id: image.image_id,
				image_url: image.image_url,
				embeddings,
			});
		}

		let ranked = matching::select_matches(&student_embedding, gallery, threshold)?;
		let now = OffsetDateTime::now_utc();
		let mut failed_upserts = 0_usize;

		// Each upsert targets a distinct (student, image) key, so one failure
		// must not take the rest of the scan down with it.
		for matched in &ranked {
			let record = MatchRecord {
				student_id: student_id.to_string(),
				gallery_image_id: matched.image_id,
				school_id: school_id.clone(),
				image_url: matched.image_url.clone(),
				similarity: matched.similarity,
				student_vector: student_embedding.clone(),
				gallery_vector: matched.matched_vector.clone(),
				created_at: now,
				updated_at: now,
			};

			if let Err(err) = queries::upsert_match(&self.db, &record).await {
				tracing::warn!(
					gallery_image_id = %matched.image_id,
					error = %err,
					"Failed to persist match result."
				);

				failed_upserts += 1;
			}
		}

		if failed_upserts > 0 {
			tracing::warn!(
				failed_upserts,
				total = ranked.len(),
				"Some match results were not persisted."
			);
		}

		let matches: Vec<MatchItem> = ranked
			.into_iter()
			.map(|matched| MatchItem {
				gallery_image_id: matched.image_id,
				image_url: matched.image_url,
				similarity: matched.similarity,
			})
			.collect();
		let count = matches.len();

		Ok(FindMatchesResponse { student_id: student_id.to_string(), school_id, matches, count })
	}
}

fn resolve_threshold(requested: Option<f32>, default: f32) -> Result<f32> {
	let Some(threshold) = requested else {
		return Ok(default);
	};

	if !threshold.is_finite() || !(-1.0..=1.0).contains(&threshold) {
		return Err(Error::InvalidRequest {
			message: "threshold must be a finite number between -1.0 and 1.0.".to_string(),
		});
	}

	Ok(threshold)
}
