use std::{cmp::Ordering, slice};

use uuid::Uuid;

use crate::{Error, Result, similarity};

/// Candidate embedding set of a gallery image. The schema evolved from a
/// single vector per image to a list of per-face vectors; both forms stay
/// readable and are resolved exactly once per image.
#[derive(Clone, Debug, PartialEq)]
pub enum CandidateEmbeddings {
	Single(Vec<f32>),
	Multiple(Vec<Vec<f32>>),
}
impl CandidateEmbeddings {
	/// Prefers the per-face rows, falls back to the legacy column, `None`
	/// when the image carries no embedding at all (skipped, not an error).
	pub fn resolve(faces: Vec<Vec<f32>>, legacy: Option<Vec<f32>>) -> Option<Self> {
		if !faces.is_empty() {
			return Some(Self::Multiple(faces));
		}

		legacy.map(Self::Single)
	}

	pub fn vectors(&self) -> &[Vec<f32>] {
		match self {
			Self::Single(vector) => slice::from_ref(vector),
			Self::Multiple(vectors) => vectors,
		}
	}
}

#[derive(Clone, Debug)]
pub struct GalleryCandidate {
	pub image_id: Uuid,
	pub image_url: String,
	pub embeddings: CandidateEmbeddings,
}

#[derive(Clone, Debug)]
pub struct RankedMatch {
	pub image_id: Uuid,
	pub image_url: String,
	pub similarity: f32,
	/// The candidate vector that produced `similarity`, kept for the
	/// persisted audit record.
	pub matched_vector: Vec<f32>,
}

/// Best similarity across an image's candidates, with the winning vector.
/// An image with several faces is represented by whichever face matches the
/// probe best.
pub fn best_candidate<'a>(
	probe: &[f32],
	embeddings: &'a CandidateEmbeddings,
) -> Result<(f32, &'a [f32])> {
	let mut best: Option<(f32, &[f32])> = None;

	for vector in embeddings.vectors() {
		let score = similarity::cosine_similarity(probe, vector)?;

		if best.map(|(current, _)| score > current).unwrap_or(true) {
			best = Some((score, vector.as_slice()));
		}
	}

	best.ok_or(Error::EmptyVector)
}

/// Filters the gallery to images whose representative similarity strictly
/// exceeds `threshold` and ranks them by similarity descending. The sort is
/// stable, so ties keep the gallery's input order.
pub fn select_matches(
	probe: &[f32],
	gallery: Vec<GalleryCandidate>,
	threshold: f32,
) -> Result<Vec<RankedMatch>> {
	let mut matches = Vec::new();

	for candidate in gallery {
		let (score, vector) = best_candidate(probe, &candidate.embeddings)?;

		if score > threshold {
			matches.push(RankedMatch {
				image_id: candidate.image_id,
				image_url: candidate.image_url,
				similarity: score,
				matched_vector: vector.to_vec(),
			});
		}
	}

	matches.sort_by(|a, b| cmp_similarity_desc(a.similarity, b.similarity));

	Ok(matches)
}

pub fn cmp_similarity_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}
