use crate::{Error, Result};

/// Normalized dot product of two equal-length vectors, clamped to [-1, 1].
pub fn cosine_similarity(lhs: &[f32], rhs: &[f32]) -> Result<f32> {
	if lhs.is_empty() || rhs.is_empty() {
		return Err(Error::EmptyVector);
	}
	if lhs.len() != rhs.len() {
		return Err(Error::DimensionMismatch { left: lhs.len(), right: rhs.len() });
	}

	let mut dot = 0.0_f32;
	let mut lhs_norm = 0.0_f32;
	let mut rhs_norm = 0.0_f32;

	for (l, r) in lhs.iter().zip(rhs.iter()) {
		dot += l * r;
		lhs_norm += l * l;
		rhs_norm += r * r;
	}

	if lhs_norm <= f32::EPSILON || rhs_norm <= f32::EPSILON {
		return Err(Error::ZeroMagnitude);
	}

	Ok((dot / (lhs_norm.sqrt() * rhs_norm.sqrt())).clamp(-1.0, 1.0))
}
