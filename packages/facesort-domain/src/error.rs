pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("Embedding vectors must be non-empty.")]
	EmptyVector,
	#[error("Embedding dimensions do not match: {left} vs {right}.")]
	DimensionMismatch { left: usize, right: usize },
	#[error("Embedding vector has zero magnitude.")]
	ZeroMagnitude,
}
