pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Invalid state: {message}")]
	InvalidState { message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<facesort_storage::Error> for Error {
	fn from(err: facesort_storage::Error) -> Self {
		match err {
			facesort_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			facesort_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			facesort_storage::Error::NotFound(message) => Self::NotFound { message },
		}
	}
}

impl From<facesort_domain::Error> for Error {
	fn from(err: facesort_domain::Error) -> Self {
		Self::InvalidState { message: err.to_string() }
	}
}

impl From<facesort_providers::Error> for Error {
	fn from(err: facesort_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
