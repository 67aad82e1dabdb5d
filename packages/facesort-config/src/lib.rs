mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, FaceProviderConfig, Matching, Postgres, Providers, Security, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.face.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.face.api_key must be non-empty.".to_string(),
		});
	}
	if cfg.providers.face.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.face.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.face.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.face.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.matching.embedding_dim == 0 {
		return Err(Error::Validation {
			message: "matching.embedding_dim must be greater than zero.".to_string(),
		});
	}
	if cfg.matching.embedding_dim != cfg.providers.face.dimensions {
		return Err(Error::Validation {
			message: "matching.embedding_dim must match providers.face.dimensions.".to_string(),
		});
	}
	if !cfg.matching.default_threshold.is_finite() {
		return Err(Error::Validation {
			message: "matching.default_threshold must be a finite number.".to_string(),
		});
	}
	if !(-1.0..=1.0).contains(&cfg.matching.default_threshold) {
		return Err(Error::Validation {
			message: "matching.default_threshold must be in the range -1.0 to 1.0.".to_string(),
		});
	}

	Ok(())
}
