pub mod enroll;
pub mod find;
pub mod gallery;

mod error;

pub use error::{Error, Result};

use std::{future::Future, pin::Pin, sync::Arc};

pub use enroll::{EnrollOp, EnrollStudentRequest, EnrollStudentResponse};
pub use find::{FindMatchesRequest, FindMatchesResponse, MatchItem};
pub use gallery::{AddGalleryImageRequest, AddGalleryImageResponse};

use facesort_config::{Config, FaceProviderConfig};
use facesort_providers::face;
use facesort_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The external face-recognition capability: image URL in, one embedding per
/// detected face out. Injected so tests run without a live engine.
pub trait FaceProvider
where
	Self: Send + Sync,
{
	fn detect_faces<'a>(
		&'a self,
		cfg: &'a FaceProviderConfig,
		image_url: &'a str,
	) -> BoxFuture<'a, facesort_providers::Result<Vec<Vec<f32>>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub face: Arc<dyn FaceProvider>,
}
impl Providers {
	pub fn new(face: Arc<dyn FaceProvider>) -> Self {
		Self { face }
	}
}
impl Default for Providers {
	fn default() -> Self {
		Self { face: Arc::new(DefaultProviders) }
	}
}

struct DefaultProviders;

impl FaceProvider for DefaultProviders {
	fn detect_faces<'a>(
		&'a self,
		cfg: &'a FaceProviderConfig,
		image_url: &'a str,
	) -> BoxFuture<'a, facesort_providers::Result<Vec<Vec<f32>>>> {
		Box::pin(face::detect_faces(cfg, image_url))
	}
}

pub struct FacesortService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
}
impl FacesortService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		Self { cfg, db, providers }
	}
}
