use time::OffsetDateTime;
use uuid::Uuid;

use facesort_service::{
	AddGalleryImageRequest, EnrollStudentRequest, Error, FindMatchesRequest, Providers,
};
use facesort_storage::{models::GalleryImage, queries};

use super::StubFaces;

const STUDENT_PHOTO: &str = "http://photos/student.jpg";

async fn enroll_probe_student(service: &facesort_service::FacesortService) {
	service
		.enroll_student(EnrollStudentRequest {
			student_id: "STU-001".to_string(),
			school_id: "SCH-001".to_string(),
			student_name: "Alice".to_string(),
			photo_url: STUDENT_PHOTO.to_string(),
		})
		.await
		.expect("Failed to enroll probe student.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FACESORT_PG_DSN to run."]
async fn finds_ranks_and_persists_matches() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping finds_ranks_and_persists_matches; set FACESORT_PG_DSN to run.");

		return;
	};
	let providers = StubFaces::providers(&[
		(STUDENT_PHOTO, vec![vec![1.0, 0.0]]),
		("http://img1.jpg", vec![vec![1.0, 0.0]]),
		("http://img2.jpg", vec![vec![0.0, 1.0]]),
	]);
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	enroll_probe_student(&service).await;

	for url in ["http://img1.jpg", "http://img2.jpg"] {
		service
			.add_gallery_image(AddGalleryImageRequest {
				school_id: "SCH-001".to_string(),
				image_url: url.to_string(),
			})
			.await
			.expect("Failed to add gallery image.");
	}

	let response = service
		.find_matches(FindMatchesRequest {
			student_id: "STU-001".to_string(),
			threshold: Some(0.5),
		})
		.await
		.expect("find_matches failed.");

	assert_eq!(response.school_id, "SCH-001");
	assert_eq!(response.count, 1);
	assert_eq!(response.matches.len(), 1);
	assert_eq!(response.matches[0].image_url, "http://img1.jpg");
	assert_eq!(response.matches[0].similarity, 1.0);

	let persisted =
		queries::list_matches(&service.db, "STU-001").await.expect("Failed to list matches.");

	assert_eq!(persisted.len(), 1);
	assert_eq!(persisted[0].image_url, "http://img1.jpg");
	assert_eq!(persisted[0].similarity, 1.0);
	assert_eq!(persisted[0].student_vector, vec![1.0, 0.0]);
	assert_eq!(persisted[0].gallery_vector, vec![1.0, 0.0]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FACESORT_PG_DSN to run."]
async fn rerun_overwrites_instead_of_duplicating() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping rerun_overwrites_instead_of_duplicating; set FACESORT_PG_DSN to run.");

		return;
	};
	let providers = StubFaces::providers(&[
		(STUDENT_PHOTO, vec![vec![1.0, 0.0]]),
		("http://img1.jpg", vec![vec![0.8, 0.6]]),
	]);
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	enroll_probe_student(&service).await;
	service
		.add_gallery_image(AddGalleryImageRequest {
			school_id: "SCH-001".to_string(),
			image_url: "http://img1.jpg".to_string(),
		})
		.await
		.expect("Failed to add gallery image.");

	let request = FindMatchesRequest { student_id: "STU-001".to_string(), threshold: None };
	let first = service.find_matches(request.clone()).await.expect("First run failed.");
	let second = service.find_matches(request).await.expect("Second run failed.");

	assert_eq!(first.count, second.count);
	assert_eq!(
		first.matches[0].gallery_image_id, second.matches[0].gallery_image_id,
		"Re-running must produce the same ranking."
	);

	let persisted =
		queries::list_matches(&service.db, "STU-001").await.expect("Failed to list matches.");

	assert_eq!(persisted.len(), 1, "Upsert must overwrite, not duplicate.");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FACESORT_PG_DSN to run."]
async fn unknown_student_yields_not_found_and_no_writes() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping unknown_student_yields_not_found_and_no_writes; set FACESORT_PG_DSN.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service =
		super::build_service(cfg, Providers::default()).await.expect("Failed to build service.");
	let err = service
		.find_matches(FindMatchesRequest { student_id: "STU-999".to_string(), threshold: None })
		.await
		.expect_err("Unknown student must fail.");

	assert!(matches!(err, Error::NotFound { .. }));

	let count: i64 = sqlx::query_scalar("SELECT count(*) FROM match_results")
		.fetch_one(&service.db.pool)
		.await
		.expect("Failed to count match results.");

	assert_eq!(count, 0);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FACESORT_PG_DSN to run."]
async fn student_without_embedding_is_invalid_state() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping student_without_embedding_is_invalid_state; set FACESORT_PG_DSN.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service =
		super::build_service(cfg, Providers::default()).await.expect("Failed to build service.");
	let now = OffsetDateTime::now_utc();

	queries::upsert_student(
		&service.db,
		&facesort_storage::models::StudentRecord {
			student_id: "STU-002".to_string(),
			school_id: "SCH-001".to_string(),
			student_name: "Bob".to_string(),
			reference_image_url: None,
			embedding: None,
			created_at: now,
			updated_at: now,
		},
	)
	.await
	.expect("Failed to seed student.");

	let err = service
		.find_matches(FindMatchesRequest { student_id: "STU-002".to_string(), threshold: None })
		.await
		.expect_err("Embedding-less student must fail.");

	assert!(matches!(err, Error::InvalidState { .. }));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FACESORT_PG_DSN to run."]
async fn empty_gallery_succeeds_with_zero_matches() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping empty_gallery_succeeds_with_zero_matches; set FACESORT_PG_DSN.");

		return;
	};
	let providers = StubFaces::providers(&[(STUDENT_PHOTO, vec![vec![1.0, 0.0]])]);
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	enroll_probe_student(&service).await;

	let response = service
		.find_matches(FindMatchesRequest { student_id: "STU-001".to_string(), threshold: None })
		.await
		.expect("find_matches failed.");

	assert_eq!(response.count, 0);
	assert!(response.matches.is_empty());

	let count: i64 = sqlx::query_scalar("SELECT count(*) FROM match_results")
		.fetch_one(&service.db.pool)
		.await
		.expect("Failed to count match results.");

	assert_eq!(count, 0);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FACESORT_PG_DSN to run."]
async fn embeddingless_images_are_skipped() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping embeddingless_images_are_skipped; set FACESORT_PG_DSN to run.");

		return;
	};
	// The stub detects no face in empty.jpg, so the image is stored without
	// embeddings and must be silently excluded from matching.
	let providers = StubFaces::providers(&[
		(STUDENT_PHOTO, vec![vec![1.0, 0.0]]),
		("http://img1.jpg", vec![vec![1.0, 0.0]]),
	]);
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	enroll_probe_student(&service).await;

	for url in ["http://img1.jpg", "http://empty.jpg"] {
		service
			.add_gallery_image(AddGalleryImageRequest {
				school_id: "SCH-001".to_string(),
				image_url: url.to_string(),
			})
			.await
			.expect("Failed to add gallery image.");
	}

	let response = service
		.find_matches(FindMatchesRequest { student_id: "STU-001".to_string(), threshold: None })
		.await
		.expect("find_matches failed.");

	assert_eq!(response.count, 1);
	assert_eq!(response.matches[0].image_url, "http://img1.jpg");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FACESORT_PG_DSN to run."]
async fn legacy_single_embedding_column_still_matches() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping legacy_single_embedding_column_still_matches; set FACESORT_PG_DSN.");

		return;
	};
	let providers = StubFaces::providers(&[(STUDENT_PHOTO, vec![vec![1.0, 0.0]])]);
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	enroll_probe_student(&service).await;

	// Rows written before the per-face schema carry their embedding on the
	// image row itself.
	let legacy = GalleryImage {
		image_id: Uuid::new_v4(),
		school_id: "SCH-001".to_string(),
		image_url: "http://legacy.jpg".to_string(),
		embedding: Some(vec![0.8, 0.6]),
		created_at: OffsetDateTime::now_utc(),
	};

	queries::insert_gallery_image(&service.db, &legacy, &[])
		.await
		.expect("Failed to seed legacy image.");

	let response = service
		.find_matches(FindMatchesRequest {
			student_id: "STU-001".to_string(),
			threshold: Some(0.5),
		})
		.await
		.expect("find_matches failed.");

	assert_eq!(response.count, 1);
	assert_eq!(response.matches[0].image_url, "http://legacy.jpg");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FACESORT_PG_DSN to run."]
async fn multi_face_image_scores_its_best_face() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping multi_face_image_scores_its_best_face; set FACESORT_PG_DSN to run.");

		return;
	};
	let providers = StubFaces::providers(&[
		(STUDENT_PHOTO, vec![vec![1.0, 0.0]]),
		("http://group.jpg", vec![vec![0.0, 1.0], vec![1.0, 0.0]]),
	]);
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	enroll_probe_student(&service).await;
	service
		.add_gallery_image(AddGalleryImageRequest {
			school_id: "SCH-001".to_string(),
			image_url: "http://group.jpg".to_string(),
		})
		.await
		.expect("Failed to add gallery image.");

	let response = service
		.find_matches(FindMatchesRequest {
			student_id: "STU-001".to_string(),
			threshold: Some(0.5),
		})
		.await
		.expect("find_matches failed.");

	assert_eq!(response.count, 1);
	assert_eq!(response.matches[0].similarity, 1.0);

	let persisted =
		queries::list_matches(&service.db, "STU-001").await.expect("Failed to list matches.");

	assert_eq!(persisted[0].gallery_vector, vec![1.0, 0.0], "The winning face is persisted.");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FACESORT_PG_DSN to run."]
async fn gallery_is_scoped_to_the_students_school() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping gallery_is_scoped_to_the_students_school; set FACESORT_PG_DSN.");

		return;
	};
	let providers = StubFaces::providers(&[
		(STUDENT_PHOTO, vec![vec![1.0, 0.0]]),
		("http://other-school.jpg", vec![vec![1.0, 0.0]]),
	]);
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, providers).await.expect("Failed to build service.");

	enroll_probe_student(&service).await;
	service
		.add_gallery_image(AddGalleryImageRequest {
			school_id: "SCH-002".to_string(),
			image_url: "http://other-school.jpg".to_string(),
		})
		.await
		.expect("Failed to add gallery image.");

	let response = service
		.find_matches(FindMatchesRequest { student_id: "STU-001".to_string(), threshold: None })
		.await
		.expect("find_matches failed.");

	assert_eq!(response.count, 0, "A perfect match in another school must not surface.");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
