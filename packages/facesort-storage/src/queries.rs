use crate::{
	Result,
	db::Db,
	models::{GalleryImage, GalleryImageFace, MatchRecord, StudentRecord},
};

pub async fn find_student(db: &Db, student_id: &str) -> Result<Option<StudentRecord>> {
	let student = sqlx::query_as::<_, StudentRecord>(
		"\
SELECT
	student_id,
	school_id,
	student_name,
	reference_image_url,
	embedding,
	created_at,
	updated_at
FROM students
WHERE student_id = $1",
	)
	.bind(student_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(student)
}

pub async fn upsert_student(db: &Db, student: &StudentRecord) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO students (
	student_id,
	school_id,
	student_name,
	reference_image_url,
	embedding,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7)
ON CONFLICT (student_id) DO UPDATE
SET
	school_id = EXCLUDED.school_id,
	student_name = EXCLUDED.student_name,
	reference_image_url = EXCLUDED.reference_image_url,
	embedding = EXCLUDED.embedding,
	updated_at = EXCLUDED.updated_at",
	)
	.bind(student.student_id.as_str())
	.bind(student.school_id.as_str())
	.bind(student.student_name.as_str())
	.bind(student.reference_image_url.as_deref())
	.bind(student.embedding.as_deref())
	.bind(student.created_at)
	.bind(student.updated_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn list_gallery_images(db: &Db, school_id: &str) -> Result<Vec<GalleryImage>> {
	let images = sqlx::query_as::<_, GalleryImage>(
		"\
SELECT
	image_id,
	school_id,
	image_url,
	embedding,
	created_at
FROM gallery_images
WHERE school_id = $1
ORDER BY created_at, image_id",
	)
	.bind(school_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(images)
}

pub async fn list_gallery_faces(db: &Db, school_id: &str) -> Result<Vec<GalleryImageFace>> {
	let faces = sqlx::query_as::<_, GalleryImageFace>(
		"\
SELECT
	f.image_id,
	f.face_index,
	f.embedding
FROM gallery_image_faces f
JOIN gallery_images i ON i.image_id = f.image_id
WHERE i.school_id = $1
ORDER BY f.image_id, f.face_index",
	)
	.bind(school_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(faces)
}

pub async fn insert_gallery_image(db: &Db, image: &GalleryImage, faces: &[Vec<f32>]) -> Result<()> {
	let mut tx = db.pool.begin().await?;

	sqlx::query(
		"\
INSERT INTO gallery_images (image_id, school_id, image_url, embedding, created_at)
VALUES ($1, $2, $3, $4, $5)",
	)
	.bind(image.image_id)
	.bind(image.school_id.as_str())
	.bind(image.image_url.as_str())
	.bind(image.embedding.as_deref())
	.bind(image.created_at)
	.execute(&mut *tx)
	.await?;

	for (face_index, embedding) in faces.iter().enumerate() {
		sqlx::query(
			"\
INSERT INTO gallery_image_faces (image_id, face_index, embedding)
VALUES ($1, $2, $3)",
		)
		.bind(image.image_id)
		.bind(face_index as i32)
		.bind(embedding.as_slice())
		.execute(&mut *tx)
		.await?;
	}

	tx.commit().await?;

	Ok(())
}

pub async fn upsert_match(db: &Db, record: &MatchRecord) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO match_results (
	student_id,
	gallery_image_id,
	school_id,
	image_url,
	similarity,
	student_vector,
	gallery_vector,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
ON CONFLICT (student_id, gallery_image_id) DO UPDATE
SET
	school_id = EXCLUDED.school_id,
	image_url = EXCLUDED.image_url,
	similarity = EXCLUDED.similarity,
	student_vector = EXCLUDED.student_vector,
	gallery_vector = EXCLUDED.gallery_vector,
	updated_at = EXCLUDED.updated_at",
	)
	.bind(record.student_id.as_str())
	.bind(record.gallery_image_id)
	.bind(record.school_id.as_str())
	.bind(record.image_url.as_str())
	.bind(record.similarity)
	.bind(record.student_vector.as_slice())
	.bind(record.gallery_vector.as_slice())
	.bind(record.created_at)
	.bind(record.updated_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn list_matches(db: &Db, student_id: &str) -> Result<Vec<MatchRecord>> {
	let matches = sqlx::query_as::<_, MatchRecord>(
		"\
SELECT
	student_id,
	gallery_image_id,
	school_id,
	image_url,
	similarity,
	student_vector,
	gallery_vector,
	created_at,
	updated_at
FROM match_results
WHERE student_id = $1
ORDER BY similarity DESC, gallery_image_id",
	)
	.bind(student_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(matches)
}
