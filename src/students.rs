//! HTTP surface of the service. One route per student operation,
//! mirroring the collection: `/student` for the whole set, `/student/:id`
//! for a single record.

use std::str::FromStr;

use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::handler::Handler;
use axum::routing::{get, patch};
use axum::{Extension, Json, Router};
use uuid::Uuid;

use crate::err;
use crate::models::{CleanupResult, DeleteResult, Student, StudentFields, StudentPatch};
use crate::repo::StudentRepository;
use crate::Payload;

pub fn router(repo: StudentRepository) -> Router {
    Router::new()
        .route(
            "/student",
            get(list_students)
                .post(create_student)
                .delete(delete_invalid_students),
        )
        .route("/student/:id", patch(update_student).delete(delete_student))
        .fallback(err::handler404.into_service())
        .layer(Extension(repo))
}

async fn list_students(Extension(repo): Extension<StudentRepository>) -> Payload<Vec<Student>> {
    Ok(Json(repo.list().await?))
}

// A rejected body surfaces as the crate's error, not the framework's
// plain-text reply.
async fn create_student(
    Extension(repo): Extension<StudentRepository>,
    body: Result<Json<StudentFields>, JsonRejection>,
) -> Payload<Student> {
    let Json(fields) = body?;
    log::debug!("Creating student: {:?}", fields);
    Ok(Json(repo.create(fields).await?))
}

async fn update_student(
    Extension(repo): Extension<StudentRepository>,
    Path(id): Path<String>,
    body: Result<Json<StudentPatch>, JsonRejection>,
) -> Payload<Student> {
    let Json(patch) = body?;
    log::debug!("Updating student {}: {:?}", id, patch);
    let id = Uuid::from_str(&id)?;
    Ok(Json(repo.update_by_id(id, &patch).await?))
}

async fn delete_student(
    Extension(repo): Extension<StudentRepository>,
    Path(id): Path<String>,
) -> Payload<DeleteResult> {
    let id = Uuid::from_str(&id)?;
    Ok(Json(repo.delete_by_id(id).await?))
}

async fn delete_invalid_students(
    Extension(repo): Extension<StudentRepository>,
) -> Payload<CleanupResult> {
    Ok(Json(repo.delete_invalid().await?))
}
