//! Behavioral tests for the student repository over the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use markbook::err::Error;
use markbook::models::{StudentFields, StudentPatch};
use markbook::repo::StudentRepository;
use markbook::store::MemoryStudentStore;

fn repo() -> StudentRepository {
    StudentRepository::new(Arc::new(MemoryStudentStore::new()))
}

fn fields(name: Option<&str>, mark: Option<i32>) -> StudentFields {
    StudentFields {
        name: name.map(str::to_string),
        mark,
        ..StudentFields::default()
    }
}

#[tokio::test]
async fn list_returns_every_stored_record_in_insertion_order() {
    let repo = repo();
    let first = repo.create(fields(Some("Ann"), Some(5))).await.unwrap();
    let second = repo.create(fields(Some("Bob"), Some(4))).await.unwrap();

    let listed = repo.list().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first.id);
    assert_eq!(listed[1].id, second.id);
}

#[tokio::test]
async fn create_assigns_id_and_matching_timestamps() {
    let repo = repo();
    let student = repo.create(fields(Some("Ann"), Some(5))).await.unwrap();

    assert_eq!(student.fields.name.as_deref(), Some("Ann"));
    assert_eq!(student.fields.mark, Some(5));
    assert_eq!(student.created_at, student.updated_at);

    let other = repo.create(fields(Some("Bob"), Some(4))).await.unwrap();
    assert_ne!(student.id, other.id);
}

#[tokio::test]
async fn update_changes_exactly_the_patched_fields() {
    let repo = repo();
    let student = repo
        .create(StudentFields {
            name: Some("Ann".to_string()),
            group: Some("IP-93".to_string()),
            photo: Some("https://example.com/ann.png".to_string()),
            mark: Some(3),
            is_done_pr: Some(false),
        })
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;
    let patch = StudentPatch {
        mark: Some(Some(5)),
        is_done_pr: Some(Some(true)),
        ..StudentPatch::default()
    };
    let updated = repo.update_by_id(student.id, &patch).await.unwrap();

    assert_eq!(updated.id, student.id);
    assert_eq!(updated.fields.name.as_deref(), Some("Ann"));
    assert_eq!(updated.fields.group.as_deref(), Some("IP-93"));
    assert_eq!(
        updated.fields.photo.as_deref(),
        Some("https://example.com/ann.png")
    );
    assert_eq!(updated.fields.mark, Some(5));
    assert_eq!(updated.fields.is_done_pr, Some(true));
    assert_eq!(updated.created_at, student.created_at);
    assert!(updated.updated_at > student.updated_at);
}

#[tokio::test]
async fn an_explicit_null_clears_a_field() {
    let repo = repo();
    let student = repo.create(fields(Some("Ann"), Some(5))).await.unwrap();

    let patch = StudentPatch {
        mark: Some(None),
        ..StudentPatch::default()
    };
    let updated = repo.update_by_id(student.id, &patch).await.unwrap();

    assert_eq!(updated.fields.mark, None);
    assert_eq!(updated.fields.name.as_deref(), Some("Ann"));
}

#[tokio::test]
async fn update_of_a_missing_id_is_not_found_and_mutates_nothing() {
    let repo = repo();
    repo.create(fields(Some("Ann"), Some(5))).await.unwrap();

    let patch = StudentPatch {
        mark: Some(Some(1)),
        ..StudentPatch::default()
    };
    let err = repo.update_by_id(Uuid::new_v4(), &patch).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));

    let listed = repo.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].fields.mark, Some(5));
}

#[tokio::test]
async fn delete_by_id_removes_exactly_one_record() {
    let repo = repo();
    let keep = repo.create(fields(Some("Ann"), Some(5))).await.unwrap();
    let gone = repo.create(fields(Some("Bob"), Some(4))).await.unwrap();

    let result = repo.delete_by_id(gone.id).await.unwrap();
    assert!(result.acknowledged);
    assert_eq!(result.deleted_count, 1);

    let listed = repo.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, keep.id);

    let again = repo.delete_by_id(gone.id).await.unwrap();
    assert!(again.acknowledged);
    assert_eq!(again.deleted_count, 0);
}

#[tokio::test]
async fn cleanup_removes_empty_names_and_missing_marks() {
    let repo = repo();
    repo.create(fields(Some("Ann"), Some(5))).await.unwrap();
    repo.create(fields(None, Some(4))).await.unwrap();
    repo.create(fields(Some(""), Some(3))).await.unwrap();
    repo.create(fields(Some("Bob"), None)).await.unwrap();

    let result = repo.delete_invalid().await.unwrap();
    assert_eq!(result.deleted_count, 3);

    let listed = repo.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].fields.name.as_deref(), Some("Ann"));

    let again = repo.delete_invalid().await.unwrap();
    assert_eq!(again.deleted_count, 0);
}

#[tokio::test]
async fn cleanup_spares_zero_marks_and_whitespace_names() {
    let repo = repo();
    repo.create(fields(Some("Ann"), Some(0))).await.unwrap();
    repo.create(fields(Some("   "), Some(2))).await.unwrap();

    let result = repo.delete_invalid().await.unwrap();
    assert_eq!(result.deleted_count, 0);
    assert_eq!(repo.list().await.unwrap().len(), 2);
}
