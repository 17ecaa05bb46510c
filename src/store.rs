//! Document store access for student records.
//!
//! Handlers never talk to a backend directly; they go through
//! [`StudentStore`], which models the handful of collection operations
//! the service needs. Backends decide how a [`Filter`] is evaluated.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::err::Error;
use crate::models::{DeleteResult, Student, StudentFields, StudentPatch};

/// A single document field that a [`Filter`] can inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Group,
    Photo,
    Mark,
    IsDonePr,
}

impl Field {
    /// The field's key in the stored document.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Group => "group",
            Field::Photo => "photo",
            Field::Mark => "mark",
            Field::IsDonePr => "isDonePr",
        }
    }

    /// String fields count `""` as empty alongside null/missing.
    pub fn is_string(self) -> bool {
        matches!(self, Field::Name | Field::Group | Field::Photo)
    }

    /// Whether this field is empty in the given document.
    pub fn is_empty_in(self, fields: &StudentFields) -> bool {
        match self {
            Field::Name => matches!(fields.name.as_deref(), None | Some("")),
            Field::Group => matches!(fields.group.as_deref(), None | Some("")),
            Field::Photo => matches!(fields.photo.as_deref(), None | Some("")),
            Field::Mark => fields.mark.is_none(),
            Field::IsDonePr => fields.is_done_pr.is_none(),
        }
    }
}

/// Which documents in the collection an operation applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Every document.
    All,
    /// The document with this id, if any.
    IdIs(Uuid),
    /// Documents where at least one of the listed fields is empty.
    AnyEmpty(Vec<Field>),
}

impl Filter {
    pub fn matches(&self, student: &Student) -> bool {
        match self {
            Filter::All => true,
            Filter::IdIs(id) => student.id == *id,
            Filter::AnyEmpty(fields) => {
                fields.iter().any(|field| field.is_empty_in(&student.fields))
            }
        }
    }
}

/// The collection operations a student backend has to provide.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// All matching students, in insertion order.
    async fn find(&self, filter: &Filter) -> Result<Vec<Student>, Error>;

    /// Store a new document and return it with its assigned id and timestamps.
    async fn insert_one(&self, fields: StudentFields) -> Result<Student, Error>;

    /// Patch the first matching document. Returns `None` when nothing matches.
    async fn find_one_and_update(
        &self,
        filter: &Filter,
        patch: &StudentPatch,
    ) -> Result<Option<Student>, Error>;

    /// Remove the first matching document.
    async fn delete_one(&self, filter: &Filter) -> Result<DeleteResult, Error>;

    /// Remove every matching document.
    async fn delete_many(&self, filter: &Filter) -> Result<DeleteResult, Error>;
}

/// Keeps the collection in process memory. This is what the server runs on
/// when no database is configured, and what the behavioral tests run on.
#[derive(Debug, Default)]
pub struct MemoryStudentStore {
    records: RwLock<Vec<Student>>,
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, Vec<Student>>, Error> {
        self.records.read().map_err(poisoned)
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, Vec<Student>>, Error> {
        self.records.write().map_err(poisoned)
    }
}

fn poisoned<T>(_: PoisonError<T>) -> Error {
    Error::StoreUnavailable {
        message: "student store lock is poisoned".to_string(),
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn find(&self, filter: &Filter) -> Result<Vec<Student>, Error> {
        let records = self.read_guard()?;
        Ok(records
            .iter()
            .filter(|student| filter.matches(student))
            .cloned()
            .collect())
    }

    async fn insert_one(&self, fields: StudentFields) -> Result<Student, Error> {
        let now = Utc::now();
        let student = Student {
            id: Uuid::new_v4(),
            fields,
            created_at: now,
            updated_at: now,
        };
        let mut records = self.write_guard()?;
        records.push(student.clone());
        Ok(student)
    }

    async fn find_one_and_update(
        &self,
        filter: &Filter,
        patch: &StudentPatch,
    ) -> Result<Option<Student>, Error> {
        let mut records = self.write_guard()?;
        let student = match records.iter_mut().find(|student| filter.matches(student)) {
            Some(student) => student,
            None => return Ok(None),
        };
        patch.apply(&mut student.fields);
        student.updated_at = Utc::now();
        Ok(Some(student.clone()))
    }

    async fn delete_one(&self, filter: &Filter) -> Result<DeleteResult, Error> {
        let mut records = self.write_guard()?;
        let deleted = match records.iter().position(|student| filter.matches(student)) {
            Some(index) => {
                records.remove(index);
                1
            }
            None => 0,
        };
        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: deleted,
        })
    }

    async fn delete_many(&self, filter: &Filter) -> Result<DeleteResult, Error> {
        let mut records = self.write_guard()?;
        let before = records.len();
        records.retain(|student| !filter.matches(student));
        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: (before - records.len()) as u64,
        })
    }
}
