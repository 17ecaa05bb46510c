//! The operations the HTTP layer exposes, phrased over [`StudentStore`].

use std::sync::Arc;

use uuid::Uuid;

use crate::err::Error;
use crate::models::{CleanupResult, DeleteResult, Student, StudentFields, StudentPatch};
use crate::store::{Field, Filter, StudentStore};

#[derive(Clone)]
pub struct StudentRepository {
    store: Arc<dyn StudentStore>,
}

impl StudentRepository {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }

    /// Every student on record, oldest first.
    pub async fn list(&self) -> Result<Vec<Student>, Error> {
        self.store.find(&Filter::All).await
    }

    pub async fn create(&self, fields: StudentFields) -> Result<Student, Error> {
        self.store.insert_one(fields).await
    }

    /// Applies a patch to one student. Fails with [`Error::NotFound`]
    /// when no student has that id.
    pub async fn update_by_id(&self, id: Uuid, patch: &StudentPatch) -> Result<Student, Error> {
        self.store
            .find_one_and_update(&Filter::IdIs(id), patch)
            .await?
            .ok_or_else(|| Error::NotFound {
                message: format!("Student with id `{}` does not exist!", id),
            })
    }

    /// Removes one student. Deleting an id that is already gone is not an
    /// error; the result's count says whether anything happened.
    pub async fn delete_by_id(&self, id: Uuid) -> Result<DeleteResult, Error> {
        self.store.delete_one(&Filter::IdIs(id)).await
    }

    /// Removes every student whose name or mark is empty.
    pub async fn delete_invalid(&self) -> Result<CleanupResult, Error> {
        let result = self
            .store
            .delete_many(&Filter::AnyEmpty(vec![Field::Name, Field::Mark]))
            .await?;
        Ok(CleanupResult {
            deleted_count: result.deleted_count,
        })
    }
}
