use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::DocumentId;
use crate::storage::{Storage, StorageError};

#[derive(Clone)]
pub struct InMemoryStorage(Arc<Mutex<HashMap<DocumentId, Vec<u8>>>>);

impl InMemoryStorage {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(HashMap::new())))
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for InMemoryStorage {
    fn load(
        &self,
        id: &DocumentId,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, StorageError>> + Send {
        futures::future::ready(Ok(self.0.lock().unwrap().get(id).cloned()))
    }

    fn put(
        &self,
        id: &DocumentId,
        data: Vec<u8>,
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        self.0.lock().unwrap().insert(id.clone(), data);
        futures::future::ready(Ok(()))
    }
}
