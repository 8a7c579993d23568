use crate::{
    DocServer,
    storage::{InMemoryStorage, Storage},
};

pub struct ServerBuilder<S> {
    pub(crate) storage: S,
}

impl ServerBuilder<InMemoryStorage> {
    pub fn new() -> ServerBuilder<InMemoryStorage> {
        ServerBuilder {
            storage: InMemoryStorage::new(),
        }
    }
}

impl Default for ServerBuilder<InMemoryStorage> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> ServerBuilder<S> {
    pub fn with_storage<S2: Storage>(self, storage: S2) -> ServerBuilder<S2> {
        ServerBuilder { storage }
    }
}

impl<S: Storage> ServerBuilder<S> {
    pub fn build(self) -> DocServer<S> {
        DocServer::new(self.storage)
    }
}
