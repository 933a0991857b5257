use super::KeyValue;
use crate::error::Result;
use std::collections::HashMap;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    values: HashMap<String, String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValue for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::error::ShelfError;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Backend whose writes can be flipped into failure mode mid-test, for
    /// exercising the persist-as-warning path. Reads keep working.
    pub struct FailingStore {
        inner: InMemoryStore,
        fail_writes: Rc<Cell<bool>>,
    }

    impl FailingStore {
        /// Returns the store plus the handle that flips writes into failure.
        pub fn new() -> (Self, Rc<Cell<bool>>) {
            let fail_writes = Rc::new(Cell::new(false));
            let store = Self {
                inner: InMemoryStore::new(),
                fail_writes: Rc::clone(&fail_writes),
            };
            (store, fail_writes)
        }
    }

    impl KeyValue for FailingStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes.get() {
                return Err(ShelfError::Store("write failed".to_string()));
            }
            self.inner.set(key, value)
        }
    }
}
