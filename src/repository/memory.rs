use crate::models::Property;
use crate::repository::traits::PropertyRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Process-local catalog, for tests and demos
#[derive(Default)]
pub struct InMemoryRepository {
    records: Mutex<Vec<Property>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Property>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// Make every following `save` fail, as if the backend were unreachable
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<Property> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PropertyRepository for InMemoryRepository {
    async fn load(&self) -> Result<Vec<Property>> {
        let records = self
            .records
            .lock()
            .map_err(|_| anyhow::anyhow!("in-memory catalog lock poisoned"))?;
        Ok(records.clone())
    }

    async fn save(&self, records: &[Property]) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            anyhow::bail!("in-memory backend is unavailable");
        }

        let mut stored = self
            .records
            .lock()
            .map_err(|_| anyhow::anyhow!("in-memory catalog lock poisoned"))?;
        *stored = records.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
