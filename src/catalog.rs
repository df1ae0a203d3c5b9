//! Durable product catalog: an append-only JSONL file with an in-memory index.
//!
//! Records are never updated or deleted, so each insert is a single,
//! independently durable line append; a full scan is just a snapshot of the
//! in-memory map. Full-scan ranking is the deliberate design for a catalog
//! in the low thousands.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::product::ProductRecord;

/// Durable collection of product records keyed by id.
#[derive(Debug)]
pub struct CatalogStore {
    dimension: usize,
    records: RwLock<HashMap<String, ProductRecord>>,
    writer: Option<Mutex<tokio::fs::File>>,
}

impl CatalogStore {
    /// Open (or create) a catalog file and load its records.
    ///
    /// Lines that fail to parse, or whose embedding length does not match
    /// `dimension`, are logged and skipped rather than failing the open; a
    /// torn final line from a crashed process must not brick the catalog.
    pub async fn open<P: AsRef<Path>>(path: P, dimension: usize) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut records = HashMap::new();
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => {
                for (lineno, line) in contents.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<ProductRecord>(line) {
                        Ok(record) if record.embedding.len() == dimension => {
                            records.insert(record.id.clone(), record);
                        }
                        Ok(record) => {
                            log::warn!(
                                "Skipping record {} at line {}: embedding length {} != {}",
                                record.id,
                                lineno + 1,
                                record.embedding.len(),
                                dimension
                            );
                        }
                        Err(e) => {
                            log::warn!("Skipping unparsable catalog line {}: {}", lineno + 1, e);
                        }
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;

        log::info!(
            "Opened catalog at {} with {} records",
            path.display(),
            records.len()
        );

        Ok(Self {
            dimension,
            records: RwLock::new(records),
            writer: Some(Mutex::new(file)),
        })
    }

    /// An ephemeral store with no backing file, mainly for tests.
    pub fn in_memory(dimension: usize) -> Self {
        Self {
            dimension,
            records: RwLock::new(HashMap::new()),
            writer: None,
        }
    }

    /// The fixed embedding length every stored record must carry.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Insert a record, assigning `id` and `created_at` when absent.
    ///
    /// Rejects embeddings of the wrong length (`DimensionMismatch`), empty
    /// names and negative prices (`Validation`), and duplicate ids. On any
    /// rejection nothing is written and the count is unchanged.
    pub async fn insert(&self, mut record: ProductRecord) -> Result<ProductRecord> {
        if record.embedding.len() != self.dimension {
            return Err(AppError::DimensionMismatch {
                expected: self.dimension,
                actual: record.embedding.len(),
            });
        }
        if record.name.trim().is_empty() {
            return Err(AppError::Validation("name must be non-empty".to_string()));
        }
        if let Some(price) = record.price {
            if price < 0.0 {
                return Err(AppError::Validation(format!(
                    "price must be non-negative, got {}",
                    price
                )));
            }
        }
        if record.id.is_empty() {
            record.id = Uuid::new_v4().to_string();
        }

        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(AppError::Validation(format!(
                "duplicate product id {}",
                record.id
            )));
        }

        // Durable before visible: the line is flushed while the write lock
        // is held, so a record never appears in a snapshot without being on
        // disk. Appends are local file writes, never network calls.
        if let Some(writer) = &self.writer {
            let mut line = serde_json::to_string(&record)?;
            line.push('\n');
            let mut file = writer.lock().await;
            file.write_all(line.as_bytes()).await?;
            file.flush().await?;
        }

        records.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    /// Full snapshot of the catalog. Ordering is not guaranteed.
    pub async fn list_all(&self) -> Vec<ProductRecord> {
        self.records.read().await.values().cloned().collect()
    }

    /// Distinct category strings present in the catalog, sorted.
    pub async fn list_categories(&self) -> Vec<String> {
        self.records
            .read()
            .await
            .values()
            .map(|r| r.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of stored records.
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vector::l2_normalize;
    use crate::models::product::ProductCreate;

    const DIM: usize = 4;

    fn create(name: &str, category: &str) -> ProductCreate {
        ProductCreate {
            name: name.to_string(),
            category: category.to_string(),
            image_url: format!("https://example.com/{}.jpg", name),
            price: Some(10.0),
            description: None,
        }
    }

    fn unit(seed: f32) -> Vec<f32> {
        l2_normalize(&[seed, 1.0, 2.0, 3.0])
    }

    #[tokio::test]
    async fn insert_and_list() {
        let store = CatalogStore::in_memory(DIM);
        let stored = store
            .insert(create("Lamp", "Home").into_record(unit(1.0)))
            .await
            .unwrap();
        assert!(!stored.id.is_empty());
        assert_eq!(store.count().await, 1);
        assert_eq!(store.list_all().await[0].name, "Lamp");
    }

    #[tokio::test]
    async fn wrong_dimension_is_rejected_and_count_unchanged() {
        let store = CatalogStore::in_memory(DIM);
        let record = create("Lamp", "Home").into_record(vec![1.0; DIM + 1]);
        let err = store.insert(record).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::DimensionMismatch {
                expected: DIM,
                actual: 5
            }
        ));
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn empty_name_and_negative_price_are_rejected() {
        let store = CatalogStore::in_memory(DIM);
        let err = store
            .insert(create("  ", "Home").into_record(unit(1.0)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut bad_price = create("Lamp", "Home");
        bad_price.price = Some(-5.0);
        let err = store
            .insert(bad_price.into_record(unit(1.0)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn duplicate_ids_are_rejected() {
        let store = CatalogStore::in_memory(DIM);
        let record = create("Lamp", "Home").into_record(unit(1.0));
        let stored = store.insert(record.clone()).await.unwrap();
        let mut dup = create("Other", "Home").into_record(unit(2.0));
        dup.id = stored.id.clone();
        let err = store.insert(dup).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn blank_id_gets_assigned() {
        let store = CatalogStore::in_memory(DIM);
        let mut record = create("Lamp", "Home").into_record(unit(1.0));
        record.id = String::new();
        let stored = store.insert(record).await.unwrap();
        assert!(!stored.id.is_empty());
    }

    #[tokio::test]
    async fn categories_are_distinct_and_sorted() {
        let store = CatalogStore::in_memory(DIM);
        for (name, category) in [
            ("a", "Fashion"),
            ("b", "Electronics"),
            ("c", "Fashion"),
            ("d", "Home"),
        ] {
            store
                .insert(create(name, category).into_record(unit(name.len() as f32)))
                .await
                .unwrap();
        }
        assert_eq!(
            store.list_categories().await,
            vec!["Electronics", "Fashion", "Home"]
        );
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.jsonl");

        {
            let store = CatalogStore::open(&path, DIM).await.unwrap();
            store
                .insert(create("Lamp", "Home").into_record(unit(1.0)))
                .await
                .unwrap();
            store
                .insert(create("Chair", "Furniture").into_record(unit(2.0)))
                .await
                .unwrap();
        }

        let reopened = CatalogStore::open(&path, DIM).await.unwrap();
        assert_eq!(reopened.count().await, 2);
        assert_eq!(
            reopened.list_categories().await,
            vec!["Furniture", "Home"]
        );
    }

    #[tokio::test]
    async fn torn_trailing_line_is_skipped_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.jsonl");

        {
            let store = CatalogStore::open(&path, DIM).await.unwrap();
            store
                .insert(create("Lamp", "Home").into_record(unit(1.0)))
                .await
                .unwrap();
        }
        // Simulate a crash mid-append.
        let mut contents = std::fs::read_to_string(&path).unwrap();
        contents.push_str("{\"id\":\"truncat");
        std::fs::write(&path, contents).unwrap();

        let reopened = CatalogStore::open(&path, DIM).await.unwrap();
        assert_eq!(reopened.count().await, 1);
    }
}
