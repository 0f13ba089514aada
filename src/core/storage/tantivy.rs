//! Tantivy-backed vector collection.
//!
//! Each record is one Tantivy document. The `source` field is an
//! indexed exact-match key so that deletion is a single term delete;
//! vectors are stored as base64-encoded little-endian `f32` bytes and
//! compared by an exact scan at query time.

use crate::core::error::{DocragError, Result};
use crate::core::storage::{similarity, VectorStore};
use crate::core::types::{
    Metadata, NewRecord, SearchResult, SourceKey, StoreStats, StoredRecord, SOURCE_KEY,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tantivy::collector::{Count, TopDocs};
use tantivy::directory::MmapDirectory;
use tantivy::query::{AllQuery, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Schema, Value, INDEXED, STORED, STRING};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};

/// Writer heap budget
const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Distance metric recorded in collection metadata
pub const METRIC: &str = "cosine";

/// Create the Tantivy schema for vector records
///
/// Fields:
/// - id: Record identifier (STRING | STORED)
/// - source: Deletion key (STRING | STORED)
/// - content: Chunk text (STORED)
/// - metadata: JSON-encoded metadata map (STORED)
/// - vector: base64 little-endian f32 bytes (STORED)
/// - seq: Insertion sequence number (u64, INDEXED | STORED)
pub fn create_schema() -> Schema {
    let mut builder = Schema::builder();

    builder.add_text_field("id", STRING | STORED);
    builder.add_text_field("source", STRING | STORED);
    builder.add_text_field("content", STORED);
    builder.add_text_field("metadata", STORED);
    builder.add_text_field("vector", STORED);
    builder.add_u64_field("seq", INDEXED | STORED);

    builder.build()
}

#[derive(Debug, Clone, Copy)]
struct Fields {
    id: Field,
    source: Field,
    content: Field,
    metadata: Field,
    vector: Field,
    seq: Field,
}

impl Fields {
    fn resolve(schema: &Schema) -> Result<Self> {
        let field = |name: &str| {
            schema
                .get_field(name)
                .map_err(|e| DocragError::StoreFailed(format!("Missing {name} field: {e}")))
        };

        Ok(Self {
            id: field("id")?,
            source: field("source")?,
            content: field("content")?,
            metadata: field("metadata")?,
            vector: field("vector")?,
            seq: field("seq")?,
        })
    }
}

/// Collection metadata persisted next to the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionMeta {
    pub name: String,
    pub metric: String,

    /// Fixed by the first committed vector
    pub dimension: Option<usize>,

    /// Sequence number of the next record; never handed out twice
    #[serde(default)]
    pub next_seq: u64,

    pub created_at: String,
}

impl CollectionMeta {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            metric: METRIC.to_string(),
            dimension: None,
            next_seq: 0,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            DocragError::StoreFailed(format!("Failed to read collection metadata: {e}"))
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn load_or_create(path: &Path, name: &str) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }

        let meta = Self::new(name);
        meta.save(path)?;
        Ok(meta)
    }

    fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| {
            DocragError::StoreFailed(format!("Failed to write collection metadata: {e}"))
        })
    }
}

/// Vector collection stored in a Tantivy index.
///
/// Opening only needs a reader. The index writer (and Tantivy's
/// exclusive lock) is held for the duration of a single `store` or
/// `delete_by_source` call, so several handles, in this process or
/// others, can share a collection.
pub struct TantivyVectorStore {
    location: PathBuf,
    collection: String,
    meta_path: PathBuf,
    index: Index,
    reader: IndexReader,
    fields: Fields,

    /// Serializes writers within the process; caches meta.json
    meta: Mutex<CollectionMeta>,
}

impl std::fmt::Debug for TantivyVectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyVectorStore")
            .field("location", &self.location)
            .field("collection", &self.collection)
            .finish()
    }
}

impl TantivyVectorStore {
    /// Open the collection `collection` under `location`, creating it
    /// if absent.
    pub fn open(location: &Path, collection: &str) -> Result<Self> {
        validate_collection_name(collection)?;

        let collection_dir = location.join(collection);
        let index_dir = collection_dir.join("index");
        fs::create_dir_all(&index_dir).map_err(|e| {
            DocragError::StoreFailed(format!(
                "Failed to create collection directory {}: {e}",
                index_dir.display()
            ))
        })?;

        let meta_path = collection_dir.join("meta.json");
        let meta = CollectionMeta::load_or_create(&meta_path, collection)?;

        let directory = MmapDirectory::open(&index_dir)
            .map_err(|e| DocragError::StoreFailed(format!("Failed to open directory: {e}")))?;
        let index = Index::open_or_create(directory, create_schema())
            .map_err(|e| DocragError::StoreFailed(format!("Failed to open index: {e}")))?;
        let fields = Fields::resolve(&index.schema())?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| DocragError::StoreFailed(format!("Failed to create reader: {e}")))?;

        let store = Self {
            location: location.to_path_buf(),
            collection: collection.to_string(),
            meta_path,
            index,
            reader,
            fields,
            meta: Mutex::new(meta),
        };

        let existing = store.scan()?;
        store.reconcile_meta(&existing)?;

        tracing::info!(
            "Opened collection '{}' at {:?} ({} records)",
            collection,
            location,
            existing.len()
        );

        Ok(store)
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Collection metadata as currently persisted
    pub fn meta(&self) -> Result<CollectionMeta> {
        let mut cached = self.lock()?;
        *cached = CollectionMeta::load(&self.meta_path)?;
        Ok(cached.clone())
    }

    /// All records in insertion order
    pub fn records(&self) -> Result<Vec<StoredRecord>> {
        Ok(self.scan()?.into_iter().map(|(_, record)| record).collect())
    }

    fn lock(&self) -> Result<MutexGuard<'_, CollectionMeta>> {
        self.meta
            .lock()
            .map_err(|_| DocragError::StoreFailed("Collection lock poisoned".to_string()))
    }

    /// Take Tantivy's writer lock; released when the writer is dropped
    fn writer(&self) -> Result<IndexWriter> {
        self.index
            .writer(WRITER_HEAP_BYTES)
            .map_err(|e| DocragError::StoreFailed(format!("Failed to create writer: {e}")))
    }

    fn reload(&self) -> Result<()> {
        self.reader
            .reload()
            .map_err(|e| DocragError::StoreFailed(format!("Failed to reload reader: {e}")))
    }

    /// Bring metadata written by older versions in line with the index:
    /// the sequence counter stays above every stored record and the
    /// dimension is taken from the records when missing.
    fn reconcile_meta(&self, existing: &[(u64, StoredRecord)]) -> Result<()> {
        let mut meta = self.lock()?;
        let mut changed = false;

        if let Some((last_seq, _)) = existing.last() {
            if meta.next_seq <= *last_seq {
                meta.next_seq = last_seq + 1;
                changed = true;
            }
        }
        if meta.dimension.is_none() {
            if let Some((_, record)) = existing.first() {
                meta.dimension = Some(record.vector.len());
                changed = true;
            }
        }

        if changed {
            meta.save(&self.meta_path)?;
        }
        Ok(())
    }

    /// Every live record with its sequence number, sorted by sequence
    fn scan(&self) -> Result<Vec<(u64, StoredRecord)>> {
        self.reload()?;
        let searcher = self.reader.searcher();
        let total = searcher.num_docs() as usize;
        if total == 0 {
            return Ok(Vec::new());
        }

        let hits = searcher
            .search(&AllQuery, &TopDocs::with_limit(total))
            .map_err(|e| DocragError::StoreFailed(format!("Scan failed: {e}")))?;

        let mut records = Vec::with_capacity(hits.len());
        for (_score, address) in hits {
            let doc: TantivyDocument = searcher
                .doc(address)
                .map_err(|e| DocragError::StoreFailed(format!("Failed to load record: {e}")))?;
            records.push(self.decode(&doc)?);
        }

        records.sort_by_key(|(seq, _)| *seq);
        Ok(records)
    }

    fn decode(&self, doc: &TantivyDocument) -> Result<(u64, StoredRecord)> {
        let text = |field: Field| {
            doc.get_first(field)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };

        let seq = doc
            .get_first(self.fields.seq)
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        let metadata: Metadata = serde_json::from_str(&text(self.fields.metadata))?;

        Ok((
            seq,
            StoredRecord {
                id: text(self.fields.id),
                vector: decode_vector(&text(self.fields.vector))?,
                content: text(self.fields.content),
                metadata,
            },
        ))
    }
}

impl VectorStore for TantivyVectorStore {
    fn store(&self, records: &[NewRecord]) -> Result<Vec<String>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut meta = self.lock()?;
        let mut writer = self.writer()?;
        // Another handle may have written since the cache was filled
        *meta = CollectionMeta::load(&self.meta_path)?;

        let dimension = meta.dimension.unwrap_or(records[0].vector.len());
        if dimension == 0 {
            return Err(DocragError::StoreFailed("Empty vector".to_string()));
        }

        // Validate the whole batch before anything is written
        for (i, record) in records.iter().enumerate() {
            if record.vector.len() != dimension {
                return Err(DocragError::StoreFailed(format!(
                    "Record {i} has dimension {} but collection '{}' expects {dimension}",
                    record.vector.len(),
                    self.collection
                )));
            }
            if record.vector.iter().any(|x| !x.is_finite()) {
                return Err(DocragError::StoreFailed(format!(
                    "Record {i} contains a non-finite value"
                )));
            }
        }

        let first_seq = meta.next_seq;
        let mut ids = Vec::with_capacity(records.len());
        for (offset, record) in records.iter().enumerate() {
            let seq = first_seq + offset as u64;
            let id = format!("rec-{seq:012}");
            let source = record
                .metadata
                .get(SOURCE_KEY)
                .map(String::as_str)
                .unwrap_or("");
            let metadata = serde_json::to_string(&record.metadata)?;

            // Uncommitted documents are discarded with the writer
            writer
                .add_document(doc!(
                    self.fields.id => id.as_str(),
                    self.fields.source => source,
                    self.fields.content => record.content.as_str(),
                    self.fields.metadata => metadata,
                    self.fields.vector => encode_vector(&record.vector),
                    self.fields.seq => seq,
                ))
                .map_err(|e| DocragError::StoreFailed(format!("Failed to add record: {e}")))?;
            ids.push(id);
        }

        // Reserve the ids before committing; a failed commit leaves a gap
        meta.next_seq = first_seq + records.len() as u64;
        meta.save(&self.meta_path)?;

        writer
            .commit()
            .map_err(|e| DocragError::StoreFailed(format!("Failed to commit: {e}")))?;
        drop(writer);

        if meta.dimension.is_none() {
            meta.dimension = Some(dimension);
            meta.save(&self.meta_path)?;
        }
        drop(meta);
        self.reload()?;

        tracing::debug!(
            "Stored {} records in collection '{}'",
            ids.len(),
            self.collection
        );
        Ok(ids)
    }

    fn query_similar(&self, vector: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        if let Some(dimension) = self.meta()?.dimension {
            if vector.len() != dimension {
                return Err(DocragError::StoreFailed(format!(
                    "Query has dimension {} but collection '{}' expects {dimension}",
                    vector.len(),
                    self.collection
                )));
            }
        }

        let mut scored: Vec<(f32, u64, StoredRecord)> = self
            .scan()?
            .into_iter()
            .map(|(seq, record)| (similarity(vector, &record.vector), seq, record))
            .collect();

        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.cmp(&b.1))
        });
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(similarity, _, record)| SearchResult {
                content: record.content,
                metadata: record.metadata,
                similarity,
            })
            .collect())
    }

    fn delete_by_source(&self, source: &SourceKey) -> Result<usize> {
        let _meta = self.lock()?;
        let mut writer = self.writer()?;
        self.reload()?;

        let term = Term::from_field_text(self.fields.source, source.as_str());
        let matching = self
            .reader
            .searcher()
            .search(
                &TermQuery::new(term.clone(), IndexRecordOption::Basic),
                &Count,
            )
            .map_err(|e| DocragError::StoreFailed(format!("Failed to count records: {e}")))?;

        if matching == 0 {
            return Ok(0);
        }

        writer.delete_term(term);
        writer
            .commit()
            .map_err(|e| DocragError::StoreFailed(format!("Failed to commit: {e}")))?;
        drop(writer);
        self.reload()?;

        tracing::info!("Deleted {} records of {}", matching, source);
        Ok(matching)
    }

    fn stats(&self) -> Result<StoreStats> {
        let records = self.scan()?;
        let sources: BTreeSet<&str> = records
            .iter()
            .filter_map(|(_, r)| r.metadata.get(SOURCE_KEY).map(String::as_str))
            .collect();

        Ok(StoreStats {
            total_records: records.len(),
            distinct_sources: sources.len(),
            collection_name: self.collection.clone(),
            location: self.location.display().to_string(),
        })
    }
}

fn validate_collection_name(name: &str) -> Result<()> {
    let valid = !name.trim().is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\']);
    if valid {
        Ok(())
    } else {
        Err(DocragError::StoreFailed(format!(
            "Invalid collection name '{name}'"
        )))
    }
}

fn encode_vector(vector: &[f32]) -> String {
    let bytes: Vec<u8> = vector.iter().flat_map(|x| x.to_le_bytes()).collect();
    STANDARD.encode(bytes)
}

fn decode_vector(encoded: &str) -> Result<Vec<f32>> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| DocragError::StoreFailed(format!("Corrupt vector: {e}")))?;

    if bytes.len() % 4 != 0 {
        return Err(DocragError::StoreFailed(format!(
            "Corrupt vector: {} bytes",
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}
