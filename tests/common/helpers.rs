// Test helper functions

use docrag::core::config::Config;
use docrag::core::embedding;
use docrag::core::search::{LlmProvider, ProviderError};
use docrag::core::services::Services;
use docrag::core::storage::{TantivyVectorStore, VectorStore};
use docrag::core::types::BatchStats;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Services plus the directory backing their collection
#[allow(dead_code)]
pub struct TestServices {
    pub services: Arc<Services>,
    pub provider: Arc<StubProvider>,
    pub data_dir: TempDir,
}

/// Scripted generation service
#[allow(dead_code)]
pub struct StubProvider {
    reply: Option<String>,
    pub calls: AtomicUsize,
    pub last_prompt: Mutex<String>,
}

#[allow(dead_code)]
impl StubProvider {
    /// Always answers `reply`
    pub fn answering(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(String::new()),
        })
    }

    /// Always fails as if nothing listens on the port
    pub fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(String::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LlmProvider for StubProvider {
    fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = prompt.to_string();
        self.reply
            .clone()
            .ok_or_else(|| ProviderError::Unreachable("connection refused".to_string()))
    }

    fn is_available(&self) -> bool {
        self.reply.is_some()
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

/// Configuration rooted in `dir` that indexes `.txt` and `.pdf`
#[allow(dead_code)]
pub fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.storage.db_path = dir.path().join("vector_db");
    config.indexing.extensions = vec!["pdf".to_string(), "txt".to_string()];
    config.indexing.chunk_size = 200;
    config.indexing.overlap = 40;
    config.generation.base_url = "http://127.0.0.1:1/api".to_string();
    config.generation.health_timeout_sec = 1;
    config
}

/// Services over a fresh collection with an answering stub LLM
#[allow(dead_code)]
pub fn create_test_services() -> TestServices {
    create_test_services_with(StubProvider::answering("stub answer"), |_| {})
}

/// Services over a fresh collection with `provider` and config tweaks
#[allow(dead_code)]
pub fn create_test_services_with(
    provider: Arc<StubProvider>,
    tweak: impl FnOnce(&mut Config),
) -> TestServices {
    let data_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = test_config(&data_dir);
    tweak(&mut config);

    let store: Arc<dyn VectorStore> = Arc::new(
        TantivyVectorStore::open(&config.storage.db_path, &config.storage.collection)
            .expect("Failed to open store"),
    );
    let embedder = embedding::from_config(&config.embedding).expect("Failed to build embedder");
    let services = Services::with_components(config, store, embedder, provider.clone())
        .expect("Failed to wire services");

    TestServices {
        services: Arc::new(services),
        provider,
        data_dir,
    }
}

/// Assert that batch stats are internally consistent
#[allow(dead_code)]
pub fn assert_valid_batch(stats: &BatchStats) {
    assert_eq!(
        stats.successful + stats.failed,
        stats.total_files,
        "successful + failed must equal total_files"
    );
    if stats.total_files > 0 {
        let expected = stats.successful as f64 / stats.total_files as f64 * 100.0;
        assert!(
            (stats.success_rate - expected).abs() < 0.01,
            "Expected success_rate {expected}, got {}",
            stats.success_rate
        );
    }
}
