//! End-to-end estimates over a fake HTTP backend.
//!
//! Drives the real decoder and lazy range reader through the remote store,
//! the same wiring a selection UI uses.

use std::sync::Arc;

use ggprobe_core::{
    DEFAULT_CONTEXT_LENGTH, EstimateState, GroupedFile, MemoryEstimator, group_shard_files,
};
use ggprobe_gguf::GgufPrefixDecoder;
use ggprobe_hf::testing::FakeBackend;
use ggprobe_hf::{HfModelFileStore, HfRepoRef, HfStoreConfig};

// ----- synthetic GGUF fixture -------------------------------------------

fn push_len_string(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u64).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

fn entry_u32(buf: &mut Vec<u8>, key: &str, value: u32) {
    push_len_string(buf, key);
    buf.extend_from_slice(&4u32.to_le_bytes());
    buf.extend_from_slice(&value.to_le_bytes());
}

fn gguf_fixture() -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"GGUF");
    buf.extend_from_slice(&3u32.to_le_bytes());
    buf.extend_from_slice(&[0u8; 8]);
    buf.extend_from_slice(&4u64.to_le_bytes());
    push_len_string(&mut buf, "general.architecture");
    buf.extend_from_slice(&8u32.to_le_bytes());
    push_len_string(&mut buf, "llama");
    entry_u32(&mut buf, "llama.attention.head_count", 32);
    entry_u32(&mut buf, "llama.block_count", 32);
    entry_u32(&mut buf, "llama.embedding_length", 4096);
    buf
}

fn estimator(backend: FakeBackend) -> Arc<MemoryEstimator> {
    let config = HfStoreConfig::new().with_fetch_chunk_size(32);
    let store = HfModelFileStore::with_backend(
        Arc::new(backend),
        &config,
        HfRepoRef::new("org", "model-gguf"),
    );
    Arc::new(MemoryEstimator::new(
        Arc::new(store),
        Arc::new(GgufPrefixDecoder::new()),
    ))
}

// ----- tests -------------------------------------------------------------

#[tokio::test]
async fn estimates_single_file_end_to_end() {
    let backend =
        FakeBackend::new().with_sized_file("model.gguf", gguf_fixture(), Some(5_000_000_000));
    let estimator = estimator(backend);
    let file = GroupedFile::standalone("model.gguf");

    let estimate = estimator
        .estimate(&file, DEFAULT_CONTEXT_LENGTH)
        .await
        .expect("estimate should succeed");

    assert_eq!(estimate.model_bytes, 5_000_000_000);
    assert_eq!(estimate.kv_cache_bytes, 8_589_934_592);
    assert_eq!(estimate.display, "13.6 GB (Model: 5.0 GB + KV: 8.6 GB)");
}

#[tokio::test]
async fn estimates_sharded_artifact_from_grouped_listing() {
    let backend = FakeBackend::new()
        .with_sized_file(
            "m-00001-of-00002.gguf",
            gguf_fixture(),
            Some(2_000_000_000),
        )
        .with_sized_file("m-00002-of-00002.gguf", Vec::new(), Some(3_000_000_000));
    let estimator = estimator(backend);

    let listing = vec![
        "m-00002-of-00002.gguf".to_string(),
        "m-00001-of-00002.gguf".to_string(),
    ];
    let grouped = group_shard_files(&listing);
    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped[0].display_name, "m.gguf");

    let estimate = estimator
        .estimate(&grouped[0], DEFAULT_CONTEXT_LENGTH)
        .await
        .expect("estimate should succeed");

    // Sizes sum across shards; only the first shard is decoded.
    assert_eq!(estimate.model_bytes, 5_000_000_000);
    assert_eq!(estimate.total_bytes, 13_589_934_592);
}

#[tokio::test]
async fn unresolvable_size_collapses_to_no_estimate() {
    let backend = FakeBackend::new()
        .with_sized_file("model.gguf", gguf_fixture(), None)
        .without_content_range();
    let estimator = estimator(backend);
    let file = GroupedFile::standalone("model.gguf");

    assert!(estimator.estimate(&file, DEFAULT_CONTEXT_LENGTH).await.is_none());
}

#[tokio::test]
async fn non_gguf_file_collapses_to_no_estimate() {
    let backend = FakeBackend::new().with_file("README.md", &b"# hello, not a model"[..]);
    let estimator = estimator(backend);
    let file = GroupedFile::standalone("README.md");

    assert!(estimator.estimate(&file, DEFAULT_CONTEXT_LENGTH).await.is_none());
}

#[tokio::test]
async fn range_ignoring_server_still_decodes() {
    let backend = FakeBackend::new()
        .with_sized_file("model.gguf", gguf_fixture(), Some(2_500_000_000))
        .with_range_ignored();
    let estimator = estimator(backend);
    let file = GroupedFile::standalone("model.gguf");

    let estimate = estimator
        .estimate(&file, DEFAULT_CONTEXT_LENGTH)
        .await
        .expect("estimate should succeed");
    assert_eq!(estimate.model_bytes, 2_500_000_000);
}

#[tokio::test]
async fn spawned_estimates_report_mixed_outcomes() {
    let backend =
        FakeBackend::new().with_sized_file("good.gguf", gguf_fixture(), Some(1_000_000_000));
    let estimator = estimator(backend);

    let files = vec![
        GroupedFile::standalone("good.gguf"),
        GroupedFile::standalone("missing.gguf"),
    ];
    let (mut rx, batch) = estimator.spawn_estimates(&files, DEFAULT_CONTEXT_LENGTH);
    assert_eq!(batch.len(), 2);

    let mut ready = 0;
    let mut unavailable = 0;
    while let Some(update) = rx.recv().await {
        match update.state {
            EstimateState::Ready(_) => ready += 1,
            EstimateState::Unavailable => unavailable += 1,
            EstimateState::Pending => unreachable!("updates carry final states"),
        }
    }
    assert_eq!((ready, unavailable), (1, 1));
}
