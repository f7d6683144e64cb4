use std::sync::Arc;

use tempfile::TempDir;

use ragstore_core::chunker::ChunkingConfig;
use ragstore_core::types::Meta;
use ragstore_embed::LazyEmbedder;
use ragstore_index::VectorStore;
use ragstore_retrieve::{format_rag_prompt, Retriever};

fn store_with_docs(dir: &TempDir) -> Arc<VectorStore> {
    std::env::set_var("APP_USE_FAKE_EMBEDDINGS", "1");
    let store = Arc::new(
        VectorStore::open(
            dir.path(),
            ChunkingConfig { chunk_size: 64, overlap: 12 },
            LazyEmbedder::new(),
        )
        .expect("open store"),
    );
    store
        .add_document(
            "/docs/cats.txt",
            "The cat sat on the mat. Cats nap in warm sunlight for hours. \
             A cat chased the ball of yarn across the kitchen floor.",
            Meta::new(),
        )
        .expect("add cats");
    store
        .add_document(
            "/docs/dogs.txt",
            "The dog ran in the park. Dogs fetch sticks and bark at squirrels. \
             A dog slept by the fireplace all through the rainy afternoon.",
            Meta::new(),
        )
        .expect("add dogs");
    store
}

#[test]
fn empty_store_yields_empty_context() {
    let tmp = TempDir::new().expect("tempdir");
    std::env::set_var("APP_USE_FAKE_EMBEDDINGS", "1");
    let store = Arc::new(
        VectorStore::open(tmp.path(), ChunkingConfig::default(), LazyEmbedder::new())
            .expect("open store"),
    );
    let retriever = Retriever::new(store);

    let ctx = retriever.retrieve_context("cat", 5, 2000);
    assert_eq!(ctx.context, "");
    assert!(ctx.sources.is_empty());
    assert_eq!(ctx.num_chunks, 0);
    assert_eq!(ctx.total_length, 0);

    let prompt = format_rag_prompt("cat", &ctx.context);
    assert!(prompt.contains("no relevant context was found"));
}

#[test]
fn context_carries_document_tags_and_sources() {
    let tmp = TempDir::new().expect("tempdir");
    let retriever = Retriever::with_threshold(store_with_docs(&tmp), 0.0);

    let ctx = retriever.retrieve_context("cat on the mat", 5, 2000);
    assert!(ctx.num_chunks > 0);
    assert!(ctx.context.starts_with("[Document 1] "));
    assert_eq!(ctx.sources.len(), ctx.num_chunks);
    assert_eq!(ctx.total_length, ctx.context.len());
    assert_eq!(ctx.sources[0].file_path, "/docs/cats.txt");
    for pair in ctx.sources.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn budget_stops_assembly_but_never_blanks_the_first_chunk() {
    let tmp = TempDir::new().expect("tempdir");
    let retriever = Retriever::with_threshold(store_with_docs(&tmp), 0.0);

    let unbounded = retriever.retrieve_context("cats and dogs", 10, 100_000);
    assert!(unbounded.num_chunks > 1, "needs several hits to exercise the budget");

    // A budget of one character still yields the best chunk.
    let tight = retriever.retrieve_context("cats and dogs", 10, 1);
    assert_eq!(tight.num_chunks, 1);
    assert_eq!(tight.sources.len(), 1);
    assert_eq!(tight.sources[0].file_path, unbounded.sources[0].file_path);

    // A mid-sized budget takes fewer chunks than no budget at all.
    let first_len = unbounded.sources.len();
    let mid = retriever.retrieve_context("cats and dogs", 10, 80);
    assert!(mid.num_chunks >= 1 && mid.num_chunks <= first_len);
    // Chunk text alone stays within the budget once more than one chunk is in.
    if mid.num_chunks > 1 {
        let tag_overhead: usize = (1..=mid.num_chunks).map(|i| format!("[Document {i}] ").len()).sum();
        let separators = (mid.num_chunks - 1) * 2;
        assert!(mid.total_length <= 80 + tag_overhead + separators);
    }
}

#[test]
fn prompt_embeds_retrieved_context() {
    let tmp = TempDir::new().expect("tempdir");
    let retriever = Retriever::with_threshold(store_with_docs(&tmp), 0.0);

    let ctx = retriever.retrieve_context("dog park", 3, 2000);
    assert!(ctx.num_chunks > 0);

    let prompt = format_rag_prompt("dog park", &ctx.context);
    assert!(prompt.contains(&ctx.context));
    assert!(prompt.contains("User Question: dog park"));
    assert!(prompt.ends_with("Answer:"));
}
