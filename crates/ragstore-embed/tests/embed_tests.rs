use ragstore_embed::{get_default_embedder, Embedder, FakeEmbedder};

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[test]
fn fake_embedder_shapes_and_determinism() {
    // Force fake embeddings to avoid loading model weights.
    std::env::set_var("APP_USE_FAKE_EMBEDDINGS", "1");

    let embedder = get_default_embedder().expect("embedder");
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");

    assert_eq!(embs[0].len(), 1024, "embedding dim is 1024");

    let norm: f32 = embs[0].iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    for (a, b) in embs[0].iter().zip(embs[1].iter()) {
        assert!((a - b).abs() <= 1e-6, "same input embeds identically");
    }
}

#[test]
fn fake_embedder_normalizes_tokens() {
    let embedder = FakeEmbedder::new(256);
    let embs = embedder
        .embed_batch(&["Cat.".to_string(), "cat".to_string()])
        .expect("embed_batch");
    let sim = dot(&embs[0], &embs[1]);
    assert!((sim - 1.0).abs() < 1e-5, "case and punctuation are folded (sim={sim})");
}

#[test]
fn fake_embedder_separates_unrelated_texts() {
    let embedder = FakeEmbedder::new(1024);
    let embs = embedder
        .embed_batch(&[
            "the cat sat on the mat".to_string(),
            "quantum flux capacitor readings".to_string(),
            "the cat sat on the mat today".to_string(),
        ])
        .expect("embed_batch");

    let same_topic = dot(&embs[0], &embs[2]);
    let cross_topic = dot(&embs[0], &embs[1]);
    assert!(
        same_topic > cross_topic,
        "overlapping token sets must score higher ({same_topic} vs {cross_topic})"
    );
}

#[test]
fn empty_text_embeds_to_finite_vector() {
    let embedder = FakeEmbedder::new(64);
    let embs = embedder.embed_batch(&[String::new()]).expect("embed_batch");
    assert_eq!(embs[0].len(), 64);
    assert!(embs[0].iter().all(|x| x.is_finite()));
}
