use ragstore_core::chunker::{chunk_text, ChunkingConfig};

/// Walk the chunks through the original text and check that, with overlaps
/// removed, they cover it end to end without gaps.
fn assert_covers(text: &str, chunks: &[String]) {
    assert!(!chunks.is_empty());
    let mut search_from = 0usize;
    let mut prev_end = 0usize;
    for (i, chunk) in chunks.iter().enumerate() {
        let at = text[search_from..]
            .find(chunk.as_str())
            .map(|o| o + search_from)
            .unwrap_or_else(|| panic!("chunk {} is not a substring of the source", i));
        // Overlap (at <= prev_end) is fine; a real gap may only be the
        // whitespace that trimming swallowed.
        if at > prev_end {
            assert!(
                text[prev_end..at].trim().is_empty(),
                "gap of non-whitespace text before chunk {}",
                i
            );
        }
        prev_end = prev_end.max(at + chunk.len());
        search_from = at + 1;
    }
    assert!(
        text[prev_end..].trim().is_empty(),
        "text after the last chunk was dropped"
    );
}

#[test]
fn short_text_is_one_chunk() {
    let chunks = chunk_text("Short text", 512, 50);
    assert_eq!(chunks, vec!["Short text".to_string()]);
}

#[test]
fn whitespace_only_text_yields_nothing() {
    assert!(chunk_text("", 512, 50).is_empty());
    assert!(chunk_text("   \n\t ", 512, 50).is_empty());
}

#[test]
fn two_sentences_split_with_overlap() {
    let text = "The cat sat on the mat. The dog ran in the park.";
    let chunks = chunk_text(text, 20, 5);

    assert!(chunks.len() >= 2, "expected at least two chunks, got {:?}", chunks);
    for c in &chunks {
        assert!(c.chars().count() <= 20, "chunk longer than the window: {:?}", c);
    }
    // Consecutive chunks share an overlapping substring.
    for pair in chunks.windows(2) {
        let head: String = pair[1].chars().take(3).collect();
        assert!(
            pair[0].contains(&head),
            "chunks {:?} and {:?} do not overlap",
            pair[0],
            pair[1]
        );
    }
    assert_covers(text, &chunks);
}

#[test]
fn long_text_chunks_cover_source() {
    let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
                Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua! \
                Ut enim ad minim veniam, quis nostrud exercitation ullamco laboris? \
                Duis aute irure dolor in reprehenderit in voluptate velit esse. "
        .repeat(6);
    let chunks = chunk_text(&text, 120, 20);

    assert!(chunks.len() > 3);
    for c in &chunks {
        assert!(c.chars().count() <= 120);
    }
    assert_covers(&text, &chunks);
}

#[test]
fn no_sentence_terminators_cuts_raw_windows() {
    let text = "word ".repeat(100);
    let chunks = chunk_text(&text, 50, 10);
    for c in &chunks {
        assert!(c.chars().count() <= 50);
    }
    assert_covers(&text, &chunks);
}

#[test]
fn multibyte_text_never_panics() {
    let text = "Köpfe über Köpfe. Ärger im Büro! Straße für Straße? ".repeat(20);
    let chunks = chunk_text(&text, 40, 8);
    assert!(!chunks.is_empty());
    for c in &chunks {
        assert!(c.chars().count() <= 40);
    }
}

#[test]
fn config_validation_rejects_bad_windows() {
    assert!(ChunkingConfig { chunk_size: 0, overlap: 0 }.validate().is_err());
    assert!(ChunkingConfig { chunk_size: 100, overlap: 100 }.validate().is_err());
    assert!(ChunkingConfig { chunk_size: 100, overlap: 20 }.validate().is_ok());
    assert!(ChunkingConfig::default().validate().is_ok());
}
