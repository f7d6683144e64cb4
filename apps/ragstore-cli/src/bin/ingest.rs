use std::{env, fs, path::PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use ragstore_core::chunker::ChunkingConfig;
use ragstore_core::config::{expand_path, Config};
use ragstore_core::types::Meta;
use ragstore_embed::LazyEmbedder;
use ragstore_index::VectorStore;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let config = Config::load()?;
    let settings = config.store_settings();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut store_dir: Option<String> = None;
    let mut input: Option<PathBuf> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--store" => {
                if i + 1 < args.len() {
                    store_dir = Some(args[i + 1].clone());
                    i += 1;
                } else {
                    eprintln!("Error: --store requires a directory");
                    std::process::exit(1);
                }
            }
            _ if !args[i].starts_with('-') => input = Some(PathBuf::from(&args[i])),
            _ => {}
        }
        i += 1;
    }
    let Some(input) = input else {
        eprintln!("Usage: ragstore-ingest <file-or-directory> [--store DIR]");
        eprintln!("Example: ragstore-ingest ./docs --store ./data/vector_store");
        std::process::exit(1);
    };
    let store_dir = expand_path(store_dir.unwrap_or(settings.dir));

    println!("ragstore-ingest\n===============");
    println!("Input: {}", input.display());
    println!("Store: {}", store_dir.display());

    let chunking = ChunkingConfig { chunk_size: settings.chunk_size, overlap: settings.overlap };
    let store = VectorStore::open(&store_dir, chunking, LazyEmbedder::new())?;

    let files = list_txt_files(&input);
    if files.is_empty() {
        println!("No .txt files found under {}.", input.display());
        return Ok(());
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut added = 0usize;
    let mut skipped = 0usize;
    for file in &files {
        pb.set_message(format!("{}", file.display()));
        let content = read_file_content(file)?;
        if store.add_document(&file.to_string_lossy(), &content, Meta::new())? {
            added += 1;
        } else {
            skipped += 1;
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    let stats = store.stats()?;
    println!("\n✅ Ingest completed");
    println!("📊 Added {} documents, skipped {} (duplicate or empty)", added, skipped);
    println!("📊 Store now holds {} chunks across {} documents", stats.total_chunks, stats.total_documents);
    println!("\n💡 To query, use: cargo run --bin ragstore-query '<query>'");
    Ok(())
}

fn read_file_content(path: &PathBuf) -> anyhow::Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(_) => Ok(String::from_utf8_lossy(&fs::read(path)?).to_string()),
    }
}

fn list_txt_files(root: &PathBuf) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.clone()];
    }
    let mut txt_files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("txt") {
            txt_files.push(path.to_path_buf());
        }
    }
    txt_files.sort();
    txt_files
}
