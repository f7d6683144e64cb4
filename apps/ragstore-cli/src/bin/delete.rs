use std::env;

use tracing_subscriber::EnvFilter;

use ragstore_core::chunker::ChunkingConfig;
use ragstore_core::config::{expand_path, Config};
use ragstore_embed::LazyEmbedder;
use ragstore_index::VectorStore;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let config = Config::load()?;
    let settings = config.store_settings();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut store_dir = settings.dir.clone();
    let mut file_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--store" => {
                if i + 1 < args.len() {
                    store_dir = args[i + 1].clone();
                    i += 1;
                } else {
                    eprintln!("Error: --store requires a directory");
                    std::process::exit(1);
                }
            }
            _ if !args[i].starts_with('-') => file_path = Some(args[i].clone()),
            _ => {}
        }
        i += 1;
    }
    let Some(file_path) = file_path else {
        eprintln!("Usage: ragstore-delete <file_path> [--store DIR]");
        std::process::exit(1);
    };
    let store_dir = expand_path(&store_dir);

    let chunking = ChunkingConfig { chunk_size: settings.chunk_size, overlap: settings.overlap };
    let store = VectorStore::open(&store_dir, chunking, LazyEmbedder::new())?;

    if store.delete_document(&file_path)? {
        let stats = store.stats()?;
        println!("✅ Deleted {}", file_path);
        println!("📊 Store now holds {} chunks across {} documents", stats.total_chunks, stats.total_documents);
    } else {
        println!("⚠️  {} is not in the store", file_path);
    }
    Ok(())
}
