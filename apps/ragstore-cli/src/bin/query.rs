use std::{env, sync::Arc};

use tracing_subscriber::EnvFilter;

use ragstore_core::chunker::ChunkingConfig;
use ragstore_core::config::{expand_path, Config};
use ragstore_embed::LazyEmbedder;
use ragstore_index::VectorStore;
use ragstore_retrieve::{format_rag_prompt, Retriever};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let config = Config::load()?;
    let settings = config.store_settings();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("Usage: ragstore-query <query> [--limit N] [--threshold T] [--store DIR] [--prompt]");
        eprintln!("Example: ragstore-query 'survival skills' --limit 5 --store ./data/vector_store");
        std::process::exit(1);
    }
    let query_text = &args[0];
    let mut limit = settings.default_k;
    let mut threshold = settings.default_threshold;
    let mut store_dir = settings.dir.clone();
    let mut show_prompt = false;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--limit" => {
                limit = parse_value(&args, i, "--limit");
                i += 1;
            }
            "--threshold" => {
                threshold = parse_value(&args, i, "--threshold");
                i += 1;
            }
            "--store" => {
                if i + 1 < args.len() {
                    store_dir = args[i + 1].clone();
                    i += 1;
                } else {
                    eprintln!("Error: --store requires a directory");
                    std::process::exit(1);
                }
            }
            "--prompt" => show_prompt = true,
            _ => {}
        }
        i += 1;
    }
    let store_dir = expand_path(&store_dir);

    println!("🔍 ragstore-query\n================");
    println!("Query: {}", query_text);
    println!("Store: {}", store_dir.display());

    let chunking = ChunkingConfig { chunk_size: settings.chunk_size, overlap: settings.overlap };
    let store = Arc::new(VectorStore::open(&store_dir, chunking, LazyEmbedder::new())?);

    let results = store.search(query_text, limit, threshold);
    println!("\n🔍 Found {} results for: \"{}\"", results.len(), query_text);
    for (i, result) in results.iter().enumerate() {
        println!(
            "\n  {}. score={:.4}  path={}  chunk {}/{}",
            i + 1,
            result.score,
            result.metadata.file_path,
            result.metadata.chunk_index + 1,
            result.metadata.total_chunks
        );
        println!("     📝 {}", result.content);
    }

    if show_prompt {
        let retriever = Retriever::new(store);
        let ctx = retriever.retrieve_context(query_text, settings.max_chunks, settings.max_context_length);
        println!("\n--- sources ---");
        for s in &ctx.sources {
            println!("  {} (chunk {}, score {:.4})", s.file_path, s.chunk_index, s.score);
        }
        println!("\n--- rag prompt ---\n{}", format_rag_prompt(query_text, &ctx.context));
    }
    Ok(())
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    args.get(i + 1)
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| {
            eprintln!("Error: {} requires a number", flag);
            std::process::exit(1);
        })
}
