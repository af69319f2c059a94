use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use huffpack::batch::encode_batch;
use huffpack::config::{CodecConfig, DEFAULT_CONFIG_FILE};
use huffpack::engine::codes::format_code;
use huffpack::engine::{CodeTable, HuffmanTree};
use huffpack::pipeline::{decode_bytes, encode_text_file};
use huffpack::protocol::{Archive, ArchiveHeader};
use huffpack::storage::local::LocalStorage;
use huffpack::storage::{ArchiveStore, TextSource};
use huffpack::utils::io::write_atomic;

#[derive(Parser)]
#[command(name = "huffpack")]
#[command(about = "Huffman coding for text files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Config file path")]
    config: Option<String>,

    #[arg(long, global = true, help = "Data directory path (overrides config)")]
    data: Option<String>,

    #[arg(long, global = true, help = "Do not fold upper case to lower case")]
    keep_case: bool,

    #[arg(long, global = true, help = "Code every character, not only letters")]
    all_chars: bool,

    #[arg(long, global = true, help = "Source bits per symbol for space-saved reporting")]
    bit_width: Option<u32>,

    #[arg(long, global = true, help = "Output as JSON")]
    json: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Encode a text file into an archive
    Encode { input: PathBuf, output: PathBuf },
    /// Decode an archive back into text
    Decode { input: PathBuf, output: PathBuf },
    /// Show an archive's header, code table and tree metadata
    Inspect {
        archive: PathBuf,
        #[arg(long, help = "Print the tree structure")]
        tree: bool,
    },
    /// Encode files into the data directory
    Store {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Decode a stored archive into a file
    Fetch { key: String, output: PathBuf },
    /// Decode a stored archive and check it against its recorded hash
    Verify { key: String },
    /// List stored archives
    List,
    GenerateConfig {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE, help = "Config file path")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("huffpack=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::GenerateConfig { output } = &cli.command {
        CodecConfig::default().save(output)?;
        if cli.json {
            println!("{}", serde_json::json!({ "config": output }));
        } else {
            println!("✅ Wrote default config to {}", output);
        }
        return Ok(());
    }

    // Load configuration
    let mut config = CodecConfig::load_or_create(cli.config.as_deref())?;

    // Override config with CLI args if provided
    if let Some(data) = &cli.data {
        config.data_directory = data.into();
    }
    if cli.keep_case {
        config.normalization.fold_case = false;
    }
    if cli.all_chars {
        config.normalization.letters_only = false;
    }
    if let Some(width) = cli.bit_width {
        config.source_bit_width = width;
    }
    config.validate()?;

    if let Err(e) = run(&cli, &config).await {
        error!("{:#}", e);
        if cli.json {
            println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
        } else {
            eprintln!("❌ {:#}", e);
        }
        return Err(e);
    }

    Ok(())
}

async fn run(cli: &Cli, config: &CodecConfig) -> Result<()> {
    match &cli.command {
        Commands::Encode { input, output } => {
            let source = TextSource::new(input, config.normalization, config.max_input_size);
            let key = input.display().to_string();
            let artifact = encode_text_file(source, key, config.source_bit_width).await?;

            // Only touch the output once encoding has fully succeeded.
            write_atomic(output, &artifact.archive).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&artifact.metadata)?);
            } else {
                for line in &artifact.listing {
                    println!("{}", line);
                }
                for line in artifact.metadata.report.summary_lines() {
                    println!("{}", line);
                }
                println!("OK!");
            }
        }
        Commands::Decode { input, output } => {
            let data = tokio::fs::read(input)
                .await
                .with_context(|| format!("Input File Error: {}", input.display()))?;
            let symbols = decode_bytes(&data)?;
            let text: String = symbols.iter().collect();
            write_atomic(output, text.as_bytes()).await?;

            if cli.json {
                println!("{}", serde_json::json!({ "symbols": symbols.len(), "output": output }));
            } else {
                println!("✅ Decoded {} symbols into {}", symbols.len(), output.display());
            }
        }
        Commands::Inspect { archive, tree } => {
            let data = tokio::fs::read(archive)
                .await
                .with_context(|| format!("Input File Error: {}", archive.display()))?;
            let header = ArchiveHeader::decode(&data)?;
            let parsed = Archive::from_bytes(&data)?;

            let frequencies = parsed.frequencies()?;
            let huffman = HuffmanTree::build(&frequencies)?;
            let codes = CodeTable::from_tree(&huffman);

            if cli.json {
                let table: Vec<_> = frequencies
                    .iter()
                    .map(|(symbol, freq)| {
                        serde_json::json!({
                            "symbol": symbol.to_string(),
                            "frequency": freq,
                            "code": codes.get(symbol).map(format_code),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&serde_json::json!({
                    "version": header.version,
                    "payload_len": header.payload_len,
                    "checksum": format!("{:08x}", header.checksum),
                    "symbol_count": parsed.body.symbol_count,
                    "bit_len": parsed.body.bit_len,
                    "leaf_count": huffman.leaf_count(),
                    "height": huffman.height(),
                    "codes": table,
                }))?);
            } else {
                println!("📦 Archive {}", archive.display());
                println!("   Version: {}", header.version);
                println!("   Payload: {} bytes (crc32 {:08x})", header.payload_len, header.checksum);
                println!("   Symbols: {}", parsed.body.symbol_count);
                println!("   Packed bits: {}", parsed.body.bit_len);
                println!("Number of Leaves: {}", huffman.leaf_count());
                println!("Height of Tree: {}", huffman.height());
                for (symbol, freq) in frequencies.iter() {
                    let code = codes.get(symbol).map(format_code).unwrap_or_default();
                    println!("{}:{}:{}", symbol, freq, code);
                }
                if *tree {
                    print!("{}", huffman.render());
                }
            }
        }
        Commands::Store { inputs } => {
            config.ensure_directories()?;
            let store: Arc<dyn ArchiveStore> =
                Arc::new(LocalStorage::new(config.data_directory.clone()));

            let outcomes = encode_batch(inputs.clone(), config, store).await;
            let failed = outcomes.iter().filter(|o| o.result.is_err()).count();

            if cli.json {
                let rows: Vec<_> = outcomes
                    .iter()
                    .map(|o| match &o.result {
                        Ok(report) => serde_json::json!({
                            "input": o.input, "key": o.key, "report": report,
                        }),
                        Err(e) => serde_json::json!({
                            "input": o.input, "key": o.key, "error": format!("{:#}", e),
                        }),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for outcome in &outcomes {
                    match &outcome.result {
                        Ok(report) => println!(
                            "✅ {} -> {} ({} bits, saved {} bits)",
                            outcome.input.display(),
                            outcome.key.as_deref().unwrap_or("?"),
                            report.packed_bits,
                            report.space_saved_bits
                        ),
                        Err(e) => println!("❌ {}: {:#}", outcome.input.display(), e),
                    }
                }
            }

            if failed > 0 {
                bail!("{} of {} inputs failed", failed, outcomes.len());
            }
            info!("stored {} archives", outcomes.len());
        }
        Commands::Fetch { key, output } => {
            let store = LocalStorage::new(config.data_directory.clone());
            let Some(stored) = store.get(key).await? else {
                bail!("no archive stored under {}", key);
            };
            let symbols = decode_bytes(&stored.data)?;
            let text: String = symbols.iter().collect();
            write_atomic(output, text.as_bytes()).await?;

            if cli.json {
                println!("{}", serde_json::json!({ "key": key, "symbols": symbols.len() }));
            } else {
                println!("✅ Fetched {} ({} symbols) into {}", key, symbols.len(), output.display());
            }
        }
        Commands::Verify { key } => {
            let store = LocalStorage::new(config.data_directory.clone());
            let Some(stored) = store.get(key).await? else {
                bail!("no archive stored under {}", key);
            };
            let symbols = decode_bytes(&stored.data)?;
            let intact = stored.metadata.verify_integrity(&symbols);

            if cli.json {
                println!("{}", serde_json::json!({ "key": key, "verified": intact }));
            } else if intact {
                println!("✅ {} verified ({} symbols)", key, symbols.len());
            } else {
                println!("❌ {} does not match its recorded hash", key);
            }

            if !intact {
                bail!("verification failed for {}", key);
            }
        }
        Commands::List => {
            let store = LocalStorage::new(config.data_directory.clone());
            let keys = store.list().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&keys)?);
            } else {
                for key in keys {
                    println!("{}", key);
                }
            }
        }
        Commands::GenerateConfig { .. } => {}
    }

    Ok(())
}
