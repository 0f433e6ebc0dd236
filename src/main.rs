//! Command-line entry point.
//!
//! The binary is the collaborator around the archive/CSV core: it picks a
//! bundle source (local path or HTTP URL), asks the core for the wanted
//! members, and writes the results out as raw text or JSON records. All
//! configuration flows through the parsed [`Cli`] struct; nothing in the
//! core reads arguments or environment on its own.

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gtfsgrab::{
    ArchiveReader, Cli, CompressionMethod, HttpRangeReader, LocalFileReader, ReadAt, tabular,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet || cli.pipe { "error" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    if cli.is_http_url() {
        let reader = HttpRangeReader::new(cli.feed.clone())
            .await
            .with_context(|| format!("cannot reach feed at {}", cli.feed))?;
        process_feed(Arc::new(reader), &cli).await
    } else {
        let reader = LocalFileReader::new(Path::new(&cli.feed))
            .with_context(|| format!("cannot open feed bundle {}", cli.feed))?;
        process_feed(Arc::new(reader), &cli).await
    }
}

/// Extract the wanted members and route them to the requested output.
async fn process_feed<R: ReadAt + 'static>(reader: Arc<R>, cli: &Cli) -> Result<()> {
    let archive = ArchiveReader::new(reader);

    if cli.list {
        return list_members(&archive).await;
    }

    let wanted = cli.wanted_members();
    let members = archive.extract(&wanted).await?;

    for name in &wanted {
        if !members.contains_key(&name.to_ascii_lowercase()) {
            warn!(member = %name, "requested member not present in bundle");
        }
    }

    let banner = cli.pipe && members.len() > 1;
    for (name, text) in &members {
        if cli.pipe {
            if banner {
                println!("--- {name} ---");
            }
            print!("{text}");
        } else if cli.json {
            write_json(name, text, cli).await?;
        } else {
            write_text(name, text, cli).await?;
        }
    }

    Ok(())
}

/// List bundle contents, one member per line with sizes and method.
async fn list_members<R: ReadAt + 'static>(archive: &ArchiveReader<R>) -> Result<()> {
    let entries = archive.entries().await?;

    println!("{:>10}  {:>10}  {:>8}  Name", "Length", "Size", "Method");
    println!("{}", "-".repeat(50));
    for entry in &entries {
        if entry.is_directory() {
            continue;
        }
        let method = match entry.method {
            CompressionMethod::Stored => "stored".to_string(),
            CompressionMethod::Deflate => "deflate".to_string(),
            CompressionMethod::Unsupported(code) => format!("m{code}"),
        };
        println!(
            "{:>10}  {:>10}  {:>8}  {}",
            entry.uncompressed_size, entry.compressed_size, method, entry.name
        );
    }

    Ok(())
}

/// Write one member's text verbatim under the output directory.
async fn write_text(name: &str, text: &str, cli: &Cli) -> Result<()> {
    let path = match &cli.out_dir {
        Some(dir) => {
            tokio::fs::create_dir_all(dir).await?;
            dir.join(name)
        }
        None => Path::new(name).to_path_buf(),
    };
    tokio::fs::write(&path, text).await?;
    info!(member = %name, path = %path.display(), "wrote member text");
    Ok(())
}

/// Parse one member into records and write them as a JSON array.
///
/// Each record becomes an object with string values, columns in header
/// order. Typed interpretation of columns is left to whatever consumes
/// the JSON.
async fn write_json(name: &str, text: &str, cli: &Cli) -> Result<()> {
    let records = tabular::parse(text);
    let rows: Vec<Value> = records
        .iter()
        .map(|record| {
            let mut object = Map::new();
            for (column, value) in record.iter() {
                object.insert(column.to_string(), Value::String(value.to_string()));
            }
            Value::Object(object)
        })
        .collect();

    let out_name = Path::new(name).with_extension("json");
    let path = match &cli.out_dir {
        Some(dir) => {
            tokio::fs::create_dir_all(dir).await?;
            dir.join(&out_name)
        }
        None => out_name,
    };
    tokio::fs::write(&path, serde_json::to_vec_pretty(&Value::Array(rows))?).await?;
    info!(member = %name, records = records.len(), path = %path.display(), "wrote member records");
    Ok(())
}
