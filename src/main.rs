use std::path::PathBuf;

use clap::Parser;
use comfy_table::{Cell, Table as ComfyTable, presets::UTF8_FULL};
use shardmerge::cursor::collect_rows;
use shardmerge::{BoxedCursor, MergeConfig, MergeEngine, MergeError, RowCursor, SelectStatement};
use shardmerge::cursor::ShardFile;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "shardmerge")]
#[command(about = "Merge per-shard query results into one result set", long_about = None)]
struct Args {
    /// Statement description (ORDER BY, GROUP BY, aggregations, LIMIT) as JSON
    #[arg(short, long)]
    statement: PathBuf,

    /// Config file (defaults to ./shardmerge.toml or /etc/shardmerge/shardmerge.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Shard result files, in shard order
    #[arg(required = true)]
    shards: Vec<PathBuf>,
}

async fn load_shard(shard: usize, path: PathBuf) -> shardmerge::Result<BoxedCursor> {
    let text = tokio::fs::read_to_string(&path).await?;
    let cursor = ShardFile::parse(&text)
        .and_then(ShardFile::into_cursor)
        .map_err(|e| MergeError::Shard { shard, message: format!("{}: {e}", path.display()) })?;
    tracing::debug!(shard, path = %path.display(), "loaded shard result");
    Ok(Box::new(cursor))
}

fn format_result<C: RowCursor>(merged: &mut C) -> shardmerge::Result<String> {
    let rows = collect_rows(merged)?;
    let columns = (1..=merged.column_count())
        .map(|i| merged.column_label(i).map(str::to_string))
        .collect::<shardmerge::Result<Vec<_>>>()?;

    let mut table = ComfyTable::new();
    table.load_preset(UTF8_FULL);
    table.set_header(columns.iter().map(Cell::new));
    for row in &rows {
        table.add_row(row.values.iter().map(Cell::new));
    }

    Ok(format!("{}\n({} rows)\n", table, rows.len()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = MergeConfig::load(args.config.as_deref())?;
    let statement: SelectStatement = serde_json::from_str(&tokio::fs::read_to_string(&args.statement).await?)?;

    let handles: Vec<_> = args
        .shards
        .into_iter()
        .enumerate()
        .map(|(shard, path)| tokio::spawn(load_shard(shard, path)))
        .collect();
    let mut cursors = Vec::with_capacity(handles.len());
    for handle in handles {
        cursors.push(handle.await??);
    }

    tracing::info!(shards = cursors.len(), "merging");
    let mut merged = MergeEngine::with_config(cursors, &statement, config)?.merge()?;
    print!("{}", format_result(&mut merged)?);
    Ok(())
}
