use anyhow::Context;
use clap::ValueEnum;
use mlb_stats_api::Table;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Csv,
    /// Array of row objects; nulls are JSON null.
    Json,
}

/// Open `path` for writing, or stdout when no path is given.
pub fn sink(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => {
            let file = File::create(p).with_context(|| format!("cannot create {}", p.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

pub fn write_table<W: Write>(table: &Table, format: Format, out: &mut W) -> anyhow::Result<()> {
    match format {
        Format::Csv => table.write_csv(out)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, &table.to_json_records())?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// A bare id list: one `game_id` column in CSV, a number array in JSON.
pub fn write_game_ids<W: Write>(ids: &[i64], format: Format, out: &mut W) -> anyhow::Result<()> {
    match format {
        Format::Csv => {
            writeln!(out, "game_id")?;
            for id in ids {
                writeln!(out, "{id}")?;
            }
        }
        Format::Json => {
            serde_json::to_writer(&mut *out, ids)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}
