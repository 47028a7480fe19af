//! Persistence and console output for house lists and interest tables.
//!
//! Files live in one data directory, created on first write.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::table::{BrandInterest, InterestTable};
use crate::trends::{RankedQuery, RelatedQueries};

/// Writes each entry of `lines` on its own line of `dir/filename`, as is,
/// and returns how many were written.
pub fn save_lines(dir: &Path, filename: &str, lines: &[String]) -> Result<usize> {
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);

    let mut writer = BufWriter::new(File::create(&path)?);
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;

    info!(path = %path.display(), count = lines.len(), "Saved lines");
    Ok(lines.len())
}

/// Reads a list written by [`save_lines`], skipping blank lines.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    debug!(path = %path.display(), count = lines.len(), "Read lines");
    Ok(lines)
}

/// Exports `table` as CSV to `dir/filename` and returns the path.
pub fn save_table(dir: &Path, filename: &str, table: &InterestTable) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);

    let writer = BufWriter::new(File::create(&path)?);
    table.write_csv(writer)?;

    info!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.column_count(),
        "Saved trends table"
    );
    Ok(path)
}

pub fn print_houses(houses: &[String]) {
    if houses.is_empty() {
        println!("No fashion houses found.");
        return;
    }
    println!("Found {} fashion houses:", houses.len());
    for house in houses {
        println!("- {house}");
    }
}

/// Prints brands with their mean interest, one per line.
pub fn print_ranking(title: &str, ranking: &[BrandInterest]) {
    println!("\n{title}:");
    let width = ranking.iter().map(|r| r.brand.chars().count()).max().unwrap_or(0);
    for r in ranking {
        println!("{:<width$}  {:>6.2}", r.brand, r.mean);
    }
}

pub fn print_top_brands(season: &str, brands: &[String]) {
    println!("\nTop brands during {season}:");
    for brand in brands {
        println!("- {brand}");
    }
}

/// Prints at most `limit` entries of each related-queries list.
pub fn print_related(brand: &str, related: &RelatedQueries, limit: usize) {
    if related.is_empty() {
        println!("\nNo related queries found for {brand}.");
        return;
    }
    print_queries(&format!("Top related queries for {brand}"), &related.top, limit);
    print_queries(&format!("Rising related queries for {brand}"), &related.rising, limit);
}

fn print_queries(title: &str, queries: &[RankedQuery], limit: usize) {
    if queries.is_empty() {
        return;
    }
    println!("\n{title}:");
    for q in queries.iter().take(limit) {
        println!("{:>8}  {}", q.value, q.query);
    }
}
