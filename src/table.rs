//! Time-indexed interest table: one row per sample date, one column per brand.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::io;

use chrono::{DateTime, NaiveTime, Utc};
use csv::WriterBuilder;

use crate::analyzers::utility::mean;
use crate::error::{Error, Result};

/// Interest scores for one search term. `None` marks a date the term has
/// no sample for (only produced when tables with different dates are joined).
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<u32>>,
}

/// Mean interest of one brand over the table's rows.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandInterest {
    pub brand: String,
    pub mean: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterestTable {
    index: Vec<DateTime<Utc>>,
    columns: Vec<Column>,
}

impl InterestTable {
    /// Table with the given dates and no columns yet.
    pub fn with_index(index: Vec<DateTime<Utc>>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// Appends a column. `values` must have one entry per row.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Option<u32>>) -> Result<()> {
        let name = name.into();
        if values.len() != self.index.len() {
            return Err(Error::Shape {
                name,
                expected: self.index.len(),
                got: values.len(),
            });
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// A table without rows or without columns carries no data.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty() || self.columns.is_empty()
    }

    /// Joins tables side by side on their dates.
    ///
    /// The result is indexed by the sorted union of all dates; a column gets
    /// `None` on dates its own table lacks. Columns keep their input order,
    /// and a name seen earlier wins over later duplicates.
    pub fn concat(tables: impl IntoIterator<Item = InterestTable>) -> Self {
        let tables: Vec<InterestTable> = tables.into_iter().filter(|t| !t.is_empty()).collect();

        let index: Vec<DateTime<Utc>> = tables
            .iter()
            .flat_map(|t| t.index.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let position: HashMap<DateTime<Utc>, usize> =
            index.iter().enumerate().map(|(i, d)| (*d, i)).collect();

        let mut combined = Self::with_index(index);
        for table in tables {
            let rows: Vec<usize> = table.index.iter().map(|d| position[d]).collect();
            for column in table.columns {
                let mut values = vec![None; combined.index.len()];
                for (row, value) in rows.iter().zip(column.values) {
                    values[*row] = value;
                }
                combined.columns.push(Column {
                    name: column.name,
                    values,
                });
            }
        }
        combined.dedup_columns();
        combined
    }

    /// Drops every column whose name already appeared to its left.
    pub fn dedup_columns(&mut self) {
        let mut seen = HashSet::new();
        self.columns.retain(|c| seen.insert(c.name.clone()));
    }

    /// Mean of each column over its present values, in column order.
    pub fn means(&self) -> Vec<(String, Option<f64>)> {
        self.columns
            .iter()
            .map(|c| {
                let present: Vec<f64> = c.values.iter().flatten().map(|v| f64::from(*v)).collect();
                (c.name.clone(), mean(&present))
            })
            .collect()
    }

    /// Brands sorted by mean interest, highest first. Ties keep column
    /// order; columns without any value are left out.
    pub fn ranking(&self) -> Vec<BrandInterest> {
        let mut ranking: Vec<BrandInterest> = self
            .means()
            .into_iter()
            .filter_map(|(brand, mean)| mean.map(|mean| BrandInterest { brand, mean }))
            .collect();
        ranking.sort_by(|a, b| b.mean.total_cmp(&a.mean));
        ranking
    }

    /// Writes a `date` column followed by one column per brand. Dates are
    /// printed as `YYYY-MM-DD` unless some row carries a time of day;
    /// missing values are left blank.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);

        let mut header = vec!["date".to_string()];
        header.extend(self.columns.iter().map(|c| c.name.clone()));
        writer.write_record(&header)?;

        let date_only = self.index.iter().all(|d| d.time() == NaiveTime::MIN);
        let format = if date_only { "%Y-%m-%d" } else { "%Y-%m-%d %H:%M:%S" };

        for (row, date) in self.index.iter().enumerate() {
            let mut record = vec![date.format(format).to_string()];
            record.extend(
                self.columns
                    .iter()
                    .map(|c| c.values[row].map(|v| v.to_string()).unwrap_or_default()),
            );
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }
}
