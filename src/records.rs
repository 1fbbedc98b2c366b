//! Lazy reader for the leads table.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use tracing::warn;

const REQUIRED_COLUMNS: &[&str] = &["business_name", "city"];

/// One row of the leads table. All values are trimmed; absent columns are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub business_name: String,
    pub city: String,
    pub phone: String,
    pub address: String,
    pub rating: String,
    pub maps_url: String,
}

impl Record {
    pub fn is_valid(&self) -> bool {
        !self.business_name.is_empty() && !self.city.is_empty()
    }
}

/// Header positions of the columns we know about.
#[derive(Debug)]
struct Columns {
    business_name: Option<usize>,
    city: Option<usize>,
    phone: Option<usize>,
    address: Option<usize>,
    rating: Option<usize>,
    maps_url: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Columns {
            business_name: find("business_name"),
            city: find("city"),
            phone: find("phone"),
            address: find("address"),
            rating: find("rating"),
            maps_url: find("maps_url"),
        }
    }

    fn record(&self, row: &StringRecord) -> Record {
        let get = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .unwrap_or_default()
                .to_string()
        };
        Record {
            business_name: get(self.business_name),
            city: get(self.city),
            phone: get(self.phone),
            address: get(self.address),
            rating: get(self.rating),
            maps_url: get(self.maps_url),
        }
    }
}

/// Iterator over the data rows of a delimited table with a header row.
/// Yields `(row_number, Record)`; row numbers start at 1 for the first data row.
pub struct RecordReader<R> {
    rows: StringRecordsIntoIter<R>,
    columns: Columns,
    row: usize,
}

impl RecordReader<File> {
    pub fn open(path: &Path, delimiter: u8) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open input table {}", path.display()))?;
        Self::from_reader(file, delimiter)
            .with_context(|| format!("Failed to read header of {}", path.display()))
    }
}

impl<R: Read> RecordReader<R> {
    pub fn from_reader(reader: R, delimiter: u8) -> Result<Self> {
        let mut csv = ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv.headers()?.clone();
        for name in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == *name) {
                warn!("Input table has no '{}' column; every row will be skipped", name);
            }
        }

        Ok(RecordReader {
            columns: Columns::from_headers(&headers),
            rows: csv.into_records(),
            row: 0,
        })
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<(usize, Record)>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.rows.next()?;
        self.row += 1;
        let row = self.row;
        Some(
            result
                .map(|r| (row, self.columns.record(&r)))
                .with_context(|| format!("Failed to parse row {}", row)),
        )
    }
}
