use std::collections::{HashMap, HashSet};
use std::fs;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::emit;
use crate::normalize::PageFields;
use crate::records::RecordReader;
use crate::settings::Settings;
use crate::template::Template;

/// Generation totals returned after a run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct GenerateStats {
    pub rows: usize,
    pub generated: usize,
    pub skipped: usize,
}

/// One row as `list` shows it: the slug it would get, or `None` if skipped.
#[derive(Debug)]
pub struct PlannedPage {
    pub row: usize,
    pub business_name: String,
    pub city: String,
    pub slug: Option<String>,
}

/// Render one page per valid row into `<output>/<slug>/index.html`.
pub fn generate(settings: &Settings, year: i32) -> Result<GenerateStats> {
    fs::create_dir_all(&settings.output).with_context(|| {
        format!("Failed to create output directory {}", settings.output.display())
    })?;
    let template = Template::load(&settings.template)?;
    let reader = RecordReader::open(&settings.input, settings.delimiter)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template(
        "{spinner:.green} [{elapsed_precise}] {pos} rows ({per_sec}) {msg}",
    )?);

    let mut stats = GenerateStats::default();
    let mut seen_slugs = HashSet::new();

    for item in reader {
        let (row, record) = item?;
        stats.rows += 1;
        pb.inc(1);

        let Some(fields) = PageFields::from_record(&record, year) else {
            debug!("Skipping row {}: business_name or city is empty", row);
            stats.skipped += 1;
            continue;
        };

        if !seen_slugs.insert(fields.slug.clone()) {
            warn!(
                "Row {} maps to slug '{}' already used in this run; overwriting",
                row, fields.slug
            );
        }

        let values: HashMap<&str, &str> = fields.placeholders().into_iter().collect();
        let html = template.safe_substitute(&values);
        let path = emit::write_page(&settings.output, &fields.slug, &html)?;
        debug!("Wrote {}", path.display());

        pb.set_message(fields.slug);
        stats.generated += 1;
    }

    pb.finish_and_clear();
    info!(
        "Processed {} rows ({} generated, {} skipped)",
        stats.rows, stats.generated, stats.skipped
    );
    Ok(stats)
}

/// Read the table and report what `generate` would do, without writing.
pub fn plan(settings: &Settings) -> Result<Vec<PlannedPage>> {
    let reader = RecordReader::open(&settings.input, settings.delimiter)?;
    reader
        .map(|item| {
            let (row, record) = item?;
            let slug = PageFields::from_record(&record, 0).map(|f| f.slug);
            Ok(PlannedPage {
                row,
                business_name: record.business_name,
                city: record.city,
                slug,
            })
        })
        .collect()
}
