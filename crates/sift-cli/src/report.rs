//! The printed page.

use serde::Serialize;
use sift::{FacetCounts, Record, ViewState};

use crate::args::OutputFormat;

/// One page of a listing view, as printed.
#[derive(Debug, Serialize)]
pub struct PageReport<'a, T> {
    pub match_count: usize,
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub records: Vec<&'a T>,
    pub facets: &'a FacetCounts,
}

impl<'a, T: Record> PageReport<'a, T> {
    pub fn new(view: &'a ViewState<T>) -> Self {
        PageReport {
            match_count: view.match_count(),
            page: view.page_index(),
            page_count: view.page_count(),
            page_size: view.page_size(),
            records: view.visible_records(),
            facets: view.facets(),
        }
    }
}

/// Serializes `data` in the requested format.
pub fn render<T: Serialize>(data: &T, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
    })
}
