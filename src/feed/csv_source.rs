//! Spreadsheet CSV export adapter.
//!
//! Rows are positional: `tag, value, thumbnail, embed, description`. Metadata
//! rows only use the first two cells. Rows may be ragged; missing trailing
//! cells read as empty.

use csv::{ReaderBuilder, StringRecord};

use super::{LoadError, ModelBuilder, RowTag, SourceAdapter};
use crate::model::{Card, FeedModel};

pub struct CsvAdapter;

impl SourceAdapter for CsvAdapter {
    fn parse(&self, text: &str) -> Result<FeedModel, LoadError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut builder = ModelBuilder::default();
        for record in reader.records() {
            let record = record?;
            let tag = cell(&record, 0);
            match RowTag::classify(&tag) {
                RowTag::Logo => builder.logo(cell(&record, 1)),
                RowTag::Background => builder.background(cell(&record, 1)),
                RowTag::Card => builder.card(Card {
                    title: cell(&record, 1),
                    thumbnail_url: cell(&record, 2),
                    embed_markup: cell(&record, 3),
                    full_description: cell(&record, 4),
                    short_description: String::new(),
                }),
                RowTag::Other => builder.ignore(&tag),
            }
        }
        Ok(builder.finish())
    }
}

fn cell(record: &StringRecord, index: usize) -> String {
    record.get(index).unwrap_or_default().to_string()
}
