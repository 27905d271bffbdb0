//! JSON feed adapter.
//!
//! The document is an array of row objects. `Title` carries the row tag;
//! metadata rows put their URL in `LinkURL`.
//!
//! ```json
//! [
//!   { "Title": "LogoURL", "LinkURL": "https://example.com/logo.png" },
//!   { "Title": "Card1", "CardTitle": "Intro", "LinkURL": "https://example.com/t1.jpg",
//!     "ShortDescription": "Teaser", "Description": "Full text", "EmbedCode": "<iframe …>" }
//! ]
//! ```

use serde_json::{Map, Value};

use super::{LoadError, ModelBuilder, RowTag, SourceAdapter};
use crate::model::{Card, FeedModel};

pub struct JsonAdapter;

impl SourceAdapter for JsonAdapter {
    fn parse(&self, text: &str) -> Result<FeedModel, LoadError> {
        let document: Value = serde_json::from_str(text)?;
        let rows = match document {
            Value::Array(rows) => rows,
            other => {
                return Err(LoadError::Format(format!(
                    "expected an array of rows, found {}",
                    value_kind(&other)
                )));
            }
        };

        let mut builder = ModelBuilder::default();
        for row in rows {
            let fields = match row {
                Value::Object(fields) => fields,
                other => {
                    builder.ignore(value_kind(&other));
                    continue;
                }
            };
            let tag = field(&fields, "Title");
            match RowTag::classify(&tag) {
                RowTag::Logo => builder.logo(field(&fields, "LinkURL")),
                RowTag::Background => builder.background(field(&fields, "LinkURL")),
                RowTag::Card => builder.card(Card {
                    title: field(&fields, "CardTitle"),
                    thumbnail_url: field(&fields, "LinkURL"),
                    short_description: field(&fields, "ShortDescription"),
                    full_description: field(&fields, "Description"),
                    embed_markup: field(&fields, "EmbedCode"),
                }),
                RowTag::Other => builder.ignore(&tag),
            }
        }
        Ok(builder.finish())
    }
}

/// Scalars become text; `null`, arrays and objects count as absent.
fn field(fields: &Map<String, Value>, name: &str) -> String {
    match fields.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
