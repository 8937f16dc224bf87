use std::path::Path;

use serde_json::Value;

use crate::{
    foundation::core::TimeInterval,
    foundation::error::{CaptionError, CaptionResult},
    manifest::schema::{
        SchemaError, SchemaErrors, SchemaPathElem, parse_interval, parse_json, read_json, require,
        require_str,
    },
};

/// One timed unit of transcript text.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContentChunk {
    pub text: String,
    #[serde(rename = "timestamp")]
    pub interval: TimeInterval,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TranscriptManifest {
    pub chunks: Vec<ContentChunk>,
}

/// Load and validate `transcript.json`.
///
/// Any failure is fatal for the run: a missing file, malformed JSON, a schema violation in any
/// chunk, or an empty chunk list ([`CaptionError::NoTranscriptData`]).
pub fn load_transcript(path: &Path, max_entries: usize) -> CaptionResult<Vec<ContentChunk>> {
    let v = read_json(path)?;
    validate_transcript(&v, max_entries)
}

pub fn parse_transcript(
    text: &str,
    origin: &Path,
    max_entries: usize,
) -> CaptionResult<Vec<ContentChunk>> {
    let v = parse_json(text, origin)?;
    validate_transcript(&v, max_entries)
}

pub fn validate_transcript(root: &Value, max_entries: usize) -> CaptionResult<Vec<ContentChunk>> {
    let list = match root.get("chunks") {
        None | Some(Value::Null) => return Err(CaptionError::NoTranscriptData),
        Some(Value::Array(list)) => list,
        Some(_) => {
            return Err(CaptionError::validation(
                "$.chunks: 'chunks' must be a list",
            ));
        }
    };
    if list.is_empty() {
        return Err(CaptionError::NoTranscriptData);
    }
    if list.len() > max_entries {
        return Err(CaptionError::validation(format!(
            "$.chunks: transcript holds {} chunks, limit is {max_entries}",
            list.len()
        )));
    }

    let mut errors = Vec::new();
    let mut chunks = Vec::with_capacity(list.len());
    for (i, item) in list.iter().enumerate() {
        let path = [SchemaPathElem::Field("chunks"), SchemaPathElem::Index(i)];
        match validate_chunk(item, &path) {
            Ok(c) => chunks.push(c),
            Err(e) => errors.push(e),
        }
    }

    if !errors.is_empty() {
        return Err(CaptionError::validation(format!(
            "transcript schema validation failed:\n{}",
            SchemaErrors { errors }
        )));
    }
    Ok(chunks)
}

fn validate_chunk(item: &Value, path: &[SchemaPathElem]) -> Result<ContentChunk, SchemaError> {
    let obj = item
        .as_object()
        .ok_or_else(|| SchemaError::at(path, "must be an object"))?;
    let text = require_str(obj, "text", path)?;

    let mut ts_path = path.to_vec();
    ts_path.push(SchemaPathElem::Field("timestamp"));
    let interval = parse_interval(require(obj, "timestamp", path)?, &ts_path)?;

    Ok(ContentChunk {
        text: text.to_string(),
        interval,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/transcript.rs"]
mod tests;
