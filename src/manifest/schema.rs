use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::foundation::{
    core::TimeInterval,
    error::{CaptionError, CaptionResult},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SchemaPathElem {
    Field(&'static str),
    Index(usize),
}

#[derive(Debug, Clone)]
pub(crate) struct SchemaError {
    pub(crate) path: Vec<SchemaPathElem>,
    pub(crate) message: String,
}

impl SchemaError {
    pub(crate) fn at(path: &[SchemaPathElem], message: impl Into<String>) -> Self {
        Self {
            path: path.to_vec(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "{}", self.message);
        }
        write!(f, "{}: {}", format_path(&self.path), self.message)
    }
}

pub(crate) fn format_path(path: &[SchemaPathElem]) -> String {
    let mut s = String::from("$");
    for p in path {
        match *p {
            SchemaPathElem::Field(name) => {
                s.push('.');
                s.push_str(name);
            }
            SchemaPathElem::Index(i) => {
                s.push('[');
                s.push_str(&i.to_string());
                s.push(']');
            }
        }
    }
    s
}

#[derive(Debug, Clone)]
pub(crate) struct SchemaErrors {
    pub(crate) errors: Vec<SchemaError>,
}

impl fmt::Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

/// Read and decode a JSON manifest, mapping IO and syntax failures onto the manifest errors.
pub(crate) fn read_json(path: &Path) -> CaptionResult<Value> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CaptionError::manifest_not_found(path)
        } else {
            CaptionError::Other(anyhow::Error::new(e).context(format!(
                "read manifest '{}'",
                path.display()
            )))
        }
    })?;
    parse_json(&text, path)
}

pub(crate) fn parse_json(text: &str, origin: &Path) -> CaptionResult<Value> {
    serde_json::from_str(text).map_err(|e| CaptionError::manifest_parse(origin, e.to_string()))
}

pub(crate) fn require<'a>(
    obj: &'a serde_json::Map<String, Value>,
    key: &'static str,
    path: &[SchemaPathElem],
) -> Result<&'a Value, SchemaError> {
    obj.get(key)
        .ok_or_else(|| SchemaError::at(path, format!("missing required key '{key}'")))
}

pub(crate) fn require_str<'a>(
    obj: &'a serde_json::Map<String, Value>,
    key: &'static str,
    path: &[SchemaPathElem],
) -> Result<&'a str, SchemaError> {
    let mut p = path.to_vec();
    p.push(SchemaPathElem::Field(key));
    require(obj, key, path)?
        .as_str()
        .ok_or_else(|| SchemaError::at(&p, "must be a string"))
}

/// `[start, end]`: two finite, non-negative numbers with `start < end`.
pub(crate) fn parse_interval(
    v: &Value,
    path: &[SchemaPathElem],
) -> Result<TimeInterval, SchemaError> {
    let arr = v
        .as_array()
        .filter(|a| a.len() == 2)
        .ok_or_else(|| SchemaError::at(path, "must be a list of two elements [start, end]"))?;

    let num = |i: usize| {
        arr[i]
            .as_f64()
            .filter(|x| x.is_finite())
            .ok_or_else(|| SchemaError::at(path, format!("element {i} must be a finite number")))
    };
    let start = num(0)?;
    let end = num(1)?;

    if start < 0.0 {
        return Err(SchemaError::at(path, "start must be >= 0"));
    }
    if start >= end {
        return Err(SchemaError::at(
            path,
            format!("start ({start}) must be before end ({end})"),
        ));
    }
    Ok(TimeInterval::new(start, end))
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/schema.rs"]
mod tests;
