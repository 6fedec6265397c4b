use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Flattened enrichment term pulled out of the first result of the first
/// source. This is the only thing the tool ever prints on stdout.
#[derive(Debug, PartialEq, Serialize)]
pub struct MappedTerm {
    pub name: String,
    pub source: String,
    /// PValue as the service sent it; the upstream type is kept untouched.
    pub p_value: Value,
    pub description: String,
    pub intersections: Vec<String>,
}

#[derive(Debug, PartialEq)]
pub enum ExtractError {
    NullDocument,
    MissingSources,
    NullSources,
    EmptySources,
    MissingResults,
    NullResults,
    EmptyResults,
    Malformed(String),
}

impl ExtractError {
    /// True for the classified "no usable result" shapes. `Malformed` is the
    /// exception: the service promised a result but the record is broken, so
    /// the caller should abort instead of reporting an empty outcome.
    pub fn is_no_result(&self) -> bool {
        !matches!(self, ExtractError::Malformed(_))
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExtractError::NullDocument => write!(f, "results are null"),
            ExtractError::MissingSources => write!(f, "no sources found in results"),
            ExtractError::NullSources => write!(f, "source is null"),
            ExtractError::EmptySources => write!(f, "source is empty"),
            ExtractError::MissingResults => write!(f, "results not in source"),
            ExtractError::NullResults => write!(f, "first result is null"),
            ExtractError::EmptyResults => write!(f, "no result found"),
            ExtractError::Malformed(what) => write!(f, "malformed result: {what}"),
        }
    }
}

impl std::error::Error for ExtractError {}

/// Map the raw result document to a [MappedTerm].
///
/// The document comes from the network and is only partially trusted: every
/// level may be absent, null or empty, so it is validated top-down and the
/// first defect wins. Only `sources[0]` and its `results[0]` are consulted;
/// the query asks for a single result and anything beyond the first entry is
/// ignored on purpose.
pub fn mapped_term(doc: Option<&Value>) -> Result<MappedTerm, ExtractError> {
    let doc = doc.ok_or(ExtractError::NullDocument)?;
    let sources = doc.get("sources").ok_or(ExtractError::MissingSources)?;
    if sources.is_null() {
        return Err(ExtractError::NullSources);
    }
    let sources = sources
        .as_array()
        .ok_or_else(|| ExtractError::Malformed("sources is not an array".into()))?;
    let first_source = sources.first().ok_or(ExtractError::EmptySources)?;
    let results = first_source
        .get("results")
        .ok_or(ExtractError::MissingResults)?;
    if results.is_null() {
        return Err(ExtractError::NullResults);
    }
    let results = results
        .as_array()
        .ok_or_else(|| ExtractError::Malformed("results is not an array".into()))?;
    let first = results.first().ok_or(ExtractError::EmptyResults)?;

    let description = first
        .get("description")
        .and_then(Value::as_str)
        .ok_or_else(|| ExtractError::Malformed("first result has no description".into()))?;
    // The enrichment source is encoded as a prefix before the first colon,
    // e.g. "GO: response to stimulus". No colon means the source is unknown.
    let (source, name) = match description.find(':') {
        Some(at) => (
            description[..at].to_string(),
            description[at + 1..].trim_start().to_string(),
        ),
        None => ("NA".to_string(), description.trim_start().to_string()),
    };
    let p_value = first
        .get("details")
        .and_then(|details| details.get("PValue"))
        .cloned()
        .ok_or_else(|| ExtractError::Malformed("first result has no details.PValue".into()))?;
    let url = first
        .get("url")
        .and_then(Value::as_str)
        .ok_or_else(|| ExtractError::Malformed("first result has no url".into()))?;
    let intersections = first
        .get("hitGenes")
        .and_then(Value::as_array)
        .ok_or_else(|| ExtractError::Malformed("first result has no hitGenes".into()))?
        .iter()
        .map(|gene| {
            gene.as_str()
                .map(str::to_string)
                .ok_or_else(|| ExtractError::Malformed("hitGenes entry is not a string".into()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MappedTerm {
        name,
        source,
        p_value,
        description: url.to_string(),
        intersections,
    })
}
