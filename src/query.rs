use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::client::IQueryClient;
use crate::extract::{self, MappedTerm};
use crate::poll::{self, PollOutcome};

/// Settings for one workflow run, mirroring the command-line surface.
pub struct QueryConfig {
    pub base_url: String,
    pub polling_interval: Duration,
    pub timeout: Duration,
    pub retry_count: u32,
}

/// Read the raw gene-list file. A missing or unreadable file is a usage
/// mistake and propagates as an error, unlike every downstream "no result"
/// outcome.
pub fn read_gene_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Can't read gene list at {}", path.display()))
}

/// Split the raw input text into a gene list: drop a trailing newline and
/// leading/trailing commas, then split on commas. Returns `None` when the
/// input holds no usable gene identifiers.
pub fn parse_gene_list(raw: &str) -> Option<Vec<String>> {
    let trimmed = raw.trim_end_matches('\n').trim_matches(',');
    let genes: Vec<String> = trimmed.split(',').map(str::to_string).collect();
    if genes.len() == 1 && genes[0].trim().is_empty() {
        return None;
    }
    Some(genes)
}

/// Run the full submit / poll / fetch / extract workflow.
///
/// `Ok(None)` is the "no result" outcome: empty input, rejected submission,
/// a task that failed or timed out, or a result document with nothing in it.
/// Errors are reserved for conditions that should stop the process.
pub fn run_query(raw_genes: &str, config: &QueryConfig) -> Result<Option<MappedTerm>> {
    let Some(genes) = parse_gene_list(raw_genes) else {
        warn!("no genes found in input");
        return Ok(None);
    };

    let client = IQueryClient::new(&config.base_url, config.timeout)?;
    let Some(task_id) = client.submit_query(&genes)? else {
        return Ok(None);
    };
    info!("query accepted, task id {task_id}");

    let outcome = poll::wait_for_completion(
        &client,
        &task_id,
        config.polling_interval,
        config.retry_count,
    );
    if outcome != PollOutcome::Completed {
        warn!("task {task_id} did not complete: {outcome}");
        return Ok(None);
    }

    let doc = client.completed_result(&task_id)?;
    match extract::mapped_term(doc.as_ref()) {
        Ok(term) => Ok(Some(term)),
        Err(err) if err.is_no_result() => {
            warn!("{err}");
            Ok(None)
        }
        Err(err) => Err(err).context("Mapping completed result"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_commas() {
        assert_eq!(
            parse_gene_list("hi,there\n"),
            Some(vec!["hi".to_string(), "there".to_string()])
        );
    }

    #[test]
    fn trims_surrounding_commas_and_newline() {
        assert_eq!(
            parse_gene_list(",MTOR,TP53,\n"),
            Some(vec!["MTOR".to_string(), "TP53".to_string()])
        );
    }

    #[test]
    fn single_gene_without_newline() {
        assert_eq!(parse_gene_list("MTOR"), Some(vec!["MTOR".to_string()]));
    }

    #[test]
    fn empty_input_is_no_genes() {
        assert_eq!(parse_gene_list(""), None);
        assert_eq!(parse_gene_list("\n"), None);
        assert_eq!(parse_gene_list(",\n"), None);
        assert_eq!(parse_gene_list("  \n"), None);
    }

    #[test]
    fn interior_entries_are_kept_verbatim() {
        // no per-gene trimming or deduplication
        assert_eq!(
            parse_gene_list("a, b,a\n"),
            Some(vec!["a".to_string(), " b".to_string(), "a".to_string()])
        );
    }
}
