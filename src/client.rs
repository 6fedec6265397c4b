use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::warn;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::poll::{StatusClient, TaskStatus};

pub const USER_AGENT: &str = concat!("cdiquerygenestoterm/", env!("CARGO_PKG_VERSION"));

/// Blocking client for the integrated-search endpoints. Holds the service
/// base URL and applies one request timeout to every call.
pub struct IQueryClient {
    http: Client,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchQuery<'a> {
    gene_list: &'a [String],
    source_list: [&'static str; 1],
}

#[derive(Deserialize)]
struct SubmitResponse {
    id: String,
}

impl IQueryClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(IQueryClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// POST the gene list for enrichment and return the task id the service
    /// assigned. `Ok(None)` means the query was rejected or the request never
    /// got through; both are logged here and end the run without a result.
    pub fn submit_query(&self, genes: &[String]) -> Result<Option<String>> {
        let url = format!("{}/integratedsearch/v1/", self.base_url);
        let query = SearchQuery {
            gene_list: genes,
            source_list: ["enrichment"],
        };
        let res = match self.http.post(&url).json(&query).send() {
            Ok(res) => res,
            Err(err) => {
                warn!("query submission failed: {err}");
                return Ok(None);
            }
        };
        if res.status() != StatusCode::ACCEPTED {
            let status = res.status();
            let body = res.text().unwrap_or_else(|_| "".into());
            warn!("service rejected query: {status} : {body}");
            return Ok(None);
        }
        let submitted: SubmitResponse = res.json().context("Parsing submission response json")?;
        Ok(Some(submitted.id))
    }

    /// Fetch the completed payload, first result only. A non-200 response or
    /// a transport error is logged and yields `Ok(None)`; the caller never
    /// retries a fetch.
    pub fn completed_result(&self, task_id: &str) -> Result<Option<Value>> {
        let url = format!(
            "{}/integratedsearch/v1/{}?start=0&size=1",
            self.base_url, task_id
        );
        let res = match self.http.get(&url).send() {
            Ok(res) => res,
            Err(err) => {
                warn!("result fetch failed: {err}");
                return Ok(None);
            }
        };
        if res.status() != StatusCode::OK {
            warn!("received http error fetching result: {}", res.status());
            return Ok(None);
        }
        let doc = res.json().context("Parsing completed result json")?;
        Ok(Some(doc))
    }
}

impl StatusClient for IQueryClient {
    /// One status probe. Transport errors and non-200 responses surface as
    /// plain errors; the poll loop treats every error as transient.
    fn task_status(&self, task_id: &str) -> Result<TaskStatus> {
        let url = format!("{}/integratedsearch/v1/{}/status", self.base_url, task_id);
        let res = self
            .http
            .get(&url)
            .send()
            .context("Failed to send status request")?;
        if res.status() != StatusCode::OK {
            bail!("received http status {} while polling", res.status());
        }
        res.json().context("Parsing task status json")
    }
}
