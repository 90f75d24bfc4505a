pub mod endpoint;

use std::fmt;
use std::time::Duration;

use serde::de::{self, DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

pub use endpoint::{endpoint_url, EntityKind, EntityRef, DEFAULT_ENDPOINT_TEMPLATE};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordSource {
    FilePath(String),
    Url(String),
    /// Raw JSON text already in memory.
    Inline(String),
}

impl fmt::Display for RecordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FilePath(path) => write!(f, "file {path}"),
            Self::Url(url) => write!(f, "url {url}"),
            Self::Inline(_) => f.write_str("inline json"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SourceOptions {
    pub timeout_seconds: u64,
    pub proxy: Option<String>,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            proxy: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read records file: {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("invalid entity '{value}', expected KIND:ID (e.g. bank:42)")]
    InvalidEntity { value: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode records from {origin}: {source}")]
    Decode {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Envelope keys that may wrap the record array, in lookup order.
const ENVELOPE_KEYS: [&str; 3] = ["results", "data", "items"];

/// Pulls the record array out of a bare list or an envelope object.
fn record_array(body: Value) -> Result<Vec<Value>, serde_json::Error> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            for key in ENVELOPE_KEYS {
                match map.remove(key) {
                    Some(Value::Array(items)) => return Ok(items),
                    Some(other) => {
                        return Err(de::Error::custom(format!(
                            "field `{key}` must be an array of records, found {}",
                            json_type(&other)
                        )))
                    }
                    None => {}
                }
            }
            Err(de::Error::custom(
                "expected an array of records or an object with `results`, `data` or `items`",
            ))
        }
        other => Err(de::Error::custom(format!(
            "expected an array of records, found {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Decodes a bare array or a `results`/`data`/`items` envelope.
///
/// Records are decoded one by one so a failure names its position.
pub fn decode_records<R: DeserializeOwned>(body: &[u8], origin: &str) -> Result<Vec<R>, SourceError> {
    let decode_err =
        |origin: String| move |source: serde_json::Error| SourceError::Decode { origin, source };
    let body: Value = serde_json::from_slice(body).map_err(decode_err(origin.to_string()))?;
    record_array(body)
        .map_err(decode_err(origin.to_string()))?
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<R>(item).map_err(decode_err(format!("{origin} (record {i})")))
        })
        .collect()
}

pub fn build_client(options: &SourceOptions) -> Result<reqwest::Client, SourceError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(concat!("caseview/", env!("CARGO_PKG_VERSION"))),
    );
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );

    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .timeout(Duration::from_secs(options.timeout_seconds));

    if let Some(proxy) = options.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
        let proxy = reqwest::Proxy::all(proxy).map_err(|e| SourceError::ProxySetup {
            proxy: proxy.to_string(),
            source: e,
        })?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| SourceError::HttpClientBuild { source: e })
}

async fn fetch_url(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, SourceError> {
    if reqwest::Url::parse(url).is_err() {
        return Err(SourceError::InvalidUrl {
            url: url.to_string(),
        });
    }
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| SourceError::Request {
            url: url.to_string(),
            source: e,
        })?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let body = response.bytes().await.map_err(|e| SourceError::Request {
        url: url.to_string(),
        source: e,
    })?;
    Ok(body.to_vec())
}

pub async fn load_records_with<R: DeserializeOwned>(
    client: &reqwest::Client,
    source: &RecordSource,
) -> Result<Vec<R>, SourceError> {
    match source {
        RecordSource::Inline(json) => decode_records(json.as_bytes(), "inline json"),
        RecordSource::FilePath(path) => {
            let path = crate::config::expand_tilde_string(path);
            let body = tokio::fs::read(&path)
                .await
                .map_err(|e| SourceError::FileRead {
                    path: path.clone(),
                    source: e,
                })?;
            decode_records(&body, &path)
        }
        RecordSource::Url(url) => {
            let body = fetch_url(client, url).await?;
            decode_records(&body, url)
        }
    }
}

pub async fn load_records<R: DeserializeOwned>(
    source: &RecordSource,
    options: &SourceOptions,
) -> Result<Vec<R>, SourceError> {
    let client = build_client(options)?;
    load_records_with(&client, source).await
}

/// Loads every source concurrently and concatenates the records in source order.
pub async fn load_all<R: DeserializeOwned>(
    sources: &[RecordSource],
    options: &SourceOptions,
) -> Result<Vec<R>, SourceError> {
    let client = build_client(options)?;
    let batches = futures::future::try_join_all(
        sources
            .iter()
            .map(|source| load_records_with::<R>(&client, source)),
    )
    .await?;
    Ok(batches.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CaseRecord, GazetteRecord};
    use std::io::Write;

    #[test]
    fn decodes_bare_arrays_and_envelopes() {
        let bare: Vec<CaseRecord> = decode_records(br#"[{"title": "A"}]"#, "t").unwrap();
        assert_eq!(bare.len(), 1);

        let results: Vec<CaseRecord> =
            decode_records(br#"{"count": 2, "results": [{"title": "A"}, {}]}"#, "t").unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].title, "");

        let data: Vec<GazetteRecord> =
            decode_records(br#"{"data": [{"title": "N"}]}"#, "t").unwrap();
        assert_eq!(data[0].title, "N");
    }

    #[test]
    fn decode_error_names_origin() {
        let err = decode_records::<CaseRecord>(b"{\"oops\": true}", "cases.json").unwrap_err();
        assert!(err.to_string().contains("cases.json"));
        assert!(err.to_string().contains("`results`"));
    }

    #[test]
    fn decode_error_points_at_the_bad_part() {
        let err = decode_records::<CaseRecord>(br#"{"results": 5}"#, "x").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("field `results` must be an array"), "{msg}");
        assert!(msg.contains("a number"), "{msg}");

        let err =
            decode_records::<CaseRecord>(br#"[{"title": "ok"}, "oops"]"#, "x").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("x (record 1)"), "{msg}");
        assert!(msg.contains("invalid type"), "{msg}");
        assert!(!msg.contains("untagged"), "{msg}");
    }

    #[test]
    fn gazette_with_both_date_keys_decodes() {
        let recs: Vec<GazetteRecord> = decode_records(
            br#"[{"title": "N", "publication_date": "2021-03-04", "date": "2021-03-04",
                  "type": "Notice", "gazette_type": "Notice"}]"#,
            "x",
        )
        .unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].publication_date, "2021-03-04");
        assert_eq!(recs[0].gazette_type, "Notice");
    }

    #[tokio::test]
    async fn loads_inline_and_file_sources_in_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"title": "from file"}}]"#).unwrap();
        let sources = vec![
            RecordSource::Inline(r#"[{"title": "inline"}]"#.to_string()),
            RecordSource::FilePath(file.path().to_string_lossy().to_string()),
        ];
        let records: Vec<CaseRecord> = load_all(&sources, &SourceOptions::default())
            .await
            .unwrap();
        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["inline", "from file"]);
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let source = RecordSource::FilePath("/definitely/not/here.json".to_string());
        let err = load_records::<CaseRecord>(&source, &SourceOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::FileRead { .. }));
    }

    #[tokio::test]
    async fn malformed_url_is_rejected_before_sending() {
        let source = RecordSource::Url("not a url".to_string());
        let err = load_records::<CaseRecord>(&source, &SourceOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::InvalidUrl { .. }));
    }
}
