use log::{debug, warn};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{CACHE_CONTROL, HeaderValue};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::domain::{CertificationRecord, FeatureCollection};

const USER_AGENT: &str = "aseanmap/0.1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON from {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{origin} did not contain a JSON array")]
    NotAnArray { origin: String },
    #[error("{origin} contained no features")]
    EmptyCollection { origin: String },
    #[error("no map geometry could be loaded ({tried} sources tried)")]
    Exhausted { tried: usize },
}

/// Where a resource comes from: a remote URL or a local file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    Path(PathBuf),
}

impl Source {
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Source::Url(trimmed.to_string())
        } else {
            Source::Path(PathBuf::from(trimmed))
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Url(url) => f.write_str(url),
            Source::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Read a source to a string; remote fetches bypass caches
pub fn fetch_text(source: &Source) -> Result<String, LoadError> {
    match source {
        Source::Path(path) => std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        }),
        Source::Url(url) => {
            let http = |source| LoadError::Http {
                url: url.clone(),
                source,
            };
            let client = Client::builder()
                .user_agent(USER_AGENT)
                .timeout(REQUEST_TIMEOUT)
                .build()
                .map_err(http)?;

            let response = no_cache_get(&client, url).send().map_err(http)?;
            check_status(url, response.status())?;
            response.text().map_err(http)
        }
    }
}

fn no_cache_get(client: &Client, url: &str) -> RequestBuilder {
    client
        .get(url)
        .header(CACHE_CONTROL, HeaderValue::from_static("no-cache"))
}

/// Only a plain 200 counts as a successful load
fn check_status(url: &str, status: StatusCode) -> Result<(), LoadError> {
    if status != StatusCode::OK {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(())
}

/// Decode the certification table; the payload must be a JSON array
pub fn parse_records(text: &str, origin: &str) -> Result<Vec<CertificationRecord>, LoadError> {
    let json = |source| LoadError::Json {
        origin: origin.to_string(),
        source,
    };
    let value: serde_json::Value = serde_json::from_str(text).map_err(json)?;
    if !value.is_array() {
        return Err(LoadError::NotAnArray {
            origin: origin.to_string(),
        });
    }
    serde_json::from_value(value).map_err(json)
}

pub fn load_records(source: &Source) -> Result<Vec<CertificationRecord>, LoadError> {
    let text = fetch_text(source)?;
    let records = parse_records(&text, &source.to_string())?;
    debug!("Loaded {} certification records from {}", records.len(), source);
    Ok(records)
}

fn load_collection(source: &Source) -> Result<FeatureCollection, LoadError> {
    let origin = source.to_string();
    let text = fetch_text(source)?;
    let collection = FeatureCollection::from_json_str(&text).map_err(|source| LoadError::Json {
        origin: origin.clone(),
        source,
    })?;
    if collection.is_empty() {
        return Err(LoadError::EmptyCollection { origin });
    }
    Ok(collection)
}

/// Try each candidate in order; the first non-empty collection wins
pub fn load_geometry(candidates: &[Source]) -> Result<FeatureCollection, LoadError> {
    for candidate in candidates {
        match load_collection(candidate) {
            Ok(collection) => {
                debug!("Loaded {} features from {}", collection.len(), candidate);
                return Ok(collection);
            }
            Err(e) => warn!("Skipping map source: {}", e),
        }
    }
    Err(LoadError::Exhausted {
        tried: candidates.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"iso3": "SGP", "name": "Singapore"},
             "geometry": {"type": "Polygon", "coordinates": [[[103.6, 1.2], [104.0, 1.2], [104.0, 1.5], [103.6, 1.5]]]}}
        ]
    }"#;

    fn temp_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_source_parse() {
        assert_eq!(
            Source::parse("https://example.org/data.json"),
            Source::Url("https://example.org/data.json".to_string())
        );
        assert_eq!(
            Source::parse("data/asean.geojson"),
            Source::Path(PathBuf::from("data/asean.geojson"))
        );
    }

    #[test]
    fn test_remote_request_bypasses_cache() {
        let client = Client::new();
        let request = no_cache_get(&client, "https://example.org/cert.json")
            .build()
            .unwrap();
        assert_eq!(request.headers()[CACHE_CONTROL], "no-cache");
    }

    #[test]
    fn test_only_200_is_success() {
        let url = "https://example.org/cert.json";
        assert!(check_status(url, StatusCode::OK).is_ok());

        for status in [StatusCode::NO_CONTENT, StatusCode::PARTIAL_CONTENT, StatusCode::NOT_FOUND] {
            let err = check_status(url, status).unwrap_err();
            assert!(matches!(err, LoadError::Status { status: code, .. } if code == status.as_u16()));
        }
    }

    #[test]
    fn test_load_records_keeps_extra_fields() {
        let file = temp_file(
            r#"[{"country": "Laos", "standards": "LNS", "grid": "230V 50Hz",
                 "certification": "Voluntary", "notes": "pilot"}]"#,
        );
        let records = load_records(&Source::Path(file.path().to_path_buf())).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].country, "Laos");
        assert!(records[0].extra.contains_key("notes"));
    }

    #[test]
    fn test_records_must_be_array() {
        let err = parse_records(r#"{"country": "Laos"}"#, "inline").unwrap_err();
        assert!(matches!(err, LoadError::NotAnArray { .. }));

        let err = parse_records("not json", "inline").unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_records(&Source::parse("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_geometry_falls_through_candidates() {
        let empty = temp_file(r#"{"type": "FeatureCollection", "features": []}"#);
        let broken = temp_file("{");
        let good = temp_file(COLLECTION);

        let candidates = vec![
            Source::Path(PathBuf::from("/missing.geojson")),
            Source::Path(empty.path().to_path_buf()),
            Source::Path(broken.path().to_path_buf()),
            Source::Path(good.path().to_path_buf()),
        ];
        let collection = load_geometry(&candidates).unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.features[0].iso3.as_deref(), Some("SGP"));
    }

    #[test]
    fn test_geometry_exhausted() {
        let empty = temp_file(r#"{"type": "FeatureCollection", "features": []}"#);
        let err = load_geometry(&[Source::Path(empty.path().to_path_buf())]).unwrap_err();
        assert!(matches!(err, LoadError::Exhausted { tried: 1 }));
        assert!(matches!(
            load_geometry(&[]).unwrap_err(),
            LoadError::Exhausted { tried: 0 }
        ));
    }
}
