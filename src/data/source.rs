//! Source fetching: remote CSVs over HTTP, anything else from disk.

use super::loader::LoadError;
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use std::fs;
use std::time::Duration;

static CLIENT: OnceCell<Client> = OnceCell::new();

fn http_client(timeout: Duration) -> Result<&'static Client, LoadError> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LoadError::Client)
    })
}

pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Short label for logs and errors: the file name part of a URL or path.
pub fn display_name(location: &str) -> &str {
    location
        .rsplit(['/', '\\'])
        .find(|part| !part.is_empty())
        .unwrap_or(location)
}

/// Fetch the raw bytes of one source table.
pub fn fetch_source(location: &str, timeout: Duration) -> Result<Vec<u8>, LoadError> {
    if !is_remote(location) {
        return fs::read(location).map_err(|source| LoadError::Io {
            location: location.to_string(),
            source,
        });
    }

    let fetch_err = |source: reqwest::Error| LoadError::Fetch {
        location: location.to_string(),
        source,
    };

    let response = http_client(timeout)?.get(location).send().map_err(fetch_err)?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            location: location.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().map_err(fetch_err)?;
    tracing::debug!(source = display_name(location), bytes = bytes.len(), "fetched");
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn remote_detection() {
        assert!(is_remote("https://example.org/1975_Match_Stats.csv"));
        assert!(is_remote("http://localhost/a.csv"));
        assert!(!is_remote("data/1975_Match_Stats.csv"));
        assert!(!is_remote("C:\\data\\1975.csv"));
    }

    #[test]
    fn display_name_is_last_segment() {
        assert_eq!(
            display_name("https://example.org/WorldCup_Stats/1975_Match_Stats.csv"),
            "1975_Match_Stats.csv"
        );
        assert_eq!(display_name("data\\2019.csv"), "2019.csv");
        assert_eq!(display_name("plain.csv"), "plain.csv");
    }

    #[test]
    fn reads_local_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"date,team_1\n").unwrap();
        let path = file.path().to_string_lossy().to_string();
        let bytes = fetch_source(&path, Duration::from_secs(1)).unwrap();
        assert_eq!(bytes, b"date,team_1\n");
    }

    #[test]
    fn missing_local_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv").to_string_lossy().to_string();
        let err = fetch_source(&path, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
