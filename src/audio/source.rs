use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, SpectraError};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the encoded audio bytes come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioSource {
    File(PathBuf),
    Url(String),
}

impl AudioSource {
    /// `http://` and `https://` inputs are URLs, anything else is a path.
    pub fn parse(input: &str) -> Self {
        let lower = input.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            AudioSource::Url(input.to_string())
        } else {
            AudioSource::File(PathBuf::from(input))
        }
    }

    /// Extension used as a format hint by the decoder.
    pub fn extension(&self) -> Option<String> {
        let path = match self {
            AudioSource::File(path) => path.clone(),
            AudioSource::Url(url) => {
                let trimmed = url.split(['?', '#']).next().unwrap_or(url);
                PathBuf::from(trimmed.rsplit('/').next().unwrap_or(trimmed))
            }
        };
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    /// Read the whole resource into memory. No retries.
    pub fn fetch(&self) -> Result<Vec<u8>> {
        match self {
            AudioSource::File(path) => std::fs::read(path).map_err(|e| self.acquisition(e)),
            AudioSource::Url(url) => {
                log::info!("Downloading {}", url);
                let client = reqwest::blocking::Client::builder()
                    .timeout(HTTP_TIMEOUT)
                    .build()
                    .map_err(|e| self.acquisition(e))?;
                let response = client
                    .get(url)
                    .send()
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| self.acquisition(e))?;
                let bytes = response.bytes().map_err(|e| self.acquisition(e))?;
                Ok(bytes.to_vec())
            }
        }
    }

    fn acquisition(&self, err: impl fmt::Display) -> SpectraError {
        SpectraError::Acquisition {
            source_name: self.to_string(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for AudioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioSource::File(path) => write!(f, "{}", path.display()),
            AudioSource::Url(url) => f.write_str(url),
        }
    }
}
