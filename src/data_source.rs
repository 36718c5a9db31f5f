// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Archive loading.
//!
//! The archive is read once at startup, either from disk or with a single
//! uncached GET. Loading runs on the background runtime and hands its result
//! back to the UI thread through a oneshot channel. Every failure degrades to
//! an empty archive; the error text is kept only for the empty-state message.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use log::{error, info, warn};
use thiserror::Error;
use tokio::sync::oneshot;

use atlas_core::{parse_archive, ArchiveError, Destination};

/// Where the archive document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Remote(String),
}

impl DataSource {
    /// `http://` and `https://` sources are fetched, anything else is a path
    pub fn parse(source: &str) -> Self {
        let source = source.trim();
        if source.starts_with("http://") || source.starts_with("https://") {
            Self::Remote(source.to_string())
        } else {
            Self::File(PathBuf::from(source))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}

/// Errors that can occur while loading the archive
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

/// Read the raw archive bytes
pub async fn fetch_bytes(source: &DataSource) -> Result<Vec<u8>, LoadError> {
    match source {
        DataSource::File(path) => tokio::fs::read(path).await.map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        }),
        DataSource::Remote(url) => {
            let response = reqwest::Client::new()
                .get(url)
                .header(reqwest::header::CACHE_CONTROL, "no-cache")
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(LoadError::Status(response.status()));
            }

            Ok(response.bytes().await?.to_vec())
        }
    }
}

/// Fetch and parse the archive
pub async fn load_archive(source: &DataSource) -> Result<Vec<Destination>, LoadError> {
    let bytes = fetch_bytes(source).await?;
    Ok(parse_archive(&bytes)?)
}

/// Result of a load, already degraded to a usable archive
#[derive(Debug)]
pub struct LoadOutcome {
    pub destinations: Vec<Destination>,
    pub error: Option<String>,
    pub loaded_at: DateTime<Utc>,
}

impl LoadOutcome {
    /// Log the result and turn failures into an empty archive
    pub fn from_result(source: &DataSource, result: Result<Vec<Destination>, LoadError>) -> Self {
        let (destinations, error) = match result {
            Ok(destinations) => {
                info!("Loaded archive from {source}");
                (destinations, None)
            }
            Err(LoadError::Archive(ArchiveError::MissingDestinations)) => {
                warn!("{source} did not contain destinations[]");
                (Vec::new(), Some("The archive has no destinations list.".to_string()))
            }
            Err(e) => {
                error!("Failed to fetch {source}: {e}");
                (Vec::new(), Some(e.to_string()))
            }
        };

        Self {
            destinations,
            error,
            loaded_at: Utc::now(),
        }
    }
}

/// A load running on the background runtime
#[derive(Debug)]
pub struct PendingLoad {
    rx: oneshot::Receiver<LoadOutcome>,
}

impl PendingLoad {
    /// Start loading `source`; the UI is woken up when it finishes
    pub fn spawn(runtime: &tokio::runtime::Handle, source: DataSource, ctx: egui::Context) -> Self {
        let (tx, rx) = oneshot::channel();

        info!("Loading archive from {source}...");
        runtime.spawn(async move {
            let result = load_archive(&source).await;
            let outcome = LoadOutcome::from_result(&source, result);
            // The receiver is gone only if the app is shutting down.
            let _ = tx.send(outcome);
            ctx.request_repaint();
        });

        Self { rx }
    }

    /// Non-blocking check for the finished load
    pub fn poll(&mut self) -> Option<LoadOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(LoadOutcome {
                destinations: Vec::new(),
                error: Some("Archive loader stopped unexpectedly.".to_string()),
                loaded_at: Utc::now(),
            }),
        }
    }
}
