use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::utils::header_utils::extract_api_key;

/// Keys allowed to call operator endpoints such as payment approval
#[derive(Debug, Clone)]
pub struct AdminKeys {
    keys: HashSet<String>,
}

impl AdminKeys {
    /// No keys: every admin request is refused
    pub fn empty() -> Self {
        Self {
            keys: HashSet::new(),
        }
    }

    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Load keys from a file, one per line
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut keys = HashSet::new();

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();

            // Skip empty lines and comments
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            keys.insert(trimmed.to_string());
        }

        Ok(Self { keys })
    }

    pub fn is_enabled(&self) -> bool {
        !self.keys.is_empty()
    }

    pub fn validate(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn count(&self) -> usize {
        self.keys.len()
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: String,
    error: String,
}

/// Load admin keys from `key_file`, falling back to default locations
pub fn load_admin_keys(key_file: Option<&str>) -> AdminKeys {
    if let Some(path) = key_file {
        match AdminKeys::from_file(path) {
            Ok(keys) if keys.count() > 0 => {
                tracing::info!("Loaded {} admin key(s) from {}", keys.count(), path);
                return keys;
            }
            Ok(_) => tracing::warn!("Admin key file is empty: {}", path),
            Err(e) => tracing::warn!("Could not read admin key file '{}': {}", path, e),
        }
    }

    let mut default_locations = vec![PathBuf::from("./admin_keys.txt")];
    if let Some(home) = dirs::home_dir() {
        default_locations.push(home.join(".voxnova/admin_keys.txt"));
    }

    for location in default_locations {
        if !location.exists() {
            continue;
        }
        match AdminKeys::from_file(&location) {
            Ok(keys) if keys.count() > 0 => {
                tracing::info!(
                    "Loaded {} admin key(s) from {}",
                    keys.count(),
                    location.display()
                );
                return keys;
            }
            Ok(_) => {}
            Err(e) => tracing::debug!("Could not read key file {:?}: {}", location, e),
        }
    }

    tracing::info!("No admin key file found - payment approval endpoint disabled");
    AdminKeys::empty()
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            status: "error".to_string(),
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Middleware guarding operator routes
pub async fn admin_auth_middleware(
    State(keys): State<AdminKeys>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    if !keys.is_enabled() {
        return unauthorized("Admin API is disabled on this server");
    }

    match extract_api_key(&headers) {
        Some(key) if keys.validate(&key) => next.run(request).await,
        Some(_) => {
            tracing::warn!("Rejected admin request with an invalid key");
            unauthorized("Invalid API key")
        }
        None => unauthorized(
            "API key required. Provide via X-API-Key or Authorization: Bearer header",
        ),
    }
}
