use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::domain::UtvError;
use crate::record::User;

/// Fetch the full user collection from `url` in one GET. This happens once
/// per run, before the event loop starts; the result populates the record
/// store for the lifetime of the process. Any failure (connect, timeout,
/// non-2xx status, malformed body) is folded into `LoadFailed` so the model
/// can render an explicit failure state instead of a silently empty table.
pub fn fetch_users(url: &str, timeout: Duration) -> Result<Vec<User>, UtvError> {
    let start_time = Instant::now();
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| UtvError::LoadFailed(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| UtvError::LoadFailed(e.to_string()))?;

    let users: Vec<User> = response
        .json()
        .map_err(|e| UtvError::LoadFailed(format!("bad response body: {e}")))?;

    info!(
        "Fetched {} users from {} in {}ms",
        users.len(),
        url,
        start_time.elapsed().as_millis()
    );
    for user in users.iter() {
        debug!("User: {} \"{}\" <{}>", user.id, user.name, user.email);
    }
    Ok(users)
}
