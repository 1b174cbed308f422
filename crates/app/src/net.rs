//! Startup connectivity probe.

use std::time::Duration;
use tracing::debug;

/// Blocking GET against the probe URL; any 2xx means online. Run it on a
/// blocking thread from async contexts.
pub fn is_online(url: &str, timeout: Duration) -> bool {
    let agent = ureq::AgentBuilder::new()
        .timeout(timeout)
        .build();
    match agent.get(url).call() {
        Ok(response) => {
            let status = response.status();
            debug!(target: "net", status, "connectivity probe response");
            (200..300).contains(&status)
        }
        Err(e) => {
            debug!(target: "net", "connectivity probe failed: {}", e);
            false
        }
    }
}
