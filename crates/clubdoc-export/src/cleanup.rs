use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, warn};

use crate::config::CleanupPolicy;

/// Remove intermediate files, best effort.
///
/// Waits `settle_delay` before every attempt and retries up to `attempts`
/// times. Files that are already gone are skipped. Failures are logged and
/// never returned.
pub fn remove_transient(paths: &[&Path], policy: &CleanupPolicy) {
    for path in paths {
        remove_with_retry(path, policy);
    }
}

fn remove_with_retry(path: &Path, policy: &CleanupPolicy) {
    let attempts = policy.attempts.max(1);

    for attempt in 1..=attempts {
        std::thread::sleep(policy.settle_delay());

        match std::fs::remove_file(path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed intermediate file");
                return;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => return,
            Err(e) if attempt < attempts => {
                debug!(path = %path.display(), attempt, error = %e, "removal failed, retrying");
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cleanup failed");
            }
        }
    }
}
