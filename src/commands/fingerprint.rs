use crate::core::{error::Result, fingerprint::FingerprintChecker};
use std::path::Path;

/// Print the current tree fingerprint, one line per monitored path.
pub fn execute_fingerprint(directory: &Path) -> Result<()> {
    let fingerprint = FingerprintChecker::new(directory).compute();
    print!("{fingerprint}");
    Ok(())
}
