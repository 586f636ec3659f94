use crate::core::{config::PreloadConfig, error::Result, print_info, print_section_header, print_success};
use crate::core::settings::Settings;
use std::path::Path;
use std::time::Duration;

const ANNOUNCEMENTS_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Show the effective configuration, optionally remembering `directory` in the config file.
pub fn execute_config(config: PreloadConfig, directory: &Path, save: bool) -> Result<()> {
    let config = PreloadConfig {
        directory: Some(directory.to_path_buf()),
        ..config
    };

    print_section_header("Configuration");
    println!("  directory:      {}", directory.display());
    println!("  refresh period: {}s", config.refresh_period_secs);
    println!("  package marker: {}", config.package_marker.display());
    println!(
        "  announcements:  {}",
        Settings::new(directory).announcements_state(ANNOUNCEMENTS_MAX_AGE)
    );

    if save {
        let path = PreloadConfig::config_file();
        config.save_to(&path)?;
        print_success(&format!("Saved {}", path.display()));
    } else {
        print_info(&format!("Config file: {}", PreloadConfig::config_file().display()));
    }
    Ok(())
}
