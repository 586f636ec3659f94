use crate::core::{
    builder::normalize_category,
    daemon::{DaemonConfig, Sweeper},
    error::Result,
    print_section_header, print_success,
};

/// Rebuild one category, or every daemon target when `category` is `None`.
pub fn execute_refresh(config: DaemonConfig, category: Option<String>) -> Result<()> {
    let sweeper = Sweeper::new(config);

    match category {
        Some(category) => {
            sweeper.refresh_category(&category)?;
            let shown = match normalize_category(&category) {
                "" => "/",
                name => name,
            };
            print_success(&format!("Refreshed '{shown}'"));
        }
        None => {
            let targets = sweeper.targets()?;
            print_section_header("Refreshing");
            for target in &targets {
                println!("  {target}");
            }
            sweeper.refresh_all()?;
            print_success(&format!("Refreshed {} categories", targets.len()));
        }
    }
    Ok(())
}
