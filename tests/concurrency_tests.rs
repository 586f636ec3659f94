use app_preload::core::daemon::{DaemonConfig, Sweeper};
use app_preload::core::entry::{Entry, EntryFields, Listing};
use app_preload::core::entry_kind::EntryKind;
use app_preload::core::loader::Loader;
use app_preload::core::store::CacheStore;
use std::fs;
use std::path::Path;
use std::thread;

mod common;
use common::fixtures::*;

const ROUNDS: usize = 25;

fn leftover_temp_files(preload_dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut leftovers = Vec::new();
    for entry in fs::read_dir(preload_dir)? {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if name.contains("-tmp-") {
            leftovers.push(name);
        }
    }
    Ok(leftovers)
}

fn writer_listing(writer: usize) -> Listing {
    Listing::with_entries(
        "Games",
        vec![
            Entry::back(EntryFields::new("Back", "", "Return", "/i/back.png")),
            Entry::item(
                EntryFields::new(format!("Chess{writer}"), "Games/Chess", "Play chess", "/i/c.png"),
                "installed",
            ),
            Entry::item(
                EntryFields::new(format!("Go{writer}"), "Games/Go", "Play go", "/i/g.png"),
                "uninstalled",
            ),
        ],
    )
}

#[cfg(test)]
mod concurrency_tests {
    use super::*;

    #[test]
    fn test_racing_saves_never_expose_partial_lists() -> anyhow::Result<()> {
        let tree = AppTree::new()?;
        let store = CacheStore::new(tree.path());
        store.save("Games", &writer_listing(0))?;

        thread::scope(|scope| {
            for writer in 1..=4 {
                let store = &store;
                scope.spawn(move || {
                    for _ in 0..ROUNDS {
                        store.save("Games", &writer_listing(writer)).unwrap();
                    }
                });
            }
            for _ in 0..2 {
                let store = &store;
                scope.spawn(move || {
                    for _ in 0..ROUNDS {
                        let listing = store.load("Games").unwrap();
                        assert_eq!(listing.len(), 3);
                        assert_eq!(listing.entries[0].kind(), EntryKind::Back);
                    }
                });
            }
        });

        assert_eq!(store.load("Games")?.len(), 3);
        assert!(leftover_temp_files(store.preload_dir())?.is_empty());
        Ok(())
    }

    #[test]
    fn test_loaders_race_with_forced_refresh() -> anyhow::Result<()> {
        let tree = create_store_tree()?;
        let loader = Loader::new(tree.path());
        let sweeper = Sweeper::new(
            DaemonConfig::new(tree.path()).with_package_marker(tree.path().join("dpkg-status")),
        );

        thread::scope(|scope| {
            scope.spawn(|| {
                for _ in 0..ROUNDS {
                    sweeper.refresh_category("Games").unwrap();
                }
            });
            for _ in 0..3 {
                scope.spawn(|| {
                    for _ in 0..ROUNDS {
                        let listing = loader.get("Games").unwrap();
                        assert_eq!(listing.len(), 2);
                        assert!(listing.find("Chess").is_some());
                    }
                });
            }
        });

        let listing = loader.get("Games")?;
        assert_eq!(listing.len(), 2);
        assert!(leftover_temp_files(loader.store().preload_dir())?.is_empty());
        Ok(())
    }
}
