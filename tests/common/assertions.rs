//! Common assertion helpers for test output validation
//!
//! Provides predicates for validating app-preload command output and error messages.

#![allow(dead_code)]

use predicates::prelude::*;

/// Creates a predicate that checks for the missing-directory error
pub fn directory_not_set() -> impl Predicate<str> {
    predicates::str::contains("No application directory configured")
}

/// Creates a predicate that checks for the nonexistent-directory error
pub fn directory_not_found() -> impl Predicate<str> {
    predicates::str::contains("Application directory does not exist")
}

/// Creates a predicate that checks for the listing header of a category
pub fn has_listing_header(category: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("Listing: {category} ("))
}

/// Creates a predicate that checks which source served a listing
pub fn served_from(source: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("({source})"))
}

/// Creates a predicate that checks for an item row with its status
pub fn has_item(name: &str, status: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("{name} ({status})"))
}

/// Creates a predicate that checks for a category row
pub fn has_category(name: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("{name}/"))
}

/// Creates a predicate that checks for the entry count summary
pub fn has_summary(count: usize) -> impl Predicate<str> {
    predicates::str::contains(format!("{count} entries"))
}
