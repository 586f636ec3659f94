use crate::core::{
    error::Result,
    loader::{ListingSource, Loaded, Loader},
    print_info,
    templates::{render_entry, render_template, TemplateContext, TEMPLATES},
};
use std::path::Path;

pub fn execute_get(directory: &Path, category: &str, json: bool) -> Result<()> {
    let loaded = Loader::new(directory).load(category)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&loaded.listing)?);
        return Ok(());
    }

    print_listing(&loaded);
    Ok(())
}

fn source_label(source: ListingSource) -> &'static str {
    match source {
        ListingSource::Cache => "cache",
        ListingSource::Generated => "generated",
    }
}

fn print_listing(loaded: &Loaded) {
    let listing = &loaded.listing;

    let header_context = TemplateContext {
        category: Some(&listing.category),
        source: Some(source_label(loaded.source)),
        ..Default::default()
    };
    println!();
    println!(
        "{}",
        render_template(TEMPLATES.listing_header, &header_context)
    );
    println!();

    if listing.is_empty() {
        print_info("Nothing to show in this category.");
        return;
    }

    for entry in listing {
        println!("{}", render_entry(entry));
    }

    let summary_context = TemplateContext {
        count: Some(listing.len()),
        ..Default::default()
    };
    println!();
    println!("{}", render_template(TEMPLATES.summary, &summary_context));
}
