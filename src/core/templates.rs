//! Template system for listing output.
//!
//! Header and summary templates are plain strings with `{placeholder}` fields, substituted
//! in a single pass and then colored. Listing rows have a fixed layout per entry kind and
//! are colored by status in [`render_entry`].
//!
//! # Public API
//! - [`Templates`]: Header and summary template definitions
//! - [`TemplateContext`]: Values substituted into a template
//! - [`TEMPLATES`]: Global template instance
//! - [`render_template`]: Render with colors
//! - [`render_template_plain`]: Render without colors, for tests
//! - [`strip_ansi_codes`]: Remove color codes from rendered text
//! - [`render_entry`]: Render one listing row

use crate::core::colors::{get_kind_marker, get_status_color_style};
use crate::core::entry::Entry;
use crate::core::entry_kind::EntryKind;
use colored::*;
use std::fmt::Write;

/// Template definitions for all output formatting
pub struct Templates {
    pub listing_header: &'static str,
    pub summary: &'static str,
}

/// Global templates instance
pub static TEMPLATES: Templates = Templates {
    listing_header: "Listing: {category} ({source})",
    summary: "{count} entries",
};

/// Context for template rendering
#[derive(Debug, Default)]
pub struct TemplateContext<'a> {
    pub category: Option<&'a str>,
    pub source: Option<&'a str>,
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub status: Option<&'a str>,
    pub kind: Option<EntryKind>,
    pub count: Option<usize>,
}

impl<'a> TemplateContext<'a> {
    pub fn for_entry(entry: &'a Entry) -> Self {
        Self {
            name: Some(entry.name()),
            description: Some(entry.description()),
            status: Some(entry.status()),
            kind: Some(entry.kind()),
            ..Default::default()
        }
    }
}

fn placeholder_value(name: &str, context: &TemplateContext, output: &mut String) -> bool {
    match name {
        "category" => {
            let category = context.category.unwrap_or_default();
            output.push_str(if category.is_empty() { "/" } else { category });
        }
        "source" => output.push_str(context.source.unwrap_or_default()),
        "name" => output.push_str(context.name.unwrap_or_default()),
        "description" => output.push_str(context.description.unwrap_or_default()),
        "status" => output.push_str(context.status.unwrap_or_default()),
        "marker" => output.push_str(context.kind.map(|k| k.marker()).unwrap_or(" ")),
        "count" => {
            if let Some(count) = context.count {
                let _ = write!(output, "{count}");
            }
        }
        _ => return false,
    }
    true
}

/// Single-pass placeholder substitution. Unknown placeholders are kept verbatim.
fn render_placeholders(template: &str, context: &TemplateContext) -> String {
    let mut output = String::with_capacity(template.len() + 64);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        output.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                if !placeholder_value(name, context, &mut output) {
                    output.push('{');
                    output.push_str(name);
                    output.push('}');
                }
                rest = &after[end + 1..];
            }
            None => {
                output.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    output.push_str(rest);
    output
}

/// Render a template with context and apply colors
pub fn render_template(template: &str, context: &TemplateContext) -> String {
    let plain = render_placeholders(template, context);
    if template == TEMPLATES.listing_header {
        return plain.bold().to_string();
    }
    if template == TEMPLATES.summary {
        return plain.bright_black().to_string();
    }
    plain
}

fn render_row(context: &TemplateContext) -> String {
    let mut result = String::with_capacity(128);
    let kind = context.kind.unwrap_or(EntryKind::Item);
    let name = context.name.unwrap_or_default();
    let description = context.description.unwrap_or_default();

    let _ = write!(result, "{} ", get_kind_marker(kind));
    match kind {
        EntryKind::Item => {
            let status = context.status.unwrap_or_default();
            let color_fn = get_status_color_style(status);
            let _ = write!(
                result,
                "{} {}{}{}",
                color_fn(name),
                "(".bright_black(),
                color_fn(status),
                ")".bright_black()
            );
        }
        EntryKind::Category => {
            let _ = write!(result, "{}", format!("{name}/").blue());
        }
        EntryKind::Back => {
            let _ = write!(result, "{}", name.bright_black());
        }
    }

    if kind != EntryKind::Back && !description.is_empty() {
        let _ = write!(result, "  {}", description.bright_black());
    }
    result
}

pub fn render_entry(entry: &Entry) -> String {
    render_row(&TemplateContext::for_entry(entry))
}

/// Strip ANSI color codes for testing
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for ch in chars.by_ref() {
                if ch.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            result.push(ch);
        }
    }

    result
}

/// Render template without colors for testing
pub fn render_template_plain(template: &str, context: &TemplateContext) -> String {
    strip_ansi_codes(&render_template(template, context))
}
