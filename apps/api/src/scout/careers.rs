//! Careers-Link Resolver: finds the jobs/careers page linked from a homepage.

use scraper::{Html, Selector};
use url::Url;

/// Anchor-text markers that identify a careers-like link.
const CAREERS_MARKERS: &[&str] = &["career", "job", "join us", "work with us", "hiring"];

/// Returns the absolute URL of the first anchor (in document order) whose
/// text mentions a careers marker. Relative hrefs are resolved against
/// `base_url`; anchors whose href cannot be resolved are skipped.
pub fn find_careers_link(document: &Html, base_url: &str) -> Option<String> {
    let anchor_selector = Selector::parse("a[href]").ok()?;
    let base = Url::parse(base_url).ok();

    document
        .select(&anchor_selector)
        .filter(|anchor| {
            let text = anchor.text().collect::<String>().trim().to_lowercase();
            CAREERS_MARKERS.iter().any(|marker| text.contains(marker))
        })
        .filter_map(|anchor| anchor.value().attr("href"))
        .find_map(|href| resolve_href(base.as_ref(), href))
}

fn resolve_href(base: Option<&Url>, href: &str) -> Option<String> {
    let href = href.trim();
    match base {
        Some(base) => base.join(href).ok().map(String::from),
        None => Url::parse(href).ok().map(String::from),
    }
}
