use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use crate::profile::{username_from_href, ParsedExport, ProfileRecord};

/// Class signature of one profile row in the export page.
const ENTRY_SELECTOR: &str = "div.pam._3-95._2ph-._a6-g.uiBoxWhite.noborder";
const LINK_SELECTOR: &str = "a";
const DATE_SELECTOR: &str = "div._a6-p > div > div:nth-of-type(2)";
const TITLE_SELECTOR: &str = "h1";

struct ExportSelectors {
    entry: Selector,
    link: Selector,
    date: Selector,
    title: Selector,
}

impl ExportSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            entry: selector(ENTRY_SELECTOR)?,
            link: selector(LINK_SELECTOR)?,
            date: selector(DATE_SELECTOR)?,
            title: selector(TITLE_SELECTOR)?,
        })
    }
}

fn selector(css: &'static str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector {:?}: {:?}", css, e))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parses a rendered HTML export page. Rows without a link are skipped.
pub fn parse_html_export(content: &str) -> Result<ParsedExport> {
    let selectors = ExportSelectors::new()?;
    let document = Html::parse_document(content);

    let page_title = document
        .select(&selectors.title)
        .next()
        .map(element_text)
        .filter(|title| !title.is_empty());

    let mut parsed = ParsedExport {
        page_title,
        ..Default::default()
    };

    for (index, entry) in document.select(&selectors.entry).enumerate() {
        match extract_record(entry, &selectors) {
            Some(record) => parsed.records.push(record),
            None => {
                debug!(
                    action = "skip",
                    component = "html_export",
                    entry_index = index,
                    "Profile row has no usable link"
                );
                parsed.skipped += 1;
            }
        }
    }

    info!(
        action = "complete",
        component = "html_export",
        record_count = parsed.records.len(),
        skipped = parsed.skipped,
        page_title = ?parsed.page_title,
        "Parsed HTML export"
    );
    Ok(parsed)
}

fn extract_record(entry: ElementRef<'_>, selectors: &ExportSelectors) -> Option<ProfileRecord> {
    let link = entry.select(&selectors.link).next()?;
    let href = link.value().attr("href").unwrap_or_default().to_string();

    let text = element_text(link);
    let username = if text.is_empty() {
        username_from_href(&href)?
    } else {
        text
    };

    let date_text = entry
        .select(&selectors.date)
        .next()
        .map(element_text)
        .unwrap_or_default();

    Some(ProfileRecord::new(username, href).with_date_text(date_text))
}
