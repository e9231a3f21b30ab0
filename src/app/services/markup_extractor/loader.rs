//! Leaf cell extraction from HTML table dumps
//!
//! The dump nests layout tables inside data tables. Only leaf `td` cells are
//! kept: a cell whose inner markup holds a nested `table` or an `input`
//! control is layout, and a cell holding only a non-breaking space is a
//! placeholder. The remaining cells keep document order.

use crate::constants::markup_layout::{PLACEHOLDER_ENTITY, PLACEHOLDER_TEXT};
use crate::{Error, Result};
use scraper::{Html, Selector};
use tracing::debug;

/// Extract the trimmed text of every leaf data cell
pub fn load_cells(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("td")
        .map_err(|e| Error::markup(format!("Invalid cell selector: {}", e)))?;

    let mut skipped = 0;
    let mut cells = Vec::new();

    for cell in document.select(&selector) {
        let inner = cell.inner_html();
        if inner.contains("table") || inner.contains("input") {
            skipped += 1;
            continue;
        }

        let text: String = cell.text().collect();
        if is_placeholder(&text) {
            skipped += 1;
            continue;
        }

        cells.push(text.trim().to_string());
    }

    debug!("Kept {} markup cells, skipped {}", cells.len(), skipped);
    Ok(cells)
}

fn is_placeholder(text: &str) -> bool {
    text == PLACEHOLDER_TEXT || text == PLACEHOLDER_ENTITY
}
