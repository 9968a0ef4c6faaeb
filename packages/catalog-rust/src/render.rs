//! Plain-text rendering of tables, token details and the collection list.

use std::fmt::Write as _;

use nftview_core::filter::SortDirection;
use nftview_core::view::{HeaderCell, TableView};

use crate::catalog::CatalogEntry;
use crate::detail::TokenDetail;

const SEPARATOR: &str = " | ";

fn width(text: &str) -> usize {
    text.chars().count()
}

fn pad(text: &str, to: usize) -> String {
    let mut out = text.to_string();
    out.extend(std::iter::repeat(' ').take(to.saturating_sub(width(text))));
    out
}

/// Header label with its sort arrow and active-selection marker.
fn header_label(cell: &HeaderCell) -> String {
    let arrow = match cell.sort {
        Some(SortDirection::Asc) => " ^",
        Some(SortDirection::Desc) => " v",
        None => "",
    };
    let marker = if cell.active { "*" } else { "" };
    format!("{}{marker}{arrow}", cell.label)
}

/// The item summary line: `N items`, or `N items (filtered from M)`.
#[must_use]
pub fn summary(view: &TableView) -> String {
    let filtered = view.filtered_count();
    let total = view.total_count();
    if filtered == total {
        format!("{total} items")
    } else {
        format!("{filtered} items (filtered from {total})")
    }
}

/// Current page as an aligned text table followed by the summary and
/// page position.
#[must_use]
pub fn render_table(view: &TableView) -> String {
    let headers: Vec<String> = view.headers().iter().map(header_label).collect();
    let rows = view.render_page();

    let mut widths: Vec<usize> = headers.iter().map(|h| width(h)).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(&row.cells) {
            *w = (*w).max(width(cell));
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| pad(cell, *w))
            .collect::<Vec<_>>()
            .join(SEPARATOR)
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", line(&headers));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    if rows.is_empty() {
        let _ = writeln!(out, "(no matching items)");
    }
    for row in &rows {
        let _ = writeln!(out, "{}", line(&row.cells));
    }
    let _ = write!(
        out,
        "{} | page {} of {} | {} per page",
        summary(view),
        view.current_page(),
        view.total_pages().max(1),
        view.rows_per_page()
    );
    out
}

#[must_use]
pub fn render_detail(detail: &TokenDetail) -> String {
    let label_width = detail.fields.iter().map(|f| width(&f.label)).max().unwrap_or(0);
    let mut out = format!("{} ({})\n", detail.identifier, detail.collection_name);
    for field in &detail.fields {
        let _ = writeln!(out, "  {}  {}", pad(&field.label, label_width), field.value);
    }
    out
}

#[must_use]
pub fn render_entries(entries: &[CatalogEntry]) -> String {
    let id_width = entries.iter().map(|e| width(&e.id)).max().unwrap_or(0);
    let mut out = String::new();
    for entry in entries {
        let scope = if entry.aggregate { "all " } else { "" };
        let _ = writeln!(
            out,
            "{}  {scope}{:<10} {:>5} items  {}",
            pad(&entry.id, id_width),
            entry.kind.as_str(),
            entry.nft_count,
            entry.name
        );
    }
    out
}
