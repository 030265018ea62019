// =============================================================================
// extractors/links.rs - THE ORDER SHEET FINDER
// =============================================================================
//
// Orders and judgments are what people actually want from a case page, and
// courts link them in one of two ways:
//
// 1. A plain link to a `.pdf`. Easy. We take every one of those.
// 2. A link to some viewer script (`display_pdf.php`, `viewOrder?id=...`)
//    with the word order/judgment somewhere in the target. Only worth
//    looking at when tier 1 found nothing, since otherwise it mostly picks
//    up navigation links like "Order of Business".
//
// Document order is kept. Duplicates are kept too: the same order linked
// from "Order" and from "Download" is two rows on the page, so it is two
// rows here.
// =============================================================================

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

use crate::models::DocumentLink;

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("Failed to parse link selector"));

/// Substrings that make a non-pdf target look like an order or judgment.
/// Both spellings of judgment are in the wild.
const ORDER_KEYWORDS: &[&str] = &["order", "judgement", "judgment"];

/// Which strategy produced the links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTier {
    /// Targets ending in `.pdf`.
    Pdf,
    /// Targets mentioning order/judgment, used only when no pdf links exist.
    OrderKeyword,
}

fn is_pdf_target(href: &str) -> bool {
    href.to_lowercase().ends_with(".pdf")
}

fn is_order_target(href: &str) -> bool {
    let lowered = href.to_lowercase();
    ORDER_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}

/// Visible text of a link: each text node trimmed, then concatenated.
/// Whitespace inside a node is left alone.
fn link_label(element: &ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// Every hyperlink in document order whose target passes `keep`.
fn collect_links(document: &Html, keep: fn(&str) -> bool) -> Vec<DocumentLink> {
    document
        .select(&LINK_SELECTOR)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            keep(href).then(|| DocumentLink {
                label: link_label(&element),
                url: href.to_string(),
            })
        })
        .collect()
}

/// Extract links and report which tier produced them. `None` when neither
/// tier found anything.
pub fn extract_with_tier(document: &Html) -> (Vec<DocumentLink>, Option<LinkTier>) {
    let pdf_links = collect_links(document, is_pdf_target);
    if !pdf_links.is_empty() {
        debug!(count = pdf_links.len(), "Document links found via pdf targets");
        return (pdf_links, Some(LinkTier::Pdf));
    }

    let order_links = collect_links(document, is_order_target);
    if !order_links.is_empty() {
        debug!(
            count = order_links.len(),
            "No pdf targets, document links found via order/judgment keywords"
        );
        return (order_links, Some(LinkTier::OrderKeyword));
    }

    (Vec::new(), None)
}

/// Candidate order/judgment links in document order.
pub fn extract(document: &Html) -> Vec<DocumentLink> {
    extract_with_tier(document).0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links_in(html: &str) -> (Vec<DocumentLink>, Option<LinkTier>) {
        extract_with_tier(&Html::parse_document(html))
    }

    #[test]
    fn test_pdf_links_in_document_order() {
        let (links, tier) = links_in(
            r#"<a href="/orders/b.PDF"> Second order </a>
               <a href="/home">Home</a>
               <a href="https://host/x/a.pdf">Final Judgment</a>"#,
        );
        assert_eq!(tier, Some(LinkTier::Pdf));
        assert_eq!(
            links,
            vec![
                DocumentLink {
                    label: "Second order".to_string(),
                    url: "/orders/b.PDF".to_string(),
                },
                DocumentLink {
                    label: "Final Judgment".to_string(),
                    url: "https://host/x/a.pdf".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_fallback_only_when_no_pdf() {
        let (links, tier) = links_in(
            r#"<a href="/home">Home</a>
               <a href="/cases/viewJudgment?id=7">Judgment</a>"#,
        );
        assert_eq!(tier, Some(LinkTier::OrderKeyword));
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "/cases/viewJudgment?id=7");
        assert_eq!(links[0].label, "Judgment");
    }

    #[test]
    fn test_fallback_never_runs_when_pdf_exists() {
        let (links, tier) = links_in(
            r#"<a href="/viewOrder?id=1">Order 1</a>
               <a href="/files/notice.pdf">Notice</a>
               <a href="/viewJudgement?id=2">Judgement</a>"#,
        );
        assert_eq!(tier, Some(LinkTier::Pdf));
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "/files/notice.pdf");
    }

    #[test]
    fn test_duplicates_are_kept() {
        let (links, _) = links_in(
            r#"<a href="/o/1.pdf">Order</a><a href="/o/1.pdf">Download</a>"#,
        );
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].url, links[1].url);
        assert_ne!(links[0].label, links[1].label);
    }

    #[test]
    fn test_pdf_must_be_suffix_of_raw_target() {
        let (links, tier) = links_in(r#"<a href="/files/a.pdf?download=1">A</a>"#);
        // Not a pdf by suffix, and no order keyword either.
        assert!(links.is_empty());
        assert_eq!(tier, None);
    }

    #[test]
    fn test_anchor_without_href_is_ignored() {
        let (links, _) = links_in(r#"<a name="order.pdf">Anchor</a>"#);
        assert!(links.is_empty());
    }

    #[test]
    fn test_label_trims_each_text_node() {
        let (links, _) = links_in("<a href='/o.pdf'> <b>Order</b> dated  1-1-21\n  copy </a>");
        assert_eq!(links[0].label, "Orderdated  1-1-21\n  copy");
    }
}
