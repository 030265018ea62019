// =============================================================================
// extractors/mod.rs - THE DIG SITE
// =============================================================================
//
// Once a page has been cleared by the challenge scanner, two extractors go
// over it:
//
// - `fields` reads the page as plain text, one visual line per line, and
//   applies an ordered table of regexes to find parties and dates.
// - `links` walks the parsed DOM for hyperlinks that look like orders or
//   judgments, because reading an href from text would be silly.
//
// Neither of them can fail. The worst they can do is find nothing, which on
// a court website is a very plausible result.
// =============================================================================

pub mod fields;
pub mod links;

use scraper::Html;
use tracing::debug;

use crate::models::ParsedCaseRecord;

/// Elements whose text is never part of the rendered page.
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Flatten a parsed document into human-readable text.
///
/// Every text node becomes its own line, so a label cell and its value cell
/// end up on adjacent lines and a `<br>`-separated block keeps its breaks.
pub fn page_text(document: &Html) -> String {
    let mut pieces: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let invisible = node
            .parent()
            .and_then(|parent| parent.value().as_element())
            .map(|element| INVISIBLE_ELEMENTS.contains(&element.name()))
            .unwrap_or(false);
        if invisible {
            continue;
        }

        pieces.push(&**text);
    }

    pieces.join("\n")
}

/// Run both extractors over a raw body that has already been cleared as
/// normal content.
pub fn extract_record(body: &str) -> ParsedCaseRecord {
    let document = Html::parse_document(body);
    let text = page_text(&document);

    let fields = fields::extract(&text);
    let document_links = links::extract(&document);

    let record = ParsedCaseRecord::new(fields, document_links);

    debug!(
        petitioner = record.petitioner.is_some(),
        respondent = record.respondent.is_some(),
        filing_date = record.filing_date.is_some(),
        next_hearing_date = record.next_hearing_date.is_some(),
        document_links = record.document_links.len(),
        "Extraction complete"
    );

    record
}
