//! Shared RSS 2.0 / Atom parsing.
//!
//! Used by [`super::rss_feeds`] and [`super::google_trends`]. Both `<item>`
//! and `<entry>` elements are treated as one feed item.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::SourceError;
use crate::extract::strip_html;

/// One item or entry from a feed. Missing fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FeedItem {
    pub(crate) title: String,
    pub(crate) link: String,
    pub(crate) published: String,
    /// Plain text; HTML markup is stripped.
    pub(crate) description: String,
    /// Google Trends `<ht:approx_traffic>`, when present.
    pub(crate) approx_traffic: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Published,
    Description,
    Traffic,
    Other,
}

fn field_for(name: &str) -> Field {
    match name {
        "title" => Field::Title,
        "link" => Field::Link,
        "pubDate" | "published" | "updated" | "dc:date" => Field::Published,
        "description" | "summary" => Field::Description,
        "ht:approx_traffic" => Field::Traffic,
        _ => Field::Other,
    }
}

fn is_item_tag(name: &str) -> bool {
    name == "item" || name == "entry"
}

/// Parse an RSS or Atom document into at most `max_items` items.
///
/// Items without a title are skipped.
///
/// # Errors
///
/// Returns [`SourceError::Xml`] if the XML is malformed.
pub(crate) fn parse_feed(xml: &str, max_items: usize) -> Result<Vec<FeedItem>, SourceError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut current: Option<FeedItem> = None;
    let mut field = Field::Other;
    let mut raw_description = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = tag_name(&e);
                if is_item_tag(&name) {
                    current = Some(FeedItem::default());
                    raw_description.clear();
                    field = Field::Other;
                } else if let Some(item) = current.as_mut() {
                    let next = field_for(&name);
                    if next == Field::Link {
                        take_atom_href(&e, item);
                    }
                    // Markup nested inside a description stays part of it.
                    if !(field == Field::Description && next == Field::Other) {
                        field = next;
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                if let Some(item) = current.as_mut() {
                    if tag_name(&e) == "link" {
                        take_atom_href(&e, item);
                    }
                }
            }
            Ok(Event::End(e)) => {
                let raw = e.name();
                let name = std::str::from_utf8(raw.as_ref()).unwrap_or("");
                if is_item_tag(name) {
                    if let Some(mut item) = current.take() {
                        item.description = strip_html(&raw_description);
                        if !item.title.is_empty() {
                            items.push(item);
                            if items.len() >= max_items {
                                break;
                            }
                        }
                    }
                    field = Field::Other;
                } else if field_for(name) == field {
                    field = Field::Other;
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(item) = current.as_mut() {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    apply_text(item, &mut raw_description, field, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(item) = current.as_mut() {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    apply_text(item, &mut raw_description, field, &text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SourceError::Xml(e)),
            _ => {}
        }
    }

    Ok(items)
}

fn tag_name(e: &BytesStart<'_>) -> String {
    std::str::from_utf8(e.name().as_ref())
        .unwrap_or("")
        .to_string()
}

fn apply_text(item: &mut FeedItem, raw_description: &mut String, field: Field, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    match field {
        Field::Title => item.title.push_str(text),
        Field::Link if item.link.is_empty() => item.link = text.to_string(),
        Field::Published if item.published.is_empty() => item.published = text.to_string(),
        Field::Description => {
            if !raw_description.is_empty() {
                raw_description.push(' ');
            }
            raw_description.push_str(text);
        }
        Field::Traffic => item.approx_traffic = Some(text.to_string()),
        _ => {}
    }
}

/// Atom links carry the URL in `href`; prefer `rel="alternate"` (or no rel).
fn take_atom_href(e: &BytesStart<'_>, item: &mut FeedItem) {
    if !item.link.is_empty() {
        return;
    }
    let mut href = None;
    let mut rel = None;
    for attr in e.attributes().flatten() {
        let value = String::from_utf8_lossy(attr.value.as_ref()).into_owned();
        match attr.key.as_ref() {
            b"href" => href = Some(value),
            b"rel" => rel = Some(value),
            _ => {}
        }
    }
    if let Some(href) = href {
        if rel.as_deref().is_none_or(|r| r == "alternate") {
            item.link = href;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Eater</title>
    <item>
      <title>The Dubai Chocolate Bar Craze Is Not Slowing Down</title>
      <link>https://example.com/dubai-chocolate</link>
      <pubDate>Mon, 13 Oct 2026 14:00:00 GMT</pubDate>
      <description><![CDATA[<p>Pistachio <b>kataifi</b> everywhere.</p>]]></description>
    </item>
    <item>
      <title>Untitled link only</title>
      <link>https://example.com/2</link>
    </item>
    <item>
      <link>https://example.com/no-title</link>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Food52</title>
  <entry>
    <title type="html">Ube Everything</title>
    <link rel="alternate" href="https://example.com/ube"/>
    <link rel="self" href="https://example.com/ube.atom"/>
    <published>2026-10-12T09:00:00Z</published>
    <updated>2026-10-13T09:00:00Z</updated>
    <summary>Purple yam &lt;em&gt;desserts&lt;/em&gt; are spreading.</summary>
  </entry>
</feed>"#;

    #[test]
    fn parses_rss_items() {
        let items = parse_feed(RSS, 15).expect("valid rss");
        assert_eq!(items.len(), 2, "item without title is skipped");
        assert_eq!(items[0].link, "https://example.com/dubai-chocolate");
        assert_eq!(items[0].published, "Mon, 13 Oct 2026 14:00:00 GMT");
        assert_eq!(items[0].description, "Pistachio kataifi everywhere.");
        assert!(items[1].description.is_empty());
    }

    #[test]
    fn parses_atom_entries() {
        let items = parse_feed(ATOM, 15).expect("valid atom");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Ube Everything");
        assert_eq!(items[0].link, "https://example.com/ube");
        assert_eq!(items[0].published, "2026-10-12T09:00:00Z");
        assert_eq!(items[0].description, "Purple yam desserts are spreading.");
    }

    #[test]
    fn stops_at_max_items() {
        let items = parse_feed(RSS, 1).expect("valid rss");
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn empty_channel_returns_empty_vec() {
        let xml = r#"<?xml version="1.0"?><rss version="2.0"><channel></channel></rss>"#;
        assert!(parse_feed(xml, 10).expect("valid").is_empty());
    }

    #[test]
    fn malformed_xml_is_error_or_empty() {
        match parse_feed("<rss><channel><item><title>Unclosed", 10) {
            Ok(items) => assert!(items.is_empty()),
            Err(SourceError::Xml(_)) => {}
            Err(e) => panic!("unexpected error type: {e}"),
        }
    }
}
