//! Lenient HTML parser built on `quick-xml`.
//!
//! Rendered documentation pages are HTML, not XML, so the reader is configured
//! to tolerate what HTML allows: end tags that don't match, void elements
//! without `/>`, dangling ampersands and valueless attributes. The bodies of
//! raw-text elements (`script`, `style`) are not markup; they are copied up to
//! their end tag and the reader resumes after them.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::ParseError;
use crate::tree::{Attribute, Document, Element, NodeKind};

/// Elements whose content is copied verbatim.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Parse HTML markup into a [`Document`].
///
/// # Errors
///
/// Returns an error if the tokenizer rejects the markup (for example a `<`
/// that doesn't start a tag).
pub fn parse(html: &str) -> Result<Document, ParseError> {
    let mut doc = Document::new();
    let mut open = vec![doc.root()];

    // Byte offset of the reader's input within `html`
    let mut base = 0;
    let mut reader = lenient_reader(html);

    loop {
        let start = base + offset(&reader);
        let event = reader.read_event()?;
        let end = base + offset(&reader);
        let raw = html.get(start..end).unwrap_or_default();
        let parent = open.last().copied().unwrap_or_else(|| doc.root());

        match event {
            Event::Start(e) => {
                let element = decode_element(&e, raw, false);
                let is_void = element.is_void();
                let raw_text_tag = RAW_TEXT_ELEMENTS.iter().find(|t| element.is(t)).copied();
                let id = doc.create(NodeKind::Element(element));
                doc.append_child(parent, id);
                if is_void {
                    continue;
                }
                open.push(id);
                if let Some(tag) = raw_text_tag {
                    let body_end = raw_text_end(html, end, tag);
                    if body_end > end {
                        doc.push_text(id, &html[end..body_end]);
                    }
                    // Restart tokenizing at the end tag so the body is never parsed
                    base = body_end;
                    reader = lenient_reader(&html[body_end..]);
                }
            }
            Event::Empty(e) => {
                let element = decode_element(&e, raw, true);
                let id = doc.create(NodeKind::Element(element));
                doc.append_child(parent, id);
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                // Close the nearest open element with this name, implicitly
                // closing anything opened inside it. Stray end tags are dropped.
                if let Some(pos) = open
                    .iter()
                    .rposition(|&id| doc.is_element(id, &name))
                    .filter(|&pos| pos > 0)
                {
                    open.truncate(pos);
                }
            }
            Event::Text(_) | Event::GeneralRef(_) | Event::CData(_) => {
                doc.push_text(parent, raw);
            }
            Event::Comment(e) => {
                let body = String::from_utf8_lossy(&e).into_owned();
                let id = doc.create(NodeKind::Comment(body));
                doc.append_child(parent, id);
            }
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {
                let id = doc.create(NodeKind::Raw(raw.to_owned()));
                doc.append_child(parent, id);
            }
            Event::Eof => break,
        }
    }

    Ok(doc)
}

fn lenient_reader(input: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(input);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.allow_dangling_amp = true;
    reader
}

/// Where the body of a raw-text element opened just before `from` ends.
///
/// The body runs to the first `</tag` (ASCII case-insensitive) followed by a
/// delimiter, or to the end of the input when the element is never closed.
fn raw_text_end(html: &str, from: usize, tag: &str) -> usize {
    let bytes = html.as_bytes();
    let mut at = from;
    while let Some(found) = html[at..].find("</") {
        let name_start = at + found + 2;
        let name_end = name_start + tag.len();
        let name_matches = bytes
            .get(name_start..name_end)
            .is_some_and(|name| name.eq_ignore_ascii_case(tag.as_bytes()));
        let delimited = bytes
            .get(name_end)
            .is_none_or(|&b| b.is_ascii_whitespace() || b == b'>' || b == b'/');
        if name_matches && delimited {
            return at + found;
        }
        at = name_start;
    }
    html.len()
}

/// Current byte offset of the reader in its input.
fn offset(reader: &Reader<&[u8]>) -> usize {
    usize::try_from(reader.buffer_position()).unwrap_or(usize::MAX)
}

fn decode_element(e: &BytesStart, raw: &str, self_closing: bool) -> Element {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let valueless = valueless_attributes(raw);
    let attrs = e
        .html_attributes()
        .flatten()
        .map(|attr| {
            let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = if attr.value.is_empty() && valueless.contains(&name.to_ascii_lowercase()) {
                None
            } else {
                Some(String::from_utf8_lossy(&attr.value).into_owned())
            };
            Attribute { name, value }
        })
        .collect();

    Element {
        name,
        attrs,
        self_closing,
        source: Some(raw.to_owned()),
    }
}

/// Names of attributes written without `=` in a start tag (lowercased).
///
/// `quick-xml` reports `open` and `open=""` identically; this keeps the
/// distinction so rebuilt tags stay close to the original.
fn valueless_attributes(raw: &str) -> Vec<String> {
    let inner = raw
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim_end_matches('/');
    let mut names = Vec::new();
    let mut chars = inner.char_indices().peekable();

    // Tag name
    while chars.next_if(|&(_, c)| !c.is_whitespace()).is_some() {}

    loop {
        while chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
        let Some(&(start, _)) = chars.peek() else {
            break;
        };
        let mut end = start;
        while let Some((i, c)) = chars.next_if(|&(_, c)| !c.is_whitespace() && c != '=') {
            end = i + c.len_utf8();
        }
        let name = &inner[start..end];

        while chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
        if chars.next_if(|&(_, c)| c == '=').is_some() {
            while chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
            match chars.next() {
                Some((_, quote @ ('"' | '\''))) => {
                    for (_, c) in chars.by_ref() {
                        if c == quote {
                            break;
                        }
                    }
                }
                Some(_) => while chars.next_if(|&(_, c)| !c.is_whitespace()).is_some() {},
                None => {}
            }
        } else if !name.is_empty() {
            names.push(name.to_ascii_lowercase());
        }
    }
    names
}
