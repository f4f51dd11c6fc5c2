use crate::error::{Result, SitemapError};
use quick_xml::events::{BytesRef, Event};
use scraper::{ElementRef, Html};

/// How raw sitemap content is turned into a [`ParsedDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsingMethod {
    /// Well-formed XML only; malformed input is a parse error.
    #[default]
    Strict,
    /// Error-tolerant HTML-style parsing, the fallback for feeds that
    /// strict mode rejects (unclosed tags, stray entities).
    Lenient,
}

/// One element of a parsed sitemap. Names are local names, lowercased,
/// with any namespace prefix stripped, so `news:publication_date` and
/// `publication_date` are the same element to callers.
#[derive(Debug, Clone, Default)]
pub(crate) struct Element {
    pub(crate) name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn new(name: String) -> Self {
        Element {
            name,
            text: String::new(),
            children: Vec::new(),
        }
    }

    fn collect_into<'a>(&'a self, local: &str, out: &mut Vec<&'a Element>) {
        for child in &self.children {
            if child.name == local {
                out.push(child);
            }
            child.collect_into(local, out);
        }
    }

    /// All descendant elements with the given local name, document order.
    pub(crate) fn descendants(&self, local: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_into(local, &mut out);
        out
    }

    /// Text of the first descendant with the given local name that has
    /// non-empty text, surrounding whitespace trimmed.
    pub(crate) fn text_of(&self, local: &str) -> Option<&str> {
        self.descendants(local)
            .into_iter()
            .map(|e| e.text.trim())
            .find(|t| !t.is_empty())
    }

    // Text arrives in chunks (references split it); trimming happens
    // on read so concatenation stays lossless.
    fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }
}

/// Navigable tree produced by either parsing method. Callers cannot tell
/// which method built it.
#[derive(Debug)]
pub struct ParsedDocument {
    root: Element,
}

impl ParsedDocument {
    /// Local name of the document root (`sitemapindex`, `urlset`, ...).
    pub fn root_name(&self) -> &str {
        &self.root.name
    }

    /// All descendant elements with the given local name, document order.
    pub(crate) fn elements(&self, local: &str) -> Vec<&Element> {
        self.root.descendants(local)
    }
}

/// Parse raw sitemap content with the selected method.
pub fn parse(content: &str, method: ParsingMethod) -> Result<ParsedDocument> {
    match method {
        ParsingMethod::Strict => parse_strict(content),
        ParsingMethod::Lenient => Ok(parse_lenient(content)),
    }
}

fn local_name(raw: &str) -> String {
    raw.rsplit(':').next().unwrap_or(raw).to_ascii_lowercase()
}

fn parse_strict(content: &str) -> Result<ParsedDocument> {
    let mut reader = quick_xml::Reader::from_str(content);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    let attach = |stack: &mut Vec<Element>, root: &mut Option<Element>, el: Element| {
        match stack.last_mut() {
            Some(parent) => {
                parent.children.push(el);
                Ok(())
            }
            None if root.is_none() => {
                *root = Some(el);
                Ok(())
            }
            None => Err(SitemapError::Parse(
                "multiple root elements".to_string(),
            )),
        }
    };

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = local_name(&String::from_utf8_lossy(e.local_name().as_ref()));
                stack.push(Element::new(name));
            }
            Ok(Event::Empty(e)) => {
                let name = local_name(&String::from_utf8_lossy(e.local_name().as_ref()));
                attach(&mut stack, &mut root, Element::new(name))?;
            }
            Ok(Event::End(_)) => {
                // quick-xml has already checked the end name matches
                let el = stack
                    .pop()
                    .ok_or_else(|| SitemapError::Parse("unexpected end tag".to_string()))?;
                attach(&mut stack, &mut root, el)?;
            }
            Ok(Event::Text(e)) => {
                let text = e.decode().map_err(|e| SitemapError::Parse(e.to_string()))?;
                if let Some(top) = stack.last_mut() {
                    top.push_text(&text);
                }
            }
            // entity and character references are their own events and
            // must be stitched back into the surrounding text
            Ok(Event::GeneralRef(e)) => {
                let text = resolve_reference(&e)?;
                if let Some(top) = stack.last_mut() {
                    top.push_text(&text);
                }
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                if let Some(top) = stack.last_mut() {
                    top.push_text(&text);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(SitemapError::Parse(e.to_string())),
        }
    }

    if !stack.is_empty() {
        return Err(SitemapError::Parse(
            "unclosed element at end of document".to_string(),
        ));
    }

    root.map(|root| ParsedDocument { root })
        .ok_or_else(|| SitemapError::Parse("no root element".to_string()))
}

/// Resolve a numeric character reference or one of XML's five predefined
/// entities; anything else is malformed under strict parsing.
fn resolve_reference(r: &BytesRef) -> Result<String> {
    if let Some(ch) = r
        .resolve_char_ref()
        .map_err(|e| SitemapError::Parse(e.to_string()))?
    {
        return Ok(ch.to_string());
    }
    let name = r.decode().map_err(|e| SitemapError::Parse(e.to_string()))?;
    let resolved = match name.as_ref() {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "apos" => "'",
        "quot" => "\"",
        _ => {
            return Err(SitemapError::Parse(format!(
                "unknown entity reference: &{name};"
            )))
        }
    };
    Ok(resolved.to_string())
}

fn parse_lenient(content: &str) -> ParsedDocument {
    let html = Html::parse_document(content);
    let root = convert(html.root_element());

    ParsedDocument {
        root: effective_root(root),
    }
}

fn convert(el: ElementRef) -> Element {
    let mut node = Element::new(local_name(el.value().name()));
    for child in el.children() {
        if let Some(cel) = ElementRef::wrap(child) {
            node.children.push(convert(cel));
        } else if let Some(text) = child.value().as_text() {
            node.push_text(text);
        }
    }
    node
}

/// The HTML parser wraps everything in a synthetic `html`/`head`/`body`
/// shell; the sitemap root is the first element below it.
fn effective_root(root: Element) -> Element {
    fn find(el: &Element) -> Option<&Element> {
        if !matches!(el.name.as_str(), "html" | "head" | "body") {
            return Some(el);
        }
        el.children.iter().find_map(find)
    }

    match find(&root) {
        Some(found) => found.clone(),
        None => root,
    }
}
