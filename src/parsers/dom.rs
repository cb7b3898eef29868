//! Lightweight owned DOM over the `quick-xml` event reader.
//!
//! Checklist merging needs random access and in-place mutation of the
//! document tree, which the streaming event API does not give directly. This
//! module builds an owned [`XmlElement`] tree from the event stream and
//! serializes it back without insignificant whitespace.
//!
//! XML declarations, comments, processing instructions and DOCTYPE nodes are
//! dropped on parse. Serializing a parsed tree therefore yields a canonical
//! form, and [`canonicalize`] is idempotent.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::ParseError;

/// An XML element with its attributes, direct text content and child
/// elements. Attribute and child order are preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// Qualified element name, prefix included ("cdf:result" stays
    /// "cdf:result")
    pub name: String,
    /// Attributes in document order as (qualified name, unescaped value)
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order
    pub children: Vec<XmlElement>,
    /// Text content held directly by this element, entities unescaped
    pub text: String,
}

impl XmlElement {
    /// Create an element with no attributes, children or text.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: String::new(),
        }
    }

    /// Create an element holding only text content.
    #[must_use]
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::new(name)
        }
    }

    /// First direct child with the given qualified name.
    #[must_use]
    pub fn find_child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Mutable variant of [`find_child`](Self::find_child).
    pub fn find_child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.children.iter_mut().find(|child| child.name == name)
    }

    /// First descendant with the given qualified name, in document order.
    /// The element itself is not considered.
    #[must_use]
    pub fn find_descendant(&self, name: &str) -> Option<&XmlElement> {
        self.descendants().find(|element| element.name == name)
    }

    /// Mutable variant of [`find_descendant`](Self::find_descendant).
    pub fn find_descendant_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        for child in &mut self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find_descendant_mut(name) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants in document order, the element itself excluded.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Descendants with the given qualified name, in document order.
    pub fn descendants_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.descendants().filter(move |element| element.name == name)
    }

    /// Apply `visit` to every descendant with the given qualified name, in
    /// document order. Matching elements are also recursed into.
    pub fn for_each_descendant_mut(
        &mut self,
        name: &str,
        visit: &mut dyn FnMut(&mut XmlElement),
    ) {
        for child in &mut self.children {
            if child.name == name {
                visit(child);
            }
            child.for_each_descendant_mut(name, visit);
        }
    }

    /// Concatenated text of this element and all its descendants, in
    /// document order.
    #[must_use]
    pub fn inner_text(&self) -> String {
        let mut text = self.text.clone();
        for descendant in self.descendants() {
            text.push_str(&descendant.text);
        }
        text
    }

    /// Serialize this element and its subtree to an XML string.
    ///
    /// No XML declaration is emitted and no indentation is added. Elements
    /// with neither text nor children come out self-closing. Text and
    /// attribute values are re-escaped.
    pub fn to_xml(&self) -> Result<String, ParseError> {
        let mut writer = Writer::new(Vec::new());
        self.write_into(&mut writer)?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }

    fn write_into(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), ParseError> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.text.is_empty() && self.children.is_empty() {
            writer
                .write_event(Event::Empty(start))
                .map_err(|e| ParseError::Write(e.to_string()))?;
            return Ok(());
        }

        writer
            .write_event(Event::Start(start))
            .map_err(|e| ParseError::Write(e.to_string()))?;
        if !self.text.is_empty() {
            writer
                .write_event(Event::Text(BytesText::new(&self.text)))
                .map_err(|e| ParseError::Write(e.to_string()))?;
        }
        for child in &self.children {
            child.write_into(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(|e| ParseError::Write(e.to_string()))?;
        Ok(())
    }
}

/// Document-order iterator over an element's descendants.
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}

/// Parse an XML document into its root [`XmlElement`].
///
/// Whitespace-only text nodes are dropped. Leading and trailing whitespace of
/// remaining text nodes is trimmed. CDATA sections fold into element text.
pub fn parse_document(content: &str) -> Result<XmlElement, ParseError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut open: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                open.push(element_from_start(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                let element = element_from_start(e)?;
                attach(element, &mut open, &mut root)?;
            }
            Ok(Event::Text(ref e)) => {
                let unescaped = e
                    .unescape()
                    .map_err(|err| ParseError::InvalidXml(err.to_string()))?;
                if let Some(current) = open.last_mut() {
                    current.text.push_str(&unescaped);
                }
            }
            Ok(Event::CData(ref e)) => {
                if let Some(current) = open.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Ok(Event::End(_)) => {
                let element = open
                    .pop()
                    .ok_or_else(|| ParseError::InvalidXml("unexpected closing tag".to_string()))?;
                attach(element, &mut open, &mut root)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ParseError::InvalidXml(format!(
                    "error at position {}: {e:?}",
                    reader.buffer_position()
                )))
            }
            // Declarations, comments, PIs and DOCTYPE carry no content
            Ok(_) => {}
        }
        buf.clear();
    }

    if !open.is_empty() {
        return Err(ParseError::InvalidXml("unclosed element".to_string()));
    }
    root.ok_or(ParseError::NoRoot)
}

/// Re-parse and re-serialize a document, dropping the XML declaration,
/// comments and all insignificant whitespace. Applying it twice yields the
/// same string as applying it once.
pub fn canonicalize(xml: &str) -> Result<String, ParseError> {
    parse_document(xml)?.to_xml()
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement, ParseError> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes().filter_map(std::result::Result::ok) {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| ParseError::InvalidXml(err.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    element: XmlElement,
    open: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
) -> Result<(), ParseError> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(element);
        Ok(())
    } else if root.is_some() {
        Err(ParseError::InvalidXml("multiple root elements".to_string()))
    } else {
        *root = Some(element);
        Ok(())
    }
}
