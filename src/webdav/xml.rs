//! Structured writer for request bodies.
//!
//! Element names are fixed by the callers; every caller-supplied value goes
//! through [`XmlBody::text_element`], which escapes it.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::DavError;

pub const NS_DAV: &str = "DAV:";
pub const NS_OWNCLOUD: &str = "http://owncloud.org/ns";
pub const NS_NEXTCLOUD: &str = "http://nextcloud.org/ns";

/// `xmlns` attributes for the `d`, `oc` and `nc` prefixes.
pub const CLOUD_NAMESPACES: [(&str, &str); 3] = [
    ("xmlns:d", NS_DAV),
    ("xmlns:oc", NS_OWNCLOUD),
    ("xmlns:nc", NS_NEXTCLOUD),
];

pub struct XmlBody {
    writer: Writer<Vec<u8>>,
    open: Vec<&'static str>,
}

impl XmlBody {
    /// Start a document with an XML declaration and the given root element.
    pub fn new(root: &'static str, namespaces: &[(&str, &str)]) -> Result<Self, DavError> {
        let mut body = Self {
            writer: Writer::new(Vec::with_capacity(1024)),
            open: Vec::with_capacity(8),
        };
        body.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        let start = BytesStart::new(root).with_attributes(namespaces.iter().copied());
        body.write(Event::Start(start))?;
        body.open.push(root);
        Ok(body)
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), DavError> {
        self.writer
            .write_event(event)
            .map_err(|e| DavError::Encoding(e.to_string()))
    }

    pub fn open(&mut self, name: &'static str) -> Result<&mut Self, DavError> {
        self.write(Event::Start(BytesStart::new(name)))?;
        self.open.push(name);
        Ok(self)
    }

    pub fn close(&mut self) -> Result<&mut Self, DavError> {
        let Some(name) = self.open.pop() else {
            return Err(DavError::Encoding("unbalanced XML body".to_string()));
        };
        self.write(Event::End(BytesEnd::new(name)))?;
        Ok(self)
    }

    pub fn empty(&mut self, name: &'static str) -> Result<&mut Self, DavError> {
        self.write(Event::Empty(BytesStart::new(name)))?;
        Ok(self)
    }

    pub fn empties(&mut self, names: &[&'static str]) -> Result<&mut Self, DavError> {
        for name in names {
            self.empty(name)?;
        }
        Ok(self)
    }

    /// `<name>text</name>` with `text` escaped.
    pub fn text_element(&mut self, name: &'static str, text: &str) -> Result<&mut Self, DavError> {
        self.write(Event::Start(BytesStart::new(name)))?;
        self.write(Event::Text(BytesText::new(text)))?;
        self.write(Event::End(BytesEnd::new(name)))?;
        Ok(self)
    }

    /// Close every open element and return the document.
    pub fn finish(mut self) -> Result<String, DavError> {
        while !self.open.is_empty() {
            self.close()?;
        }
        String::from_utf8(self.writer.into_inner())
            .map_err(|e| DavError::Encoding(e.to_string()))
    }
}
