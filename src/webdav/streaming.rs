use crate::webdav::types::{DavProp, DavResponse, PropMap};
use anyhow::{Result, anyhow};
use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesRef, Event};
use std::io::{BufRead, Cursor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ElementName {
    Multistatus,
    Response,
    Propstat,
    Prop,
    Href,
    Status,
    Other,
}

pub(crate) fn local_name(raw: &[u8]) -> &[u8] {
    match raw.iter().position(|b| *b == b':') {
        Some(idx) => &raw[idx + 1..],
        None => raw,
    }
}

pub(crate) fn element_from_bytes(raw: &[u8]) -> ElementName {
    let local = local_name(raw);

    if local.eq_ignore_ascii_case(b"multistatus") {
        ElementName::Multistatus
    } else if local.eq_ignore_ascii_case(b"response") {
        ElementName::Response
    } else if local.eq_ignore_ascii_case(b"propstat") {
        ElementName::Propstat
    } else if local.eq_ignore_ascii_case(b"prop") {
        ElementName::Prop
    } else if local.eq_ignore_ascii_case(b"href") {
        ElementName::Href
    } else if local.eq_ignore_ascii_case(b"status") {
        ElementName::Status
    } else {
        ElementName::Other
    }
}

pub(crate) fn path_ends_with<T: PartialEq>(stack: &[T], needle: &[T]) -> bool {
    stack.len() >= needle.len() && stack[stack.len() - needle.len()..] == needle[..]
}

/// Status code out of a status line such as `HTTP/1.1 404 Not Found`.
pub fn status_code(line: &str) -> Option<u16> {
    line.split_whitespace().nth(1)?.parse().ok()
}

pub(crate) trait ItemConsumer {
    fn consume(&mut self, item: DavResponse) -> Result<()>;
}

impl ItemConsumer for Vec<DavResponse> {
    fn consume(&mut self, item: DavResponse) -> Result<()> {
        self.push(item);
        Ok(())
    }
}

impl<F> ItemConsumer for F
where
    F: FnMut(DavResponse) -> Result<()>,
{
    fn consume(&mut self, item: DavResponse) -> Result<()> {
        (self)(item)
    }
}

pub(crate) struct MultistatusParser<C> {
    stack: Vec<ElementName>,
    /// Stack length right after `<prop>` was pushed, while inside one.
    prop_depth: Option<usize>,
    href: String,
    response_props: PropMap,
    response_ok: bool,
    propstat_props: PropMap,
    propstat_status: String,
    current_prop: Option<(String, DavProp)>,
    sink: C,
}

impl<C: ItemConsumer> MultistatusParser<C> {
    pub fn new(sink: C) -> Self {
        Self {
            stack: Vec::with_capacity(16),
            prop_depth: None,
            href: String::new(),
            response_props: PropMap::new(),
            response_ok: false,
            propstat_props: PropMap::new(),
            propstat_status: String::new(),
            current_prop: None,
            sink,
        }
    }

    fn finish(self) -> C {
        self.sink
    }

    fn path_ends_with(&self, needle: &[ElementName]) -> bool {
        path_ends_with(&self.stack, needle)
    }

    fn on_start(&mut self, raw: &[u8]) {
        if let Some(depth) = self.prop_depth {
            let name = String::from_utf8_lossy(local_name(raw)).to_ascii_lowercase();
            let nesting = self.stack.len() - depth;
            if nesting == 0 {
                self.current_prop = Some((name, DavProp::default()));
            } else if nesting == 1
                && let Some((_, prop)) = self.current_prop.as_mut()
            {
                prop.children.push((name, String::new()));
            }
            self.stack.push(ElementName::Other);
            return;
        }

        let element = element_from_bytes(raw);
        match element {
            ElementName::Response => {
                self.href.clear();
                self.response_props.clear();
                self.response_ok = false;
            }
            ElementName::Propstat => {
                self.propstat_props.clear();
                self.propstat_status.clear();
            }
            _ => {}
        }
        self.stack.push(element);

        if element == ElementName::Prop
            && self.path_ends_with(&[ElementName::Propstat, ElementName::Prop])
        {
            self.prop_depth = Some(self.stack.len());
        }
    }

    fn on_end(&mut self) -> Result<()> {
        let Some(popped) = self.stack.pop() else {
            return Ok(());
        };

        if let Some(depth) = self.prop_depth {
            if self.stack.len() == depth {
                if let Some((name, mut prop)) = self.current_prop.take() {
                    for (_, text) in prop.children.iter_mut() {
                        *text = text.trim().to_string();
                    }
                    self.propstat_props.insert(name, prop);
                }
            } else if self.stack.len() + 1 == depth {
                self.prop_depth = None;
            }
            return Ok(());
        }

        match popped {
            ElementName::Propstat => {
                if status_code(&self.propstat_status) == Some(200) {
                    self.response_props.extend(self.propstat_props.drain());
                    self.response_ok = true;
                } else {
                    self.propstat_props.clear();
                }
            }
            ElementName::Response => {
                if self.response_ok {
                    let finished = DavResponse {
                        href: self.href.trim().to_string(),
                        props: std::mem::take(&mut self.response_props),
                    };
                    self.sink.consume(finished)?;
                }
                self.response_ok = false;
            }
            _ => {}
        }
        Ok(())
    }

    fn on_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        if let Some(depth) = self.prop_depth {
            let nesting = self.stack.len().saturating_sub(depth);
            if let Some((_, prop)) = self.current_prop.as_mut() {
                if nesting == 1 {
                    prop.text.push_str(text);
                } else if nesting >= 2
                    && let Some((_, child)) = prop.children.last_mut()
                {
                    child.push_str(text);
                }
            }
            return;
        }

        if self.path_ends_with(&[ElementName::Response, ElementName::Href]) {
            self.href.push_str(text);
        } else if self.path_ends_with(&[ElementName::Propstat, ElementName::Status]) {
            self.propstat_status.push_str(text);
        }
    }
}

fn parse_multistatus_bytes_with<R, C>(reader: R, sink: C) -> Result<C>
where
    R: BufRead,
    C: ItemConsumer,
{
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(false);

    let mut buf = Vec::with_capacity(8 * 1024);
    let mut parser = MultistatusParser::new(sink);

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => parser.on_start(e.name().as_ref()),
            Ok(Event::Empty(e)) => {
                parser.on_start(e.name().as_ref());
                parser.on_end()?;
            }
            Ok(Event::Text(e)) => {
                let text = decode_text(e.as_ref())?;
                parser.on_text(&text);
            }
            Ok(Event::GeneralRef(e)) => {
                let text = resolve_reference(&e)?;
                parser.on_text(&text);
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                parser.on_text(&text);
            }
            Ok(Event::End(_)) => parser.on_end()?,
            Ok(Event::Eof) => break,
            Err(e) => return Err(anyhow!("XML error: {e}")),
            _ => {}
        }
        buf.clear();
    }

    Ok(parser.finish())
}

/// Parse a WebDAV `207 Multi-Status` XML body from an already aggregated buffer.
///
/// Only `<response>` elements with at least one `200` propstat are returned, in
/// document order, carrying the properties of their `200` propstats.
pub fn parse_multistatus_bytes(body: &[u8]) -> Result<Vec<DavResponse>> {
    let cursor = Cursor::new(body);
    parse_multistatus_bytes_with(cursor, Vec::<DavResponse>::new())
}

/// Parse an aggregated multistatus body, handing each response to a callback.
pub fn parse_multistatus_bytes_visit<F>(body: &[u8], on_item: F) -> Result<()>
where
    F: FnMut(DavResponse) -> Result<()>,
{
    let cursor = Cursor::new(body);
    parse_multistatus_bytes_with(cursor, on_item)?;
    Ok(())
}

pub fn decode_text(raw: &[u8]) -> Result<String> {
    match std::str::from_utf8(raw) {
        Ok(s) => Ok(unescape(s)
            .map_err(|err| anyhow!("XML decode error: {err}"))?
            .into_owned()),
        Err(_) => Ok(String::from_utf8_lossy(raw).into_owned()),
    }
}

pub(crate) fn resolve_reference(reference: &BytesRef<'_>) -> Result<String> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|err| anyhow!("XML character reference error: {err}"))?
    {
        return Ok(ch.to_string());
    }
    let name = String::from_utf8_lossy(reference).into_owned();
    match resolve_predefined_entity(&name) {
        Some(resolved) => Ok(resolved.to_string()),
        None => Ok(format!("&{name};")),
    }
}
