use std::collections::HashMap;

/// WebDAV Depth
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Depth {
    Zero,
    One,
    Infinity,
}
impl Depth {
    pub fn as_str(self) -> &'static str {
        match self {
            Depth::Zero => "0",
            Depth::One => "1",
            Depth::Infinity => "infinity",
        }
    }
}

/// One property taken from a `200` propstat.
///
/// `text` holds the direct character data; `children` holds nested elements
/// in document order as `(local-name, text)` pairs, e.g. the `<d:collection/>`
/// inside `<d:resourcetype>` or every `<oc:tag>` inside `<oc:tags>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DavProp {
    pub text: String,
    pub children: Vec<(String, String)>,
}

impl DavProp {
    pub fn has_child(&self, name: &str) -> bool {
        self.children.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    pub fn child_texts<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.children
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, t)| t.as_str())
    }
}

/// Properties keyed by lowercase local name.
pub type PropMap = HashMap<String, DavProp>;

/// A `<response>` that carried at least one successful propstat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DavResponse {
    /// Raw, still percent-encoded `href`.
    pub href: String,
    pub props: PropMap,
}

impl DavResponse {
    pub fn prop(&self, name: &str) -> Option<&DavProp> {
        self.props.get(name)
    }

    /// Trimmed text of a property, empty when absent.
    pub fn text(&self, name: &str) -> &str {
        self.props.get(name).map(|p| p.text.trim()).unwrap_or("")
    }

    pub fn int(&self, name: &str) -> i64 {
        self.text(name).parse().unwrap_or(0)
    }

    /// `1`/`true` are true, everything else false.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.text(name), "1" | "true" | "TRUE" | "True")
    }

    pub fn has(&self, name: &str) -> bool {
        self.props.contains_key(name)
    }
}
