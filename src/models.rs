/// One entry element of the source document, reduced to its direct children.
///
/// Children are kept in document order as `(tag, text)` pairs. Only the first
/// child with a given tag is visible through [`RawEntry::child_value`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    children: Vec<(String, String)>,
}

impl RawEntry {
    /// Builds an entry from `(tag, text)` pairs.
    pub fn from_children<I, K, V>(children: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            children: children
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub(crate) fn push_child(&mut self, tag: String, text: String) {
        self.children.push((tag, text));
    }

    /// Returns the text of the first direct child named `tag`.
    pub fn child_value(&self, tag: &str) -> Option<&str> {
        self.children
            .iter()
            .find(|(name, _)| name == tag)
            .map(|(_, text)| text.as_str())
    }
}

/// A country record produced by the converter.
///
/// `sort_order` is only set for countries matched by an override rule. It is a
/// transient sort key and is not part of the exported document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub name: String,
    pub code: String,
    pub sort_order: Option<usize>,
}

impl Country {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            sort_order: None,
        }
    }

    /// Compares codes ignoring ASCII case.
    pub fn has_code(&self, code: &str) -> bool {
        self.code.eq_ignore_ascii_case(code)
    }
}

/// A configured priority entry: countries with `code` move to the front and are
/// renamed to `display_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideRule {
    pub code: String,
    pub display_name: String,
}

impl OverrideRule {
    pub fn new(code: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display_name: display_name.into(),
        }
    }
}
