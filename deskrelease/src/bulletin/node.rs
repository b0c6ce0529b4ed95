//! Field values captured from bulletin XML.
//!
//! Older bulletins write component fields as plain elements
//! (`<relativePath>foo.exe</relativePath>`); newer ones decorate the same
//! elements with attributes (`<relativePath powerOn="false">foo.exe</relativePath>`).
//! Both shapes carry the value in the element text.

/// A captured element value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextNode {
    /// Element without attributes.
    Text(String),
    /// Element with attributes, in document order.
    Attributed {
        text: String,
        attributes: Vec<(String, String)>,
    },
}

impl TextNode {
    /// Build a node, choosing the variant from whether attributes are present.
    pub fn new(text: impl Into<String>, attributes: Vec<(String, String)>) -> Self {
        let text = text.into();
        if attributes.is_empty() {
            Self::Text(text)
        } else {
            Self::Attributed { text, attributes }
        }
    }

    /// Text content, whatever the shape.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Attributed { text, .. } => text,
        }
    }

    /// Attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Attributed { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
        }
    }
}

/// First candidate whose trimmed text is non-empty.
///
/// Candidates are evaluated in order, so the slice order is the priority.
pub fn first_non_empty<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_from_both_shapes() {
        let plain = TextNode::new("foo.exe", Vec::new());
        let attributed = TextNode::new(
            "foo.exe",
            vec![("powerOn".to_string(), "false".to_string())],
        );

        assert!(matches!(plain, TextNode::Text(_)));
        assert!(matches!(attributed, TextNode::Attributed { .. }));
        assert_eq!(plain.text(), "foo.exe");
        assert_eq!(attributed.text(), "foo.exe");
        assert_eq!(attributed.attribute("powerOn"), Some("false"));
        assert_eq!(plain.attribute("powerOn"), None);
    }

    #[test]
    fn test_first_non_empty_priority() {
        assert_eq!(
            first_non_empty(&[Some("Payload"), Some("comp-id"), Some("a.exe")]),
            Some("Payload")
        );
        assert_eq!(
            first_non_empty(&[None, Some("comp-id"), Some("a.exe")]),
            Some("comp-id")
        );
        assert_eq!(first_non_empty(&[Some("  "), None, Some("a.exe")]), Some("a.exe"));
        assert_eq!(first_non_empty(&[None, Some(""), None]), None);
    }
}
