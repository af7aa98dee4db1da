use std::fmt;

/// Voice annotation for speech output. Braille ignores these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceId {
    Default,
    System,
    Hyperlink,
    Uppercase,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text(String),
    Voice(VoiceId),
    Nested(ElementList),
}

/// Ordered output of one generation call, owned by the caller.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementList(Vec<Element>);

impl ElementList {
    pub fn new() -> Self {
        ElementList(Vec::new())
    }

    /// A list holding a single text element.
    pub fn text(text: impl Into<String>) -> Self {
        ElementList(vec![Element::Text(text.into())])
    }

    pub fn from_texts<S: AsRef<str>>(texts: &[S]) -> Self {
        texts
            .iter()
            .map(|t| Element::Text(t.as_ref().to_string()))
            .collect()
    }

    pub fn push(&mut self, element: Element) {
        self.0.push(element);
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.0.push(Element::Text(text.into()));
    }

    pub fn push_voice(&mut self, voice: VoiceId) {
        self.0.push(Element::Voice(voice));
    }

    /// Append `other` as one nested element. Empty lists are dropped.
    pub fn push_nested(&mut self, other: ElementList) {
        if !other.is_empty() {
            self.0.push(Element::Nested(other));
        }
    }

    pub fn extend(&mut self, other: ElementList) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Element> {
        self.0
    }

    /// Depth-first expansion of nested lists.
    pub fn flatten(&self) -> Vec<Element> {
        let mut out = Vec::with_capacity(self.0.len());
        flatten_into(&self.0, &mut out);
        out
    }

    /// The text fragments in output order, nested lists expanded.
    pub fn texts(&self) -> Vec<String> {
        self.flatten()
            .into_iter()
            .filter_map(|e| match e {
                Element::Text(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    pub fn join(&self, separator: &str) -> String {
        self.texts().join(separator)
    }
}

fn flatten_into(elements: &[Element], out: &mut Vec<Element>) {
    for element in elements {
        match element {
            Element::Nested(inner) => flatten_into(&inner.0, out),
            other => out.push(other.clone()),
        }
    }
}

impl From<Vec<Element>> for ElementList {
    fn from(elements: Vec<Element>) -> Self {
        ElementList(elements)
    }
}

impl FromIterator<Element> for ElementList {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        ElementList(iter.into_iter().collect())
    }
}

impl IntoIterator for ElementList {
    type Item = Element;
    type IntoIter = std::vec::IntoIter<Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ElementList {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ElementList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_keeps_order() {
        let mut inner = ElementList::text("b");
        inner.push_voice(VoiceId::System);
        let mut list = ElementList::text("a");
        list.push_nested(inner);
        list.push_nested(ElementList::new());
        list.push_text("c");
        assert_eq!(list.len(), 3);
        assert_eq!(list.texts(), vec!["a", "b", "c"]);
        assert_eq!(list.flatten().len(), 4);
        assert_eq!(list.to_string(), "a b c");
    }
}
