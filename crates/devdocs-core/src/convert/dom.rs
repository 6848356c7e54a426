use scraper::{ElementRef, Html};

/// Owned, mutable copy of a parsed HTML tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlNode {
    /// Text content, entities decoded.
    Text(String),
    /// Nested element.
    Element(HtmlElement),
}

/// Element with lowercase name, attributes in source order, and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlElement {
    /// Lowercase tag name.
    pub name: String,
    /// Attributes in source order.
    pub attrs: Vec<(String, String)>,
    /// Child nodes in source order.
    pub children: Vec<HtmlNode>,
}

impl HtmlElement {
    /// Parse a full HTML document and copy it out of the parser's arena.
    #[must_use]
    pub fn parse_document(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        lower(parsed.root_element())
    }

    /// Value of attribute `name`.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set attribute `name`, replacing an existing value.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    /// Entries of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    /// Append `class` unless already present.
    pub fn add_class(&mut self, class: &str) {
        if self.classes().any(|c| c == class) {
            return;
        }
        let joined = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_string(),
        };
        self.set_attr("class", joined);
    }

    /// Child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|child| match child {
            HtmlNode::Element(el) => Some(el),
            HtmlNode::Text(_) => None,
        })
    }

    /// Concatenated text of all descendants, whitespace untouched.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                HtmlNode::Text(t) => out.push_str(t),
                HtmlNode::Element(el) if el.name == "br" => out.push('\n'),
                HtmlNode::Element(el) => el.collect_text(out),
            }
        }
    }

    /// Visit this element and every descendant element, parents first.
    pub fn walk_mut(&mut self, f: &mut dyn FnMut(&mut Self)) {
        f(self);
        for child in &mut self.children {
            if let HtmlNode::Element(el) = child {
                el.walk_mut(f);
            }
        }
    }
}

fn lower(element: ElementRef<'_>) -> HtmlElement {
    let value = element.value();
    let children = element
        .children()
        .filter_map(|child| {
            if let Some(el) = ElementRef::wrap(child) {
                Some(HtmlNode::Element(lower(el)))
            } else {
                child
                    .value()
                    .as_text()
                    .map(|text| HtmlNode::Text(String::from(&**text)))
            }
        })
        .collect();

    HtmlElement {
        name: value.name().to_ascii_lowercase(),
        attrs: value
            .attrs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        children,
    }
}
