use super::dom::HtmlElement;
use crate::Result;

/// A rewrite applied to the HTML tree before it is rendered as Markdown.
pub trait HtmlPreprocessor: Send + Sync {
    /// Rewrite `root` in place.
    fn preprocess(&self, root: &mut HtmlElement) -> Result<()>;
}

impl<F> HtmlPreprocessor for F
where
    F: Fn(&mut HtmlElement) -> Result<()> + Send + Sync,
{
    fn preprocess(&self, root: &mut HtmlElement) -> Result<()> {
        self(root)
    }
}

/// Renames `data-language` values to the names syntax highlighters know.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeCodeLanguages;

impl HtmlPreprocessor for NormalizeCodeLanguages {
    fn preprocess(&self, root: &mut HtmlElement) -> Result<()> {
        root.walk_mut(&mut |el| {
            if el.attr("data-language") == Some("go") {
                el.set_attr("data-language", "golang");
            }
        });
        Ok(())
    }
}

/// Adds a `language-<lang>` class to every element with `data-language`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddLanguageClasses;

impl HtmlPreprocessor for AddLanguageClasses {
    fn preprocess(&self, root: &mut HtmlElement) -> Result<()> {
        root.walk_mut(&mut |el| {
            if let Some(lang) = el.attr("data-language").map(str::to_string) {
                el.add_class(&format!("language-{lang}"));
            }
        });
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pre(lang: &str) -> HtmlElement {
        HtmlElement {
            name: "pre".into(),
            attrs: vec![("data-language".into(), lang.into())],
            children: Vec::new(),
        }
    }

    #[test]
    fn test_go_is_renamed() {
        let mut el = pre("go");
        NormalizeCodeLanguages.preprocess(&mut el).unwrap();
        assert_eq!(el.attr("data-language"), Some("golang"));

        let mut other = pre("rust");
        NormalizeCodeLanguages.preprocess(&mut other).unwrap();
        assert_eq!(other.attr("data-language"), Some("rust"));
    }

    #[test]
    fn test_language_class_follows_normalisation() {
        let mut el = pre("go");
        NormalizeCodeLanguages.preprocess(&mut el).unwrap();
        AddLanguageClasses.preprocess(&mut el).unwrap();
        assert_eq!(el.attr("class"), Some("language-golang"));
    }

    #[test]
    fn test_closures_are_preprocessors() {
        let strip = |root: &mut HtmlElement| {
            root.attrs.clear();
            Ok::<(), crate::Error>(())
        };
        let mut el = pre("js");
        strip.preprocess(&mut el).unwrap();
        assert!(el.attrs.is_empty());
    }
}
