use mold_dom::is_void_element;

/// Parser knobs. The defaults keep every character of the source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Skip text runs made only of whitespace (indentation between tags).
    pub drop_whitespace_text: bool,
    /// Extra tag names treated like `img`/`input`: no children, no close tag.
    pub extra_void_elements: Vec<String>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drop_whitespace_text(mut self, yes: bool) -> Self {
        self.drop_whitespace_text = yes;
        self
    }

    pub fn void_element(mut self, tag: impl Into<String>) -> Self {
        self.extra_void_elements.push(tag.into().to_ascii_uppercase());
        self
    }

    pub fn is_void(&self, tag: &str) -> bool {
        is_void_element(tag)
            || self
                .extra_void_elements
                .iter()
                .any(|t| t.eq_ignore_ascii_case(tag))
    }
}
