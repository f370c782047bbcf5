/// One piece of a text run: literal characters or a `{{ name }}` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(String),
}

/// Text content or attribute value, split into segments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextDescriptor {
    pub segments: Vec<Segment>,
}

impl TextDescriptor {
    pub fn literal(s: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::Literal(s.into())],
        }
    }

    pub fn has_placeholders(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Placeholder(_)))
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Concatenates the segments, asking `lookup` for each placeholder value.
    /// Names `lookup` cannot resolve render as the empty string.
    pub fn render<'a, F>(&self, mut lookup: F) -> String
    where
        F: FnMut(&str) -> Option<&'a str>,
    {
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Literal(s) => out.push_str(s),
                Segment::Placeholder(name) => out.push_str(lookup(name).unwrap_or("")),
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrDescriptor {
    pub name: String,
    pub value: TextDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    Element {
        tag: String,
        attrs: Vec<AttrDescriptor>,
        children: Vec<Descriptor>,
    },
    Text(TextDescriptor),
}

impl Descriptor {
    /// Visits every placeholder name in document order: attributes before
    /// children, repeats included.
    pub fn for_each_placeholder<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            Descriptor::Text(t) => t.placeholders().for_each(|n| f(n)),
            Descriptor::Element {
                attrs, children, ..
            } => {
                for a in attrs {
                    a.value.placeholders().for_each(|n| f(n));
                }
                for c in children {
                    c.for_each_placeholder(f);
                }
            }
        }
    }
}
