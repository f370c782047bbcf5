use std::collections::HashMap;

/// A value supplied for one placeholder in an update.
///
/// A name missing from [`Bindings`] is "not provided" and keeps whatever the
/// template last saw for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    Value(String),
    /// Resets the placeholder to the empty string.
    Cleared,
}

impl Binding {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Binding::Value(v) => Some(v),
            Binding::Cleared => None,
        }
    }
}

impl From<Option<String>> for Binding {
    fn from(v: Option<String>) -> Self {
        match v {
            Some(s) => Binding::Value(s),
            None => Binding::Cleared,
        }
    }
}

impl From<Option<&str>> for Binding {
    fn from(v: Option<&str>) -> Self {
        v.map(str::to_string).into()
    }
}

impl From<&str> for Binding {
    fn from(v: &str) -> Self {
        Binding::Value(v.to_string())
    }
}

impl From<String> for Binding {
    fn from(v: String) -> Self {
        Binding::Value(v)
    }
}

/// Name -> value map passed to `Template::update`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bindings {
    entries: HashMap<String, Binding>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries
            .insert(name.into(), Binding::Value(value.into()));
        self
    }

    pub fn clear(mut self, name: impl Into<String>) -> Self {
        self.entries.insert(name.into(), Binding::Cleared);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, binding: impl Into<Binding>) {
        self.entries.insert(name.into(), binding.into());
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// Allow concise bindings creation
impl<K, V> FromIterator<(K, V)> for Bindings
where
    K: Into<String>,
    V: Into<Binding>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut b = Bindings::new();
        for (k, v) in iter {
            b.insert(k, v);
        }
        b
    }
}

impl From<Vec<(&str, &str)>> for Bindings {
    fn from(v: Vec<(&str, &str)>) -> Self {
        v.into_iter().collect()
    }
}

impl From<Vec<(&str, Option<&str>)>> for Bindings {
    fn from(v: Vec<(&str, Option<&str>)>) -> Self {
        v.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_and_tri_state() {
        let b = Bindings::new().set("name", "Rob").clear("title");
        assert_eq!(b.get("name"), Some(&Binding::Value("Rob".into())));
        assert_eq!(b.get("title"), Some(&Binding::Cleared));
        assert_eq!(b.get("other"), None);
    }

    #[test]
    fn from_optional_pairs() {
        let b: Bindings = vec![("a", Some("1")), ("b", None)].into();
        assert_eq!(b.get("a").and_then(Binding::as_str), Some("1"));
        assert_eq!(b.get("b"), Some(&Binding::Cleared));
        assert_eq!(b.len(), 2);
    }
}
