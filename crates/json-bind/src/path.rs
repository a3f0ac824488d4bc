//! Property paths for binding diagnostics, rendered as RFC 6901 JSON
//! Pointers.

/// One step into the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    Key(String),
    Index(usize),
}

/// Escapes one JSON Pointer token component.
fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Path from the document root to the property being bound. Extended
/// as nested builds descend so every error names its full location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropPath {
    steps: Vec<PathStep>,
}

impl PropPath {
    pub fn root() -> Self {
        PropPath::default()
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn key(&self, name: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.steps.push(PathStep::Key(name.into()));
        next
    }

    pub fn index(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.steps.push(PathStep::Index(index));
        next
    }

    /// RFC 6901 rendering; the root is the empty pointer.
    pub fn pointer(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            out.push('/');
            match step {
                PathStep::Key(k) => out.push_str(&escape_component(k)),
                PathStep::Index(i) => out.push_str(&i.to_string()),
            }
        }
        out
    }
}

impl std::fmt::Display for PropPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            // keep root errors readable
            f.write_str("<root>")
        } else {
            f.write_str(&self.pointer())
        }
    }
}
