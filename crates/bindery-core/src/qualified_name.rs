use std::fmt;

/// Qualified name for a symbol in the host object model.
///
/// Paths are dot-separated, package style: `analysis.Vector3` has simple
/// name `Vector3` inside the `analysis` namespace.
///
/// # Examples
///
/// ```
/// use bindery_core::QualifiedName;
///
/// let v = QualifiedName::from_dotted("analysis.Vector3");
/// assert_eq!(v.simple_name(), "Vector3");
/// assert_eq!(v.to_string(), "analysis.Vector3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Simple name (e.g. `Vector3`, `normalize`).
    pub name: String,
    /// Namespace path; empty for the package root.
    pub namespace: Vec<String>,
}

impl QualifiedName {
    /// Create a new qualified name with a namespace path.
    pub fn new(name: impl Into<String>, namespace: Vec<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
        }
    }

    /// Create a qualified name at the package root.
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Vec::new(),
        }
    }

    /// Parse a dotted path: the last segment is the name, the rest is the
    /// namespace. Empty segments are dropped.
    pub fn from_dotted(s: &str) -> Self {
        let parts: Vec<&str> = s.split('.').filter(|p| !p.is_empty()).collect();
        match parts.split_last() {
            None => Self::global(""),
            Some((name, namespace)) => Self {
                name: name.to_string(),
                namespace: namespace.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    /// Check if this name lives at the package root.
    pub fn is_global(&self) -> bool {
        self.namespace.is_empty()
    }

    /// Get the simple (unqualified) name.
    pub fn simple_name(&self) -> &str {
        &self.name
    }

    /// Get the namespace path.
    pub fn namespace_path(&self) -> &[String] {
        &self.namespace
    }

    /// Create a child name within this name's namespace.
    ///
    /// Example: `analysis.model` + `Vector3` = `analysis.model.Vector3`
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut ns = self.namespace.clone();
        ns.push(self.name.clone());
        Self {
            name: name.into(),
            namespace: ns,
        }
    }

    /// Get the parent namespace as a qualified name, if any.
    pub fn parent(&self) -> Option<Self> {
        let (name, namespace) = self.namespace.split_last()?;
        Some(Self {
            name: name.clone(),
            namespace: namespace.to_vec(),
        })
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace.join("."), self.name)
        }
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        Self::from_dotted(s)
    }
}
