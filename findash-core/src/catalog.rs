// findash-core/src/catalog.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Widget id must not be empty")]
    EmptyId,
    #[error("Duplicate widget id: {0}")]
    DuplicateId(String),
    #[error("Widget '{0}' has no available sizes")]
    NoSizes(String),
    #[error("Widget '{id}' lists size {size} more than once")]
    DuplicateSize { id: String, size: SizeToken },
    #[error("Widget '{id}' default size {size} is not one of its available sizes")]
    DefaultSizeUnavailable { id: String, size: SizeToken },
}

/// Opaque footprint token such as `1x1` or `2x1`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeToken(String);

impl SizeToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Grid footprint as `(columns, rows)` for tokens shaped like `2x1`.
    ///
    /// Validity of a token never depends on this; hosts use it for placement only.
    pub fn dimensions(&self) -> Option<(u16, u16)> {
        let (cols, rows) = self.0.split_once('x')?;
        match (cols.parse().ok()?, rows.parse().ok()?) {
            (0, _) | (_, 0) => None,
            dims => Some(dims),
        }
    }
}

impl fmt::Display for SizeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SizeToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for SizeToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl PartialEq<&str> for SizeToken {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Built-in widget definition, the schema for one dashboard panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetDefinition {
    pub id: String,
    pub title: String,
    pub default_enabled: bool,
    pub default_size: SizeToken,
    /// Ordered; resizing steps through this list cyclically
    pub available_sizes: Vec<SizeToken>,
}

impl WidgetDefinition {
    /// Create a definition that is enabled by default and only offers `default_size`
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        default_size: impl Into<SizeToken>,
    ) -> Self {
        let default_size = default_size.into();
        Self {
            id: id.into(),
            title: title.into(),
            default_enabled: true,
            available_sizes: vec![default_size.clone()],
            default_size,
        }
    }

    /// Replace the available sizes (order is the resize cycle)
    pub fn with_sizes<I, S>(mut self, sizes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SizeToken>,
    {
        self.available_sizes = sizes.into_iter().map(Into::into).collect();
        self
    }

    pub fn disabled_by_default(mut self) -> Self {
        self.default_enabled = false;
        self
    }

    pub fn allows(&self, size: &SizeToken) -> bool {
        self.available_sizes.contains(size)
    }

    /// Size that follows `current` in the resize cycle.
    ///
    /// An unknown `current` steps back onto the default size.
    pub fn next_size(&self, current: &SizeToken) -> &SizeToken {
        match self.available_sizes.iter().position(|s| s == current) {
            Some(i) => &self.available_sizes[(i + 1) % self.available_sizes.len()],
            None => &self.default_size,
        }
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.id.is_empty() {
            return Err(CatalogError::EmptyId);
        }
        if self.available_sizes.is_empty() {
            return Err(CatalogError::NoSizes(self.id.clone()));
        }
        for (i, size) in self.available_sizes.iter().enumerate() {
            if self.available_sizes[..i].contains(size) {
                return Err(CatalogError::DuplicateSize {
                    id: self.id.clone(),
                    size: size.clone(),
                });
            }
        }
        if !self.allows(&self.default_size) {
            return Err(CatalogError::DefaultSizeUnavailable {
                id: self.id.clone(),
                size: self.default_size.clone(),
            });
        }
        Ok(())
    }
}

/// Immutable, ordered list of widget definitions
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    definitions: Vec<WidgetDefinition>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(definitions: Vec<WidgetDefinition>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(definitions.len());

        for (i, definition) in definitions.iter().enumerate() {
            definition.validate()?;
            if index.insert(definition.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId(definition.id.clone()));
            }
        }

        Ok(Self { definitions, index })
    }

    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn get(&self, id: &str) -> Option<&WidgetDefinition> {
        self.index.get(id).map(|&i| &self.definitions[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WidgetDefinition> {
        self.definitions.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a WidgetDefinition;
    type IntoIter = std::slice::Iter<'a, WidgetDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Collects definitions in registration order; validation happens in `build`
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    definitions: Vec<WidgetDefinition>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: WidgetDefinition) -> &mut Self {
        self.definitions.push(definition);
        self
    }

    pub fn build(self) -> Result<Catalog, CatalogError> {
        Catalog::new(self.definitions)
    }
}

/// Register a widget definition: id, title, default size, then the resize cycle.
/// Append `disabled` to hide the widget until the user enables it.
#[macro_export]
macro_rules! register_widget {
    ($builder:expr, $id:expr, $title:expr, $default:expr, [$($size:expr),+ $(,)?]) => {
        $builder.register(
            $crate::WidgetDefinition::new($id, $title, $default).with_sizes([$($size),+]),
        )
    };
    ($builder:expr, $id:expr, $title:expr, $default:expr, [$($size:expr),+ $(,)?], disabled) => {
        $builder.register(
            $crate::WidgetDefinition::new($id, $title, $default)
                .with_sizes([$($size),+])
                .disabled_by_default(),
        )
    };
}
