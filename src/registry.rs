//! Catalog of named resizers

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::error::{BenchError, Result};
use crate::processing::{fir, imageops, resize_rs, ResizeStrategy};

/// One registered resizer: a strategy plus what to call it
pub struct ResizerDescriptor {
    name: String,
    library: String,
    url: String,
    filter: String,
    strategy: Box<dyn ResizeStrategy>,
}

impl ResizerDescriptor {
    pub fn new(
        name: impl Into<String>,
        library: impl Into<String>,
        url: impl Into<String>,
        filter: impl Into<String>,
        strategy: impl ResizeStrategy + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            library: library.into(),
            url: url.into(),
            filter: filter.into(),
            strategy: Box::new(strategy),
        }
    }

    /// Unique `<library>__<filter>` name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn library(&self) -> &str {
        &self.library
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn strategy(&self) -> &dyn ResizeStrategy {
        self.strategy.as_ref()
    }
}

impl fmt::Debug for ResizerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizerDescriptor")
            .field("name", &self.name)
            .field("library", &self.library)
            .field("url", &self.url)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

/// Resizers sharing a library, in registration order
#[derive(Debug)]
pub struct LibraryGroup<'r> {
    pub library: &'r str,
    pub url: &'r str,
    pub resizers: Vec<&'r ResizerDescriptor>,
}

/// Ordered resizer catalog.
///
/// Built once at startup and read-only afterwards. Names are unique;
/// registering a name twice is an error.
#[derive(Debug, Default)]
pub struct ResizerRegistry {
    resizers: Vec<ResizerDescriptor>,
    names: HashSet<String>,
}

impl ResizerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in adapter, grouped by library
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        imageops::register(&mut registry)?;
        resize_rs::register(&mut registry)?;
        fir::register(&mut registry)?;

        debug!("Registered {} resizers", registry.len());
        Ok(registry)
    }

    /// Append descriptors in order.
    ///
    /// Fails on the first duplicate name; descriptors before it stay
    /// registered.
    pub fn register<I>(&mut self, descriptors: I) -> Result<()>
    where
        I: IntoIterator<Item = ResizerDescriptor>,
    {
        for descriptor in descriptors {
            if !self.names.insert(descriptor.name.clone()) {
                return Err(BenchError::DuplicateResizer {
                    name: descriptor.name,
                });
            }
            self.resizers.push(descriptor);
        }
        Ok(())
    }

    /// Exact, case-sensitive lookup
    pub fn find_by_name(&self, name: &str) -> Option<&ResizerDescriptor> {
        self.resizers.iter().find(|r| r.name == name)
    }

    /// Every resizer in registration order
    pub fn list_all(&self) -> &[ResizerDescriptor] {
        &self.resizers
    }

    /// Consecutive runs of the same library.
    ///
    /// Registration order is kept as is; a library registered in two
    /// separate runs shows up twice.
    pub fn groups(&self) -> Vec<LibraryGroup<'_>> {
        let mut groups: Vec<LibraryGroup<'_>> = Vec::new();

        for resizer in &self.resizers {
            match groups.last_mut() {
                Some(group) if group.library == resizer.library => group.resizers.push(resizer),
                _ => groups.push(LibraryGroup {
                    library: &resizer.library,
                    url: &resizer.url,
                    resizers: vec![resizer],
                }),
            }
        }

        groups
    }

    /// Resolve names in the given order, stopping at the first unknown one
    pub fn resolve_subset<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&ResizerDescriptor>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.find_by_name(name)
                    .ok_or_else(|| BenchError::unknown_resizer(name))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.resizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resizers.is_empty()
    }
}
