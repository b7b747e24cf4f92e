use std::collections::BTreeMap;

use crate::{Category, SourceDescriptor, UnknownCategory};

/// Immutable category -> source mapping, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRegistry {
    sources: BTreeMap<Category, SourceDescriptor>,
}

impl SourceRegistry {
    pub fn builtin() -> Self {
        Self::from_descriptors(Category::ALL.into_iter().map(SourceDescriptor::remote_board))
    }

    /// A later descriptor for the same category replaces an earlier one.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = SourceDescriptor>) -> Self {
        let sources = descriptors
            .into_iter()
            .map(|descriptor| (descriptor.category, descriptor))
            .collect();
        Self { sources }
    }

    /// Built-ins with `overrides` replacing the descriptors of their categories.
    pub fn with_overrides(overrides: impl IntoIterator<Item = SourceDescriptor>) -> Self {
        let mut registry = Self::builtin();
        for descriptor in overrides {
            registry.sources.insert(descriptor.category, descriptor);
        }
        registry
    }

    pub fn resolve(&self, token: &str) -> Result<&SourceDescriptor, UnknownCategory> {
        let category: Category = token.parse()?;
        self.get(category).ok_or_else(|| UnknownCategory::new(token))
    }

    pub fn get(&self, category: Category) -> Option<&SourceDescriptor> {
        self.sources.get(&category)
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.sources.keys().copied()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &SourceDescriptor> + '_ {
        self.sources.values()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
