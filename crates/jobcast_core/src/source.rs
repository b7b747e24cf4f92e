use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Category;

/// Upper bound on jobs handed downstream, whatever a source allows.
pub const GLOBAL_CAP: usize = 10;

const CATEGORY_PLACEHOLDER: &str = "{category}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Company,
    Location,
    Link,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Title, Field::Company, Field::Location, Field::Link];
}

/// What to read from the node a strategy selects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Text,
    Attr(String),
}

/// One way of reading a field out of a container.
///
/// `selector == None` reads from the container node itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStrategy {
    #[serde(default)]
    pub selector: Option<String>,
    pub target: Target,
}

impl FieldStrategy {
    pub fn text(selector: impl Into<String>) -> Self {
        Self {
            selector: Some(selector.into()),
            target: Target::Text,
        }
    }

    pub fn attr(selector: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            selector: Some(selector.into()),
            target: Target::Attr(attribute.into()),
        }
    }

    pub fn own_attr(attribute: impl Into<String>) -> Self {
        Self {
            selector: None,
            target: Target::Attr(attribute.into()),
        }
    }
}

/// Everything needed to scrape one category's listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub category: Category,
    pub name: String,
    /// Listing URL; `{category}` is replaced by the category slug.
    pub endpoint: String,
    /// Base for relative job links. The fetched page URL is used when absent.
    #[serde(default)]
    pub base_url: Option<String>,
    pub container_selectors: Vec<String>,
    pub field_strategies: BTreeMap<Field, Vec<FieldStrategy>>,
    #[serde(default)]
    pub defaults: BTreeMap<Field, String>,
    #[serde(default = "default_per_source_cap")]
    pub per_source_cap: usize,
}

fn default_per_source_cap() -> usize {
    GLOBAL_CAP
}

impl SourceDescriptor {
    pub fn endpoint_url(&self) -> String {
        self.endpoint.replace(CATEGORY_PLACEHOLDER, self.category.as_str())
    }

    pub fn strategies(&self, field: Field) -> &[FieldStrategy] {
        self.field_strategies
            .get(&field)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn default_for(&self, field: Field) -> Option<&str> {
        self.defaults
            .get(&field)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Effective output cap: the source cap, never above [`GLOBAL_CAP`].
    pub fn effective_cap(&self) -> usize {
        self.per_source_cap.min(GLOBAL_CAP)
    }

    /// RemoteOK-style listing with fallbacks for job-tuple cards and plain articles.
    pub fn remote_board(category: Category) -> Self {
        let mut field_strategies = BTreeMap::new();
        field_strategies.insert(
            Field::Title,
            vec![
                FieldStrategy::text("h2"),
                FieldStrategy::text("a.title"),
                FieldStrategy::text("[itemprop=title]"),
            ],
        );
        field_strategies.insert(
            Field::Company,
            vec![
                FieldStrategy::text(".companyLink h3"),
                FieldStrategy::text("h3[itemprop=name]"),
                FieldStrategy::text(".comp-name"),
            ],
        );
        field_strategies.insert(
            Field::Location,
            vec![
                FieldStrategy::text(".location"),
                FieldStrategy::text(".locWdth"),
            ],
        );
        field_strategies.insert(
            Field::Link,
            vec![
                FieldStrategy::own_attr("data-href"),
                FieldStrategy::attr("a.preventLink", "href"),
                FieldStrategy::attr("a.title", "href"),
                FieldStrategy::attr("a[href]", "href"),
            ],
        );

        let mut defaults = BTreeMap::new();
        defaults.insert(Field::Company, "Undisclosed".to_string());
        defaults.insert(Field::Location, "Remote".to_string());

        Self {
            category,
            name: format!("remoteok-{category}"),
            endpoint: "https://remoteok.com/remote-dev+{category}-jobs".to_string(),
            base_url: Some("https://remoteok.com".to_string()),
            container_selectors: vec![
                "tr.job".to_string(),
                ".srp-jobtuple-wrapper".to_string(),
                "article.job".to_string(),
            ],
            field_strategies,
            defaults,
            per_source_cap: GLOBAL_CAP,
        }
    }
}
