use jobcast_core::{
    resolve_link, Field, FieldStrategy, RawCandidate, SourceDescriptor, Target, Url,
};
use jobcast_logging::{jobcast_debug, jobcast_info, jobcast_warn};
use scraper::{ElementRef, Html, Selector};

use crate::RawDocument;

/// A listing page parsed into a queryable tree.
///
/// Not `Send`: parse and extract on the same task, after the last await.
pub struct ParsedDocument {
    html: Html,
    base_url: Option<Url>,
}

impl ParsedDocument {
    pub fn parse(raw: &RawDocument) -> Self {
        Self {
            html: Html::parse_document(&raw.html),
            base_url: Url::parse(&raw.source_url).ok(),
        }
    }
}

/// Multi-strategy extractor:
/// - the first container selector matching at least one node wins
/// - each field takes the first non-blank value among its strategies
/// - otherwise the descriptor default, otherwise blank
/// - containers keep document order.
#[derive(Debug, Default, Clone, Copy)]
pub struct StrategyExtractor;

impl StrategyExtractor {
    /// Lazily resolve one candidate per container. Calling again on the same
    /// inputs restarts extraction and yields the same sequence.
    pub fn extract<'a>(
        &self,
        doc: &'a ParsedDocument,
        descriptor: &SourceDescriptor,
    ) -> Candidates<'a> {
        let containers = select_containers(doc, descriptor);
        let base_url = descriptor
            .base_url
            .as_deref()
            .and_then(|base| Url::parse(base).ok())
            .or_else(|| doc.base_url.clone());
        let plans = Field::ALL
            .into_iter()
            .map(|field| FieldPlan::compile(field, descriptor))
            .collect();

        Candidates {
            total: containers.len(),
            containers: containers.into_iter(),
            plans,
            base_url,
        }
    }
}

pub struct Candidates<'a> {
    total: usize,
    containers: std::vec::IntoIter<ElementRef<'a>>,
    plans: Vec<FieldPlan>,
    base_url: Option<Url>,
}

impl Candidates<'_> {
    /// Containers matched by the winning selector; zero means markup drift.
    pub fn container_count(&self) -> usize {
        self.total
    }
}

impl Iterator for Candidates<'_> {
    type Item = RawCandidate;

    fn next(&mut self) -> Option<Self::Item> {
        let container = self.containers.next()?;
        let mut candidate = RawCandidate::default();
        for plan in &self.plans {
            let mut value = plan.resolve(container);
            if plan.field == Field::Link && !value.is_empty() {
                if let Some(url) = resolve_link(&value, self.base_url.as_ref()) {
                    value = url.into();
                }
            }
            candidate.set(plan.field, value);
        }
        Some(candidate)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.containers.size_hint()
    }
}

fn select_containers<'a>(
    doc: &'a ParsedDocument,
    descriptor: &SourceDescriptor,
) -> Vec<ElementRef<'a>> {
    for (index, raw) in descriptor.container_selectors.iter().enumerate() {
        let Some(selector) = compile(raw, &descriptor.name) else {
            continue;
        };
        let nodes: Vec<_> = doc.html.select(&selector).collect();
        if nodes.is_empty() {
            continue;
        }
        if index > 0 {
            jobcast_info!(
                "source={} primary container selector missed, falling back to {:?}",
                descriptor.name,
                raw
            );
        }
        jobcast_debug!("source={} selector={:?} containers={}", descriptor.name, raw, nodes.len());
        return nodes;
    }
    Vec::new()
}

fn compile(raw: &str, source: &str) -> Option<Selector> {
    match Selector::parse(raw) {
        Ok(selector) => Some(selector),
        Err(err) => {
            jobcast_warn!("source={} skipping invalid selector {:?}: {}", source, raw, err);
            None
        }
    }
}

struct CompiledStrategy {
    /// `None` reads from the container itself.
    selector: Option<Selector>,
    target: Target,
}

impl CompiledStrategy {
    fn compile(strategy: &FieldStrategy, source: &str) -> Option<Self> {
        let selector = match strategy.selector.as_deref() {
            Some(raw) => Some(compile(raw, source)?),
            None => None,
        };
        Some(Self {
            selector,
            target: strategy.target.clone(),
        })
    }

    fn read(&self, container: ElementRef<'_>) -> Option<String> {
        let node = match &self.selector {
            Some(selector) => container.select(selector).next()?,
            None => container,
        };
        let value = match &self.target {
            Target::Text => collapse_whitespace(&node.text().collect::<String>()),
            Target::Attr(name) => node.value().attr(name)?.trim().to_string(),
        };
        (!value.is_empty()).then_some(value)
    }
}

struct FieldPlan {
    field: Field,
    strategies: Vec<CompiledStrategy>,
    default: Option<String>,
}

impl FieldPlan {
    fn compile(field: Field, descriptor: &SourceDescriptor) -> Self {
        Self {
            field,
            strategies: descriptor
                .strategies(field)
                .iter()
                .filter_map(|strategy| CompiledStrategy::compile(strategy, &descriptor.name))
                .collect(),
            default: descriptor.default_for(field).map(str::to_string),
        }
    }

    fn resolve(&self, container: ElementRef<'_>) -> String {
        self.strategies
            .iter()
            .find_map(|strategy| strategy.read(container))
            .or_else(|| self.default.clone())
            .unwrap_or_default()
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
