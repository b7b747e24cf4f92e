use std::collections::HashSet;

use crate::canonical::canonical_link;
use crate::{Field, JobListing, RawCandidate, SourceDescriptor};

/// Filter raw candidates into at most `descriptor.effective_cap()` listings.
///
/// Drops blank titles and blank/placeholder links, canonicalizes links,
/// keeps the first occurrence of each canonical link, and preserves input order.
/// Never fails; only the surviving count is observable.
pub fn validate(
    candidates: impl IntoIterator<Item = RawCandidate>,
    descriptor: &SourceDescriptor,
) -> Vec<JobListing> {
    let cap = descriptor.effective_cap();
    let mut seen = HashSet::new();
    let mut jobs = Vec::with_capacity(cap);

    for candidate in candidates {
        if jobs.len() >= cap {
            break;
        }
        let title = candidate.title.trim();
        if title.is_empty() {
            continue;
        }
        let Some(link) = canonical_link(&candidate.link) else {
            continue;
        };
        if !seen.insert(link.clone()) {
            continue;
        }
        jobs.push(JobListing {
            title: title.to_string(),
            company: or_default(candidate.company, descriptor, Field::Company),
            location: or_default(candidate.location, descriptor, Field::Location),
            link,
        });
    }

    jobs
}

fn or_default(value: String, descriptor: &SourceDescriptor, field: Field) -> String {
    if !value.trim().is_empty() {
        return value;
    }
    descriptor
        .default_for(field)
        .map(str::to_string)
        .unwrap_or(value)
}
