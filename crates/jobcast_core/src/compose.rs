use std::fmt;

use crate::{Category, JobListing};

/// Body budget in UTF-16 code units, the unit the messaging channel counts in.
/// Emoji outside the basic plane take two units each.
pub const DEFAULT_MESSAGE_LIMIT: usize = 1600;
pub const DEFAULT_FOOTER: &str = "Powered by JobCast";

/// An outbound alert: header, whole job entries, footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: String,
    pub entries: Vec<String>,
    pub footer: String,
}

impl Message {
    /// Length of the rendered text in UTF-16 code units.
    pub fn utf16_len(&self) -> usize {
        utf16_len(&self.header)
            + self.entries.iter().map(|e| utf16_len(e)).sum::<usize>()
            + utf16_len(&self.footer)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header)?;
        for entry in &self.entries {
            f.write_str(entry)?;
        }
        f.write_str(&self.footer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageComposer {
    pub limit: usize,
    pub footer: String,
}

impl Default for MessageComposer {
    fn default() -> Self {
        Self {
            limit: DEFAULT_MESSAGE_LIMIT,
            footer: DEFAULT_FOOTER.to_string(),
        }
    }
}

impl MessageComposer {
    pub fn new(limit: usize, footer: impl Into<String>) -> Self {
        Self {
            limit,
            footer: footer.into(),
        }
    }

    /// Render the header and as many leading jobs as fit under `self.limit`.
    pub fn compose(
        &self,
        recipient_name: &str,
        category: Category,
        jobs: &[JobListing],
    ) -> Message {
        let header = render_header(recipient_name, category);
        let entries = jobs
            .iter()
            .enumerate()
            .map(|(index, job)| render_entry(index + 1, job));
        pack_entries(header, entries, self.footer.clone(), self.limit)
    }
}

pub fn render_header(recipient_name: &str, category: Category) -> String {
    let name = recipient_name.trim();
    let name = if name.is_empty() { "there" } else { name };
    format!(
        "👋 Hi {name},\nHere are *{category}* jobs for you:\n\n",
        category = category.as_str().to_ascii_uppercase()
    )
}

pub fn render_entry(position: usize, job: &JobListing) -> String {
    format!(
        "*{position}. {title}*\n🏢 {company}\n📍 {location}\n🔗 {link}\n\n",
        title = job.title.trim(),
        company = job.company,
        location = job.location,
        link = job.link,
    )
}

/// Greedy, strictly in-order packing.
///
/// An entry is accepted only if header + accepted entries + the entry + footer
/// stays within `limit` UTF-16 code units. The first entry that does not fit ends packing; later
/// entries are never considered. Header and footer are always present, even
/// when they alone exceed `limit`.
pub fn pack_entries(
    header: String,
    entries: impl IntoIterator<Item = String>,
    footer: String,
    limit: usize,
) -> Message {
    let footer_len = utf16_len(&footer);
    let mut used = utf16_len(&header);
    let mut accepted = Vec::new();

    for entry in entries {
        let entry_len = utf16_len(&entry);
        if used + entry_len + footer_len > limit {
            break;
        }
        used += entry_len;
        accepted.push(entry);
    }

    Message {
        header,
        entries: accepted,
        footer,
    }
}

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}
