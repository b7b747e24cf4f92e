use serde::{Deserialize, Serialize};

use crate::Field;

/// A container's fields as scraped, before validation. Any field may be blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCandidate {
    pub title: String,
    pub company: String,
    pub location: String,
    pub link: String,
}

impl RawCandidate {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Company => &self.company,
            Field::Location => &self.location,
            Field::Link => &self.link,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Title => self.title = value,
            Field::Company => self.company = value,
            Field::Location => self.location = value,
            Field::Link => self.link = value,
        }
    }
}

/// A validated job. `link` holds the canonical URL and is the listing's identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobListing {
    pub title: String,
    pub company: String,
    pub location: String,
    pub link: String,
}
