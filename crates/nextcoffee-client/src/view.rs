//! Render-ready view models for the listing and detail pages.

use std::fmt;

use nextcoffee_core::{format_distance, StoreRecord};

pub const DEFAULT_IMAGE_URL: &str = "https://images.unsplash.com/photo-1504753793650-d4a2b783c15e?ixid=MnwxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8&ixlib=rb-1.2.1&auto=format&fit=crop&w=2000&q=80";
pub const BANNER_LABEL: &str = "Find My Café";
pub const BANNER_BUSY_LABEL: &str = "Locating…";
pub const NEARBY_SECTION_TITLE: &str = "Coffee shops near me";
pub const ERROR_PREFIX: &str = "Oops! Something went wrong: ";
pub const DETAIL_ERROR_MESSAGE: &str = "Something went wrong retrieving coffee shop page";

fn image_or_default(img_url: &str) -> String {
    if img_url.is_empty() {
        DEFAULT_IMAGE_URL.to_owned()
    } else {
        img_url.to_owned()
    }
}

#[must_use]
pub fn coffee_store_href(id: &str) -> String {
    format!("/coffee-store/{id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub name: String,
    pub neighbourhood: String,
    pub img_url: String,
    pub distance: String,
    pub href: String,
}

impl From<&StoreRecord> for Card {
    fn from(store: &StoreRecord) -> Self {
        Self {
            name: store.name.clone(),
            neighbourhood: store.neighbourhood.clone(),
            img_url: image_or_default(&store.img_url),
            distance: format_distance(store.distance),
            href: coffee_store_href(&store.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSection {
    pub title: String,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingView {
    pub banner_label: String,
    /// Empty, or the prefixed location error.
    pub location_error: String,
    /// Empty, or the prefixed store fetch error.
    pub store_error: String,
    /// Nearby stores first, then the fixed city; empty groups are omitted.
    pub sections: Vec<CardSection>,
}

impl ListingView {
    #[must_use]
    pub fn build(
        finding_location: bool,
        location_error: &str,
        store_error: &str,
        nearby: &[StoreRecord],
        city: &str,
        city_stores: &[StoreRecord],
    ) -> Self {
        let banner_label = if finding_location {
            BANNER_BUSY_LABEL
        } else {
            BANNER_LABEL
        };

        let sections = [(NEARBY_SECTION_TITLE, nearby), (city, city_stores)]
            .into_iter()
            .filter(|(_, stores)| !stores.is_empty())
            .map(|(title, stores)| CardSection {
                title: title.to_owned(),
                cards: stores.iter().map(Card::from).collect(),
            })
            .collect();

        Self {
            banner_label: banner_label.to_owned(),
            location_error: prefixed(location_error),
            store_error: prefixed(store_error),
            sections,
        }
    }
}

fn prefixed(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!("{ERROR_PREFIX}{message}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailView {
    pub name: String,
    pub address: String,
    pub neighbourhood: String,
    pub img_url: String,
    pub distance: String,
    pub voting: i64,
    /// When set, the page shows only this message.
    pub error: String,
}

impl DetailView {
    /// `record` is `None` while unresolved or when the id is unknown; every
    /// field is then empty.
    #[must_use]
    pub fn build(record: Option<&StoreRecord>, voting: i64, error: &str) -> Self {
        let Some(store) = record else {
            return Self {
                error: error.to_owned(),
                ..Self::default()
            };
        };
        Self {
            name: store.name.clone(),
            address: store.address.clone(),
            neighbourhood: store.neighbourhood.clone(),
            img_url: image_or_default(&store.img_url),
            distance: format_distance(store.distance),
            voting,
            error: error.to_owned(),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.neighbourhood.is_empty() {
            write!(f, " ({})", self.neighbourhood)?;
        }
        write!(f, "  {}  {}", self.distance, self.href)
    }
}

impl fmt::Display for ListingView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[ {} ]", self.banner_label)?;
        for error in [&self.location_error, &self.store_error] {
            if !error.is_empty() {
                writeln!(f, "{error}")?;
            }
        }
        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "{}", section.title)?;
            for card in &section.cards {
                writeln!(f, "  {card}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for DetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.error.is_empty() {
            return writeln!(f, "{}", self.error);
        }
        writeln!(f, "← Go back (/)")?;
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", self.neighbourhood)?;
        writeln!(f, "{}", self.address)?;
        writeln!(f, "{}", self.distance)?;
        writeln!(f, "votes: {}", self.voting)?;
        writeln!(f, "image: {}", self.img_url)
    }
}
