//! Locale-aware string comparison and matching.
//!
//! Everything in the pipeline that orders or matches user-facing strings goes
//! through [`Collator`], so the locale rules are chosen once in configuration.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Content language of the directory
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    De,
    En,
}

impl Locale {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "de" | "de-de" | "de_de" | "german" => Some(Self::De),
            "en" | "en-us" | "en-gb" | "en_us" | "english" => Some(Self::En),
            _ => None,
        }
    }
}

/// Comparison and matching rules for display strings
pub trait Collator: Send + Sync {
    /// Dictionary ordering: letters first, then accents, then case
    fn compare(&self, a: &str, b: &str) -> Ordering;

    /// Case-insensitive substring test
    fn contains(&self, haystack: &str, needle: &str) -> bool;

    /// Case-insensitive equality
    fn matches(&self, a: &str, b: &str) -> bool;

    fn sort(&self, mut values: Vec<String>) -> Vec<String> {
        values.sort_by(|a, b| self.compare(a, b));
        values
    }
}

/// Default collator for Latin-script content
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleCollator {
    pub locale: Locale,
    /// Fold diacritics when matching, so `cafe` finds `Café`
    pub accent_insensitive: bool,
}

impl LocaleCollator {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            accent_insensitive: false,
        }
    }

    pub fn accent_insensitive(mut self, enabled: bool) -> Self {
        self.accent_insensitive = enabled;
        self
    }

    fn search_key(&self, value: &str) -> String {
        if self.accent_insensitive {
            primary_key(value)
        } else {
            value.nfc().collect::<String>().to_lowercase()
        }
    }
}

impl Collator for LocaleCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        primary_key(a)
            .cmp(&primary_key(b))
            .then_with(|| secondary_key(a).cmp(&secondary_key(b)))
            .then_with(|| tertiary_key(a).cmp(&tertiary_key(b)))
            .then_with(|| a.cmp(b))
    }

    fn contains(&self, haystack: &str, needle: &str) -> bool {
        self.search_key(haystack).contains(&self.search_key(needle))
    }

    fn matches(&self, a: &str, b: &str) -> bool {
        self.search_key(a.trim()) == self.search_key(b.trim())
    }
}

/// Base letters only: lowercase, no diacritics, `ß` expanded
fn primary_key(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .fold(String::with_capacity(value.len()), |mut key, c| {
            if c == 'ß' {
                key.push_str("ss");
            } else {
                key.push(c);
            }
            key
        })
}

/// Lowercase with diacritics kept, decomposed so unaccented sorts first
fn secondary_key(value: &str) -> String {
    value.nfd().flat_map(char::to_lowercase).collect()
}

/// Lowercase sorts before uppercase
fn tertiary_key(value: &str) -> Vec<bool> {
    value.chars().map(char::is_uppercase).collect()
}
