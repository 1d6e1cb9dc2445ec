//! Structured types
use std::fmt::{self, Display};

use indexmap::IndexMap;
use scraper::{ElementRef, Html, Selector};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Error;

/// A simplified tense name as used in the conjugation table.
///
/// The page titles each table with the dialect variant followed by a tense, e.g. `Bokmål present
/// perfect tense`. Only the tenses listed here are recognized; every other table on the page is
/// ignored.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Tense {
    /// `present tense`
    Present,
    /// `past tense`
    Past,
    /// `future tense`
    Future,
    /// `conditional tense`
    Conditional,
    /// `imperative tense`
    Imperative,
    /// `present perfect tense`
    PresentPerfect,
    /// `past perfect tense`
    PastPerfect,
    /// `future perfect tense`
    FuturePerfect,
    /// `conditional perfect tense`
    ConditionalPerfect,
}

/// Formatted verb forms of a single variant, keyed by tense in page order.
pub type Tenses = IndexMap<Tense, String>;

/// A verb conjugation table, keyed by dialect variant (`Bokmål`, `Nynorsk`) in page order.
///
/// Each value is formatted as `"{verb form} ({english translation})"`.
///
/// # HTML Source
/// Parsed from the `<section id="conjugations">` element of a verb page, where each
/// `<span class="tense-title-space">` is paired with the `<div class="forms-wrapper">` at the
/// same position.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ConjugationTable {
    variants: IndexMap<String, Tenses>,
}

impl Tense {
    /// Every recognized tense, in the order the page usually lists them.
    pub const ALL: [Tense; 9] = [
        Tense::Present,
        Tense::Past,
        Tense::Future,
        Tense::Conditional,
        Tense::Imperative,
        Tense::PresentPerfect,
        Tense::PastPerfect,
        Tense::FuturePerfect,
        Tense::ConditionalPerfect,
    ];

    /// Returns the snake_case name of the tense.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Tense::Present => "present",
            Tense::Past => "past",
            Tense::Future => "future",
            Tense::Conditional => "conditional",
            Tense::Imperative => "imperative",
            Tense::PresentPerfect => "present_perfect",
            Tense::PastPerfect => "past_perfect",
            Tense::FuturePerfect => "future_perfect",
            Tense::ConditionalPerfect => "conditional_perfect",
        }
    }

    /// Returns the title the page uses for this tense, without the variant prefix.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Tense::Present => "present tense",
            Tense::Past => "past tense",
            Tense::Future => "future tense",
            Tense::Conditional => "conditional tense",
            Tense::Imperative => "imperative tense",
            Tense::PresentPerfect => "present perfect tense",
            Tense::PastPerfect => "past perfect tense",
            Tense::FuturePerfect => "future perfect tense",
            Tense::ConditionalPerfect => "conditional perfect tense",
        }
    }

    /// Maps a page title such as `present perfect tense` to a [`Tense`], ignoring case.
    #[must_use]
    pub fn from_title(title: &str) -> Option<Tense> {
        let title = title.to_lowercase();

        Tense::ALL.into_iter().find(|tense| tense.title() == title)
    }
}

impl Display for Tense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConjugationTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> ConjugationTable {
        ConjugationTable::default()
    }

    /// Parses the conjugation section of a verb page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingElement`] if the document has no `section#conjugations`. A section
    /// without any recognizable tenses results in an empty table.
    pub fn from_html(html: impl AsRef<str>) -> Result<ConjugationTable, Error> {
        let section_selector =
            Selector::parse("section#conjugations").expect("conjugation section selector");
        let title_selector =
            Selector::parse("span.tense-title-space").expect("tense title selector");
        let wrapper_selector = Selector::parse("div.forms-wrapper").expect("forms selector");

        let document = Html::parse_document(html.as_ref());
        let section = document
            .select(&section_selector)
            .next()
            .ok_or(Error::MissingElement("section#conjugations"))?;

        let titles = section.select(&title_selector);
        let wrappers = section.select(&wrapper_selector);
        let mut table = ConjugationTable::new();

        for (title, wrapper) in titles.zip(wrappers) {
            let title = element_text(title);
            let Some((variant, tense)) = split_title(&title) else {
                continue;
            };

            match forms_from_html(wrapper) {
                Ok(form) => table.insert(variant, tense, form),
                Err(_err) => {
                    #[cfg(feature = "log")]
                    tracing::debug!(%title, error = %_err, "skipping tense without verb form");
                }
            }
        }

        Ok(table)
    }

    /// Inserts or replaces the formatted verb form of `tense` in `variant`.
    pub fn insert(&mut self, variant: impl Into<String>, tense: Tense, form: impl Into<String>) {
        self.variants
            .entry(variant.into())
            .or_default()
            .insert(tense, form.into());
    }

    /// Returns the tenses of the given `variant`, if present.
    #[must_use]
    pub fn get(&self, variant: &str) -> Option<&Tenses> {
        self.variants.get(variant)
    }

    /// Returns an iterator over the variants and their tenses, in page order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tenses)> {
        self.variants
            .iter()
            .map(|(variant, tenses)| (variant.as_str(), tenses))
    }

    /// Returns the names of the variants in the table.
    pub fn variant_names(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }

    /// Returns the number of variants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Returns the total number of tenses across all variants.
    #[must_use]
    pub fn num_tenses(&self) -> usize {
        self.variants.values().map(IndexMap::len).sum()
    }

    /// Returns `true` if the table holds no variants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Returns a table with only the `wanted` variants, ordered as in `wanted`.
    ///
    /// If none of the wanted variants are present, the whole table is returned unchanged.
    #[must_use]
    pub fn select_variants<S: AsRef<str>>(&self, wanted: &[S]) -> ConjugationTable {
        let variants: IndexMap<String, Tenses> = wanted
            .iter()
            .filter_map(|name| {
                self.variants
                    .get_key_value(name.as_ref())
                    .map(|(name, tenses)| (name.clone(), tenses.clone()))
            })
            .collect();

        if variants.is_empty() {
            self.clone()
        } else {
            ConjugationTable { variants }
        }
    }
}

impl<'a> IntoIterator for &'a ConjugationTable {
    type Item = (&'a String, &'a Tenses);
    type IntoIter = indexmap::map::Iter<'a, String, Tenses>;

    fn into_iter(self) -> Self::IntoIter {
        self.variants.iter()
    }
}

/// Splits a title like `Bokmål present tense` into its variant and tense.
fn split_title(title: &str) -> Option<(&str, Tense)> {
    let mut parts = title.split_whitespace();
    let variant = parts.next()?;
    let rest: Vec<&str> = parts.collect();

    if rest.is_empty() {
        return None;
    }

    Tense::from_title(&rest.join(" ")).map(|tense| (variant, tense))
}

/// Extracts the formatted `"{form} ({translation})"` string from a `div.forms-wrapper`.
fn forms_from_html(wrapper: ElementRef<'_>) -> Result<String, Error> {
    let form_selector = Selector::parse("div.meta-form").expect("verb form selector");
    let translation_selector =
        Selector::parse("div.meta-translation").expect("translation selector");

    let form = wrapper
        .select(&form_selector)
        .next()
        .map(inline_text)
        .ok_or(Error::MissingElement("div.meta-form"))?;
    let translation = wrapper
        .select(&translation_selector)
        .next()
        .map(inline_text)
        .unwrap_or_default();

    Ok(format!("{form} ({translation})"))
}

/// Returns the trimmed text nodes of `elem` joined by single spaces.
fn element_text(elem: ElementRef<'_>) -> String {
    elem.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the text of `elem` with inline markup flattened and runs of whitespace collapsed.
///
/// `snakk<b>er</b>` reads `snakker`.
fn inline_text(elem: ElementRef<'_>) -> String {
    elem.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
