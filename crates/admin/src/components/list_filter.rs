//! Filter bar building blocks for list views.
//!
//! A list view holds a base collection and a set of criteria. The visible
//! subset is every item matching all criteria, in base order.

use std::str::FromStr;

use serde::Serialize;

use prifam_core::{AdminRole, Sentiment, UserStatus};

/// Query value meaning "no constraint".
pub const ALL: &str = "all";

/// An equality criterion that may be switched off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Choice<T> {
    #[default]
    All,
    Only(T),
}

impl<T: FromStr> Choice<T> {
    /// Parse a raw query value. Missing, empty and `"all"` mean [`Choice::All`].
    ///
    /// # Errors
    ///
    /// Returns the value's parse error for anything else that does not parse.
    pub fn parse(raw: Option<&str>) -> Result<Self, T::Err> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::All),
            Some(value) if value.eq_ignore_ascii_case(ALL) => Ok(Self::All),
            Some(value) => value.parse().map(Self::Only),
        }
    }
}

impl<T> Choice<T> {
    /// True for [`Choice::All`], otherwise whatever `test` says about the value.
    pub fn allows(&self, test: impl FnOnce(&T) -> bool) -> bool {
        match self {
            Self::All => true,
            Self::Only(value) => test(value),
        }
    }

    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl<T: PartialEq> Choice<T> {
    #[must_use]
    pub fn matches(&self, candidate: &T) -> bool {
        self.allows(|value| value == candidate)
    }
}

impl<T: FilterToken> Choice<T> {
    /// Value to pre-select in the rendered select box.
    #[must_use]
    pub fn token(&self) -> String {
        match self {
            Self::All => ALL.to_string(),
            Self::Only(value) => value.token().to_string(),
        }
    }
}

/// Canonical query-string form of a filterable value.
pub trait FilterToken {
    fn token(&self) -> &str;
}

impl FilterToken for Sentiment {
    fn token(&self) -> &str {
        self.as_str()
    }
}

impl FilterToken for AdminRole {
    fn token(&self) -> &str {
        self.slug()
    }
}

impl FilterToken for UserStatus {
    fn token(&self) -> &str {
        self.as_str()
    }
}

impl FilterToken for String {
    fn token(&self) -> &str {
        self
    }
}

/// Case-insensitive free-text search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextQuery {
    raw: String,
    needle: String,
}

impl TextQuery {
    #[must_use]
    pub fn new(raw: Option<&str>) -> Self {
        let raw = raw.map(str::trim).unwrap_or_default().to_string();
        let needle = raw.to_lowercase();
        Self { raw, needle }
    }

    /// The search term as typed, trimmed.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// True if the query is empty or any field contains it.
    #[must_use]
    pub fn matches_any(&self, fields: &[&str]) -> bool {
        self.is_empty()
            || fields
                .iter()
                .any(|field| field.to_lowercase().contains(&self.needle))
    }
}

/// A set of predicates over list items, combined with AND.
pub trait Criteria<T> {
    fn matches(&self, item: &T) -> bool;

    /// The matching items in their original order.
    fn apply<'a>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

/// How a filter control is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Text input filter.
    Text,
    /// Single-select dropdown.
    Select,
}

/// Filter control definition for a list view's filter bar.
#[derive(Debug, Clone, Serialize)]
pub struct TableFilter {
    /// Query parameter key.
    pub key: String,
    /// Display label.
    pub label: String,
    pub filter_type: FilterType,
    /// Placeholder text (for text inputs).
    pub placeholder: String,
    /// Available options (for selects), starting with the "all" option.
    pub options: Vec<FilterOption>,
    /// Current value, echoed back into the control.
    pub value: String,
}

/// Option for select filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    /// Option value.
    pub value: String,
    /// Display label.
    pub label: String,
}

impl FilterOption {
    /// Create a new filter option.
    #[must_use]
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

impl TableFilter {
    /// Create a text filter.
    #[must_use]
    pub fn text(key: &str, label: &str, placeholder: &str, query: &TextQuery) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            filter_type: FilterType::Text,
            placeholder: placeholder.to_string(),
            options: vec![],
            value: query.as_str().to_string(),
        }
    }

    /// Create a select filter with a leading "all" option.
    #[must_use]
    pub fn select(
        key: &str,
        label: &str,
        all_label: &str,
        options: Vec<FilterOption>,
        value: String,
    ) -> Self {
        let mut all = vec![FilterOption::new(ALL, all_label)];
        all.extend(options);
        Self {
            key: key.to_string(),
            label: label.to_string(),
            filter_type: FilterType::Select,
            placeholder: String::new(),
            options: all,
            value,
        }
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        self.filter_type == FilterType::Text
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_sentinels() {
        for raw in [None, Some(""), Some("all"), Some(" ALL ")] {
            assert!(Choice::<Sentiment>::parse(raw).unwrap().is_all());
        }
    }

    #[test]
    fn test_choice_parses_value() {
        let choice = Choice::<Sentiment>::parse(Some("negative")).unwrap();
        assert_eq!(choice, Choice::Only(Sentiment::Negative));
        assert!(choice.matches(&Sentiment::Negative));
        assert!(!choice.matches(&Sentiment::Positive));
        assert_eq!(choice.token(), "negative");
    }

    #[test]
    fn test_choice_rejects_unknown_value() {
        assert!(Choice::<UserStatus>::parse(Some("banned")).is_err());
    }

    #[test]
    fn test_text_query_case_insensitive() {
        let query = TextQuery::new(Some("  SWIG "));
        assert_eq!(query.as_str(), "SWIG");
        assert!(query.matches_any(&["Priya", "Swiggy"]));
        assert!(!query.matches_any(&["Zomato"]));
        assert!(TextQuery::new(None).matches_any(&[]));
    }

    #[test]
    fn test_select_filter_starts_with_all() {
        let filter = TableFilter::select(
            "status",
            "Status",
            "All Status",
            vec![FilterOption::new("active", "Active")],
            ALL.to_string(),
        );
        assert_eq!(filter.options.len(), 2);
        assert_eq!(filter.options.first().unwrap().value, ALL);
        assert!(!filter.is_text());
    }

    struct Even;

    impl Criteria<u32> for Even {
        fn matches(&self, item: &u32) -> bool {
            item % 2 == 0
        }
    }

    #[test]
    fn test_apply_preserves_order() {
        let items = [4, 1, 2, 7, 8];
        assert_eq!(Even.apply(&items), [&4, &2, &8]);
    }
}
