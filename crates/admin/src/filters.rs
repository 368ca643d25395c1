//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use crate::models::review::star_string;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Renders a 0-5 rating as stars. Anything unparsable shows five empty stars.
///
/// Usage in templates: `{{ review.rating|stars }}`
#[askama::filter_fn]
pub fn stars(rating: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let rating = rating.to_string().parse::<u8>().unwrap_or(0);
    Ok(star_string(rating))
}
