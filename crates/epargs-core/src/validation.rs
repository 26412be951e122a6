//! Syntactic checks applied to check names and rendered arguments.
//!
//! Both checks run at render time, never when the configuration is mutated.

use crate::error::{ArgsError, ArgsResult};
use regex::Regex;
use std::sync::OnceLock;

static WHITE_SPACE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn white_space_pattern() -> &'static Regex {
    WHITE_SPACE_PATTERN.get_or_init(|| Regex::new(r"\p{White_Space}").unwrap())
}

/// Reject check names containing `:`, which separates name and severity in `-Xep:`.
pub fn validate_check_name(name: &str) -> ArgsResult<()> {
    if name.contains(':') {
        return Err(ArgsError::colon_in_check_name(name));
    }
    Ok(())
}

/// Reject tokens containing any Unicode white space character.
pub fn validate_no_whitespace(token: &str) -> ArgsResult<()> {
    if white_space_pattern().is_match(token) {
        return Err(ArgsError::whitespace_in_argument(token));
    }
    Ok(())
}
