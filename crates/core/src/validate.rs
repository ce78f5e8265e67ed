//! Argument checks shared by every gated service.

use crate::error::{ValidationError, ValidationResult};

/// Require an optional argument to be present.
pub fn not_null<T>(value: Option<T>, argument: &str) -> ValidationResult<T> {
    value.ok_or_else(|| ValidationError::null(argument))
}

/// Require a collection to hold at least one element.
pub fn not_empty<I>(value: I, argument: &str) -> ValidationResult<I>
where
    for<'a> &'a I: IntoIterator,
{
    if (&value).into_iter().next().is_none() {
        return Err(ValidationError::empty(argument));
    }
    Ok(value)
}

/// Require a string to contain something other than whitespace.
pub fn not_blank<'a>(value: Option<&'a str>, argument: &str) -> ValidationResult<&'a str> {
    let value = not_null(value, argument)?;
    if value.trim().is_empty() {
        return Err(ValidationError::empty(argument));
    }
    Ok(value)
}

/// Require a number to stay within an upper bound.
pub fn at_most(value: u64, max: u64, argument: &str) -> ValidationResult<u64> {
    if value > max {
        return Err(ValidationError::too_large(argument, max));
    }
    Ok(value)
}
