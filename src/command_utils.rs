use std::time::Duration;

use crate::commands::CommandError;

pub fn parse_integer(argument: &str) -> Result<i64, CommandError> {
    argument
        .parse::<i64>()
        .map_err(|_| CommandError::not_an_integer())
}

pub fn parse_float(argument: &str) -> Result<f64, CommandError> {
    let value = match argument.to_lowercase().as_str() {
        "+inf" | "inf" => f64::INFINITY,
        "-inf" => f64::NEG_INFINITY,
        _ => argument
            .parse::<f64>()
            .map_err(|_| CommandError::not_a_float())?,
    };

    if value.is_nan() {
        return Err(CommandError::not_a_float());
    }

    Ok(value)
}

pub fn parse_count(argument: &str) -> Result<usize, CommandError> {
    argument.parse::<usize>().map_err(|_| {
        CommandError::InvalidArgument("value is out of range, must be positive".to_string())
    })
}

/// Parses a positive expiration amount given in `unit_millis` milliseconds per unit.
pub fn parse_expiration(argument: &str, unit_millis: u64) -> Result<Duration, CommandError> {
    let amount = parse_integer(argument)?;

    if amount <= 0 {
        return Err(CommandError::InvalidArgument(
            "invalid expire time in command".to_string(),
        ));
    }

    (amount as u64)
        .checked_mul(unit_millis)
        .map(Duration::from_millis)
        .ok_or_else(|| CommandError::InvalidArgument("invalid expire time in command".to_string()))
}

/// Fails with `WrongArity` unless `min <= arguments.len() <= max`.
pub fn expect_arity(
    name: &str,
    arguments: &[String],
    min: usize,
    max: Option<usize>,
) -> Result<(), CommandError> {
    let len = arguments.len();

    if len < min || max.is_some_and(|max| len > max) {
        return Err(CommandError::WrongArity(name.to_string()));
    }

    Ok(())
}

/// Resolves Redis-style inclusive `start`/`end` indexes (negative values count
/// from the tail) against a collection of `len` elements.
///
/// Returns `None` when the resolved range is empty.
pub fn validate_range_indexes(
    len: usize,
    start_index: i64,
    end_index: i64,
) -> Option<(usize, usize)> {
    let len = len as i64;

    let mut start = if start_index < 0 {
        len + start_index
    } else {
        start_index
    };
    let mut end = if end_index < 0 {
        len + end_index
    } else {
        end_index
    };

    start = start.max(0);
    end = end.min(len - 1);

    if start >= len || start > end {
        return None;
    }

    Some((start as usize, end as usize))
}

/// Formats a score the way replies carry it: integral values without a
/// fractional part.
pub fn format_score(score: f64) -> String {
    if score.is_infinite() {
        return if score > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    if score.fract() == 0.0 && score.abs() < 1e17 {
        format!("{}", score as i64)
    } else {
        format!("{}", score)
    }
}
