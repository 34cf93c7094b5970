//! Conversions between the contract's native units and display units.
//!
//! Amounts travel to and from the contract as wei (`U256`) and are shown as
//! decimal ether strings. Timestamps travel as unix seconds and are shown as
//! calendar time.

use alloy::primitives::utils::{format_ether, parse_ether};
use alloy::primitives::U256;
use chrono::{DateTime, NaiveDateTime, Utc};

use crate::{PrimitivesError, Result};

/// accepted layouts for deadlines entered without an offset, read as UTC
const NAIVE_DEADLINE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// wei per ether is 10^18, so a finer fraction cannot be represented
const ETHER_DECIMALS: usize = 18;

/// Parse a decimal ether amount (e.g. `"1.5"`) into wei.
///
/// Amounts finer than one wei are rejected rather than truncated.
pub fn parse_amount(amount: &str) -> Result<U256> {
    let amount = amount.trim();
    if amount.starts_with('-') {
        return Err(PrimitivesError::UnitConversionError(format!(
            "amount must not be negative: {}",
            amount
        )));
    }
    if let Some((whole, fraction)) = amount.split_once('.') {
        if whole.is_empty() && fraction.is_empty() {
            return Err(PrimitivesError::UnitConversionError(format!(
                "amount has no digits: {}",
                amount
            )));
        }
        if fraction.len() > ETHER_DECIMALS {
            return Err(PrimitivesError::UnitConversionError(format!(
                "amount has more than {} decimals: {}",
                ETHER_DECIMALS, amount
            )));
        }
    }
    parse_ether(amount)
        .map_err(|e| PrimitivesError::UnitConversionError(format!("{}: {}", amount, e)))
}

/// Format wei as a decimal ether string without trailing zeros (`"1.5"`, `"2.0"`).
#[must_use]
pub fn format_amount(wei: U256) -> String {
    let formatted = format_ether(wei);
    match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{}.0", whole)
            } else {
                format!("{}.{}", whole, fraction)
            }
        }
        None => format!("{}.0", formatted),
    }
}

/// Convert a contract unix timestamp into calendar time.
pub fn timestamp_to_datetime(timestamp: U256) -> Result<DateTime<Utc>> {
    let secs = u64::try_from(timestamp)
        .ok()
        .and_then(|secs| i64::try_from(secs).ok())
        .ok_or_else(|| PrimitivesError::TimestampError(timestamp.to_string()))?;
    DateTime::from_timestamp(secs, 0).ok_or_else(|| PrimitivesError::TimestampError(secs.to_string()))
}

/// Convert calendar time into the unix timestamp the contract expects.
pub fn datetime_to_timestamp(datetime: DateTime<Utc>) -> Result<U256> {
    u64::try_from(datetime.timestamp())
        .map(U256::from)
        .map_err(|_| PrimitivesError::TimestampError(datetime.to_rfc3339()))
}

/// Parse a user supplied deadline.
///
/// Accepts RFC 3339 (`2025-03-01T12:00:00Z`), a local-form datetime without an
/// offset (`2025-03-01T12:00`, read as UTC) or raw unix seconds.
pub fn parse_deadline(deadline: &str) -> Result<DateTime<Utc>> {
    let deadline = deadline.trim();

    if !deadline.is_empty() && deadline.bytes().all(|b| b.is_ascii_digit()) {
        let secs: i64 = deadline
            .parse()
            .map_err(|_| PrimitivesError::TimestampError(deadline.to_string()))?;
        return DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| PrimitivesError::TimestampError(deadline.to_string()));
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(deadline) {
        return Ok(datetime.with_timezone(&Utc));
    }

    NAIVE_DEADLINE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(deadline, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            PrimitivesError::ValidationError(format!("unrecognised deadline format: {}", deadline))
        })
}
