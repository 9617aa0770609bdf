// SPDX-License-Identifier: Apache-2.0

//! Flexible block references.
//!
//! Callers name blocks three ways: by number, by unix timestamp, or by a
//! calendar date. Bare integers are disambiguated with a cutoff: anything
//! below the timestamp of the first Ethereum block is read as a block
//! number, anything at or above it as a unix timestamp. Block numbers will
//! not reach the cutoff for thousands of years.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::errors::ExplorerError;

/// Unix timestamp of 2015-07-30, the day of the Ethereum genesis block.
const ETH_START_TIMESTAMP: u64 = 1_438_214_400;

/// A block named by number, unix timestamp, or calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRef {
    /// An exact block number
    Number(u64),
    /// A unix timestamp to be resolved via the explorer
    Timestamp(u64),
    /// A calendar date to be resolved via the explorer
    Date(DateTime<Utc>),
}

impl BlockRef {
    /// Interpret a bare integer as a block number or a unix timestamp.
    #[must_use]
    pub fn from_ordinal(value: u64) -> Self {
        if value < ETH_START_TIMESTAMP {
            BlockRef::Number(value)
        } else {
            BlockRef::Timestamp(value)
        }
    }

    /// Parse a textual block reference.
    ///
    /// Accepts a bare integer (disambiguated as in [`BlockRef::from_ordinal`]),
    /// an RFC 3339 datetime, `YYYY-MM-DD HH:MM:SS`, or a plain `YYYY-MM-DD`
    /// date read as midnight UTC.
    pub fn parse(input: &str) -> Result<Self, ExplorerError> {
        let input = input.trim();
        if let Ok(ordinal) = input.parse::<u64>() {
            return Ok(Self::from_ordinal(ordinal));
        }
        if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
            return Ok(BlockRef::Date(datetime.with_timezone(&Utc)));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
            return Ok(BlockRef::Date(naive.and_utc()));
        }
        if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Ok(BlockRef::Date(midnight.and_utc()));
            }
        }
        Err(ExplorerError::InvalidBlockRef(input.to_string()))
    }

    /// The unix timestamp to resolve, or `None` for exact block numbers.
    #[must_use]
    pub fn timestamp(&self) -> Option<u64> {
        match self {
            BlockRef::Number(_) => None,
            BlockRef::Timestamp(ts) => Some(*ts),
            // Pre-genesis dates clamp to zero rather than going negative.
            BlockRef::Date(date) => Some(date.timestamp().max(0) as u64),
        }
    }
}

impl From<u64> for BlockRef {
    fn from(value: u64) -> Self {
        Self::from_ordinal(value)
    }
}

impl From<DateTime<Utc>> for BlockRef {
    fn from(value: DateTime<Utc>) -> Self {
        BlockRef::Date(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_integers_are_block_numbers() {
        assert_eq!(BlockRef::from_ordinal(0), BlockRef::Number(0));
        assert_eq!(BlockRef::from_ordinal(19_000_000), BlockRef::Number(19_000_000));
        assert_eq!(
            BlockRef::from_ordinal(ETH_START_TIMESTAMP - 1),
            BlockRef::Number(ETH_START_TIMESTAMP - 1)
        );
    }

    #[test]
    fn test_large_integers_are_timestamps() {
        assert_eq!(
            BlockRef::from_ordinal(1_700_000_000),
            BlockRef::Timestamp(1_700_000_000)
        );
    }

    #[test]
    fn test_parse_date_forms() {
        let midnight = BlockRef::parse("2024-01-15").unwrap();
        let explicit = BlockRef::parse("2024-01-15 00:00:00").unwrap();
        let rfc3339 = BlockRef::parse("2024-01-15T00:00:00Z").unwrap();
        assert_eq!(midnight, explicit);
        assert_eq!(midnight, rfc3339);
        assert_eq!(midnight.timestamp(), Some(1_705_276_800));
    }

    #[test]
    fn test_parse_bare_integer() {
        assert_eq!(BlockRef::parse("12345").unwrap(), BlockRef::Number(12_345));
        assert_eq!(
            BlockRef::parse("1700000000").unwrap(),
            BlockRef::Timestamp(1_700_000_000)
        );
    }

    #[test]
    fn test_parse_garbage_rejected() {
        assert!(matches!(
            BlockRef::parse("next tuesday"),
            Err(ExplorerError::InvalidBlockRef(_))
        ));
    }
}
