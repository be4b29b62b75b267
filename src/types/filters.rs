//! Query filters used by venue clients

use crate::error::{Result, VenueXError};
use crate::types::orders::OrderStatus;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Time interval for filtering data. `start` is inclusive, `end` exclusive.
/// A missing bound means the range is open in that direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    /// Inclusive lower bound
    pub start: Option<DateTime<Utc>>,
    /// Exclusive upper bound
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    /// Create a range with both bounds set
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Fails when both bounds are set and `end` is before `start`
    pub fn validate(&self) -> Result<()> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(VenueXError::invalid_parameter(
                    "time range end must be after start",
                ));
            }
        }
        Ok(())
    }

    /// True when no bound is set
    pub fn is_zero(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// True when a start bound is set
    pub fn has_start(&self) -> bool {
        self.start.is_some()
    }

    /// True when an end bound is set
    pub fn has_end(&self) -> bool {
        self.end.is_some()
    }

    /// Length of the range, zero unless both bounds are set
    pub fn duration(&self) -> Duration {
        match (self.start, self.end) {
            (Some(start), Some(end)) => end - start,
            _ => Duration::zero(),
        }
    }

    /// Whether `t` falls inside the range
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        if self.start.map_or(false, |start| t < start) {
            return false;
        }
        if self.end.map_or(false, |end| t >= end) {
            return false;
        }
        true
    }
}

/// Filter over trading symbols
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SymbolFilter {
    /// Explicit symbols (e.g. "BTC-USD"); empty means all
    pub symbols: Vec<String>,
    /// Base currency (e.g. "BTC")
    pub base: Option<String>,
    /// Quote currency (e.g. "USD")
    pub quote: Option<String>,
}

impl SymbolFilter {
    /// True when no criteria are set
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty() && self.base.is_none() && self.quote.is_none()
    }

    /// Whether `symbol` passes the filter.
    ///
    /// An explicit symbol list takes precedence. Base/quote criteria are left to
    /// venue clients, which know their own symbol format, so they always match here.
    pub fn matches(&self, symbol: &str) -> bool {
        if self.symbols.is_empty() {
            return true;
        }
        self.symbols.iter().any(|s| s == symbol)
    }
}

/// Offset or cursor based pagination
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Maximum number of items; zero uses the venue default
    pub limit: i64,
    /// Number of items to skip
    pub offset: i64,
    /// Opaque cursor for cursor-paginated venues
    pub cursor: Option<String>,
}

impl PaginationParams {
    /// Fails on negative limit or offset
    pub fn validate(&self) -> Result<()> {
        if self.limit < 0 {
            return Err(VenueXError::invalid_parameter("limit must be non-negative"));
        }
        if self.offset < 0 {
            return Err(VenueXError::invalid_parameter("offset must be non-negative"));
        }
        Ok(())
    }

    /// True when a limit is set
    pub fn has_limit(&self) -> bool {
        self.limit > 0
    }

    /// True when an offset is set
    pub fn has_offset(&self) -> bool {
        self.offset > 0
    }

    /// True when a cursor is set
    pub fn has_cursor(&self) -> bool {
        self.cursor.as_deref().map_or(false, |c| !c.is_empty())
    }
}

/// Filter criteria for order queries. Every field is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderFilter {
    /// Trading pairs to include; empty means all
    pub symbols: Vec<String>,
    /// Statuses to include; empty means all
    pub statuses: Vec<OrderStatus>,
    /// Orders created at or after this time
    pub start_time: Option<DateTime<Utc>>,
    /// Orders created before this time
    pub end_time: Option<DateTime<Utc>>,
    /// Maximum number of orders; zero uses the venue default
    pub limit: i64,
    /// Number of orders to skip
    pub offset: i64,
}

impl OrderFilter {
    /// Create an empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a symbol
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbols.push(symbol.into());
        self
    }

    /// Restrict to a status
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.statuses.push(status);
        self
    }

    /// Restrict to a creation time window
    pub fn with_time_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    /// Set the page size
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Set the page offset
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Check the filter for invalid values
    pub fn validate(&self) -> Result<()> {
        if self.limit < 0 {
            return Err(VenueXError::invalid_parameter("limit must be non-negative"));
        }
        if self.offset < 0 {
            return Err(VenueXError::invalid_parameter("offset must be non-negative"));
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if start > end {
                return Err(VenueXError::invalid_parameter(
                    "start time must be before end time",
                ));
            }
        }
        Ok(())
    }

    /// True when a start or end time is set
    pub fn has_time_range(&self) -> bool {
        self.start_time.is_some() || self.end_time.is_some()
    }

    /// True when symbols are set
    pub fn has_symbol_filter(&self) -> bool {
        !self.symbols.is_empty()
    }

    /// True when statuses are set
    pub fn has_status_filter(&self) -> bool {
        !self.statuses.is_empty()
    }

    /// The filter's time window as a [`TimeRange`]
    pub fn time_range(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }
}
