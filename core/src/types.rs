//! Shared primitive types used across the entire pipeline.

use chrono::NaiveDateTime;

/// A stable, unique identifier for any generated record.
pub type EntityId = String;

/// The canonical run identifier.
pub type RunId = String;

/// Wall-clock timestamp with second granularity, no timezone.
pub type Timestamp = NaiveDateTime;
