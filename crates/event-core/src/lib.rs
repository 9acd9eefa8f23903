#![deny(warnings)]

//! Core domain records and invariants for event projections.
//!
//! This crate defines the serializable input/output records exchanged with the
//! projection engine, together with validation helpers that guarantee the
//! numeric invariants every formula relies on.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Attendance levels (percent of capacity) covered by the threshold table.
pub const REFERENCE_ATTENDANCE_LEVELS: [u32; 6] = [40, 50, 60, 70, 80, 90];

/// One hundred, the upper bound of every percentage field.
pub const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Caller-supplied planning inputs for one month of events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    /// Monthly overhead charged per event, in currency units (>= 0).
    pub fixed_costs: Decimal,
    /// Cost to produce a single event (>= 0).
    pub event_cost: Decimal,
    /// Pre-show ticket price (>= 0).
    pub ticket_price_pre: Decimal,
    /// Post-show ticket price (>= 0).
    pub ticket_price_post: Decimal,
    /// Share of tickets sold at the pre-show price, in [0, 100].
    pub sales_mix_pre: Decimal,
    /// Seats per event (>= 1).
    pub venue_capacity: u32,
    /// Number of events held per month (>= 1).
    pub events_per_month: u32,
    /// Expected attendance as a share of capacity, in [0, 100].
    pub attendance_percentage: Decimal,
    /// Advertising spend for the month (>= 0).
    pub ad_spend: Decimal,
    /// Tickets actually sold so far.
    pub tickets_sold: u64,
}

impl InputRecord {
    /// Share of tickets sold at the post-show price; always `100 - sales_mix_pre`.
    pub fn sales_mix_post(&self) -> Decimal {
        HUNDRED - self.sales_mix_pre
    }

    /// Copy of this record with `attendance_percentage` replaced.
    pub fn with_attendance(&self, attendance_percentage: Decimal) -> Self {
        Self {
            attendance_percentage,
            ..self.clone()
        }
    }
}

impl Default for InputRecord {
    fn default() -> Self {
        Self {
            fixed_costs: Decimal::ZERO,
            event_cost: Decimal::ZERO,
            ticket_price_pre: Decimal::ZERO,
            ticket_price_post: Decimal::ZERO,
            sales_mix_pre: Decimal::new(50, 0),
            venue_capacity: 1,
            events_per_month: 1,
            attendance_percentage: Decimal::new(50, 0),
            ad_spend: Decimal::ZERO,
            tickets_sold: 0,
        }
    }
}

/// A ratio that is either a finite value or unbounded (positive infinity).
///
/// `Unbounded` orders above every finite value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ratio {
    Finite(Decimal),
    Unbounded,
}

impl Ratio {
    /// `numerator / denominator`, or `Unbounded` when the denominator is not positive.
    pub fn of(numerator: Decimal, denominator: Decimal) -> Result<Self, ProjectionError> {
        if denominator <= Decimal::ZERO {
            return Ok(Ratio::Unbounded);
        }
        numerator
            .checked_div(denominator)
            .map(Ratio::Finite)
            .ok_or(ProjectionError::InvalidInput(Constraint::Overflow {
                quantity: "ratio",
            }))
    }

    pub fn finite(self) -> Option<Decimal> {
        match self {
            Ratio::Finite(v) => Some(v),
            Ratio::Unbounded => None,
        }
    }

    pub fn is_unbounded(self) -> bool {
        matches!(self, Ratio::Unbounded)
    }
}

impl PartialOrd for Ratio {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ratio {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Ratio::Finite(a), Ratio::Finite(b)) => a.cmp(b),
            (Ratio::Finite(_), Ratio::Unbounded) => Ordering::Less,
            (Ratio::Unbounded, Ratio::Finite(_)) => Ordering::Greater,
            (Ratio::Unbounded, Ratio::Unbounded) => Ordering::Equal,
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Finite(v) => match f.precision() {
                // Decimal's own precision formatting truncates
                Some(p) => write!(
                    f,
                    "{:.*}",
                    p,
                    v.round_dp_with_strategy(p as u32, RoundingStrategy::MidpointAwayFromZero)
                ),
                None => write!(f, "{}", v),
            },
            Ratio::Unbounded => f.write_str("∞"),
        }
    }
}

/// Derived metrics for one input record. Created fresh per calculation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    /// Sales-mix weighted ticket price.
    pub avg_ticket_price: Decimal,
    /// Fixed overhead across all events of the month.
    pub total_fixed_costs: Decimal,
    /// Production cost across all events of the month.
    pub total_event_costs: Decimal,
    pub projected_revenue: Decimal,
    /// Revenue minus every cost including ad spend; negative means a loss.
    pub projected_profit: Decimal,
    pub breakeven_roas: Ratio,
    pub breakeven_cpp: Ratio,
    /// Absent when no ad spend has been made.
    pub current_roas: Option<Decimal>,
    /// Absent when no tickets have been sold.
    pub current_cpp: Option<Decimal>,
}

/// Break-even metrics recomputed at one reference attendance level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdRow {
    /// Attendance level in percent of capacity.
    pub attendance_level: u32,
    pub projected_revenue: Decimal,
    pub breakeven_roas: Ratio,
    pub breakeven_cpp: Ratio,
}

/// Full engine response: the output record plus the threshold table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub output: OutputRecord,
    pub thresholds: Vec<ThresholdRow>,
}

/// Violated precondition, naming the offending field.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Constraint {
    /// Percentage outside [0, 100].
    #[error("{field} must be between 0 and 100")]
    PercentOutOfRange { field: &'static str },
    /// Monetary amount below zero.
    #[error("{field} cannot be negative")]
    Negative { field: &'static str },
    /// Count below its minimum.
    #[error("{field} must be at least {min}")]
    BelowMinimum { field: &'static str, min: u32 },
    /// Intermediate value exceeded the decimal range.
    #[error("{quantity} exceeds the representable range")]
    Overflow { quantity: &'static str },
}

/// Errors raised by the projection engine.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ProjectionError {
    /// A precondition was violated; the whole computation is aborted.
    #[error("invalid input: {0}")]
    InvalidInput(Constraint),
}

impl ProjectionError {
    pub fn constraint(&self) -> Constraint {
        match self {
            ProjectionError::InvalidInput(c) => *c,
        }
    }
}

impl From<Constraint> for ProjectionError {
    fn from(c: Constraint) -> Self {
        ProjectionError::InvalidInput(c)
    }
}

/// Require `value` to lie in [0, 100].
pub fn ensure_percent(field: &'static str, value: Decimal) -> Result<(), ProjectionError> {
    if value < Decimal::ZERO || value > HUNDRED {
        return Err(Constraint::PercentOutOfRange { field }.into());
    }
    Ok(())
}

/// Require `value >= 0`.
pub fn ensure_non_negative(field: &'static str, value: Decimal) -> Result<(), ProjectionError> {
    if value < Decimal::ZERO {
        return Err(Constraint::Negative { field }.into());
    }
    Ok(())
}

/// Require `value >= min`.
pub fn ensure_at_least(field: &'static str, value: u32, min: u32) -> Result<(), ProjectionError> {
    if value < min {
        return Err(Constraint::BelowMinimum { field, min }.into());
    }
    Ok(())
}

/// Validate every field of an input record. Fields are checked in declaration order.
pub fn validate_input(input: &InputRecord) -> Result<(), ProjectionError> {
    ensure_non_negative("fixed_costs", input.fixed_costs)?;
    ensure_non_negative("event_cost", input.event_cost)?;
    ensure_non_negative("ticket_price_pre", input.ticket_price_pre)?;
    ensure_non_negative("ticket_price_post", input.ticket_price_post)?;
    ensure_percent("sales_mix_pre", input.sales_mix_pre)?;
    ensure_at_least("venue_capacity", input.venue_capacity, 1)?;
    ensure_at_least("events_per_month", input.events_per_month, 1)?;
    ensure_percent("attendance_percentage", input.attendance_percentage)?;
    ensure_non_negative("ad_spend", input.ad_spend)?;
    Ok(())
}
