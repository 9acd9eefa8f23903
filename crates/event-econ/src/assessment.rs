//! Verdicts comparing current advertising performance with break-even levels.

use event_core::{OutputRecord, Ratio};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sign of the projected profit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitStatus {
    Profitable,
    BreakEven,
    Loss,
}

impl ProfitStatus {
    pub fn of(profit: Decimal) -> Self {
        if profit > Decimal::ZERO {
            ProfitStatus::Profitable
        } else if profit < Decimal::ZERO {
            ProfitStatus::Loss
        } else {
            ProfitStatus::BreakEven
        }
    }
}

impl fmt::Display for ProfitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProfitStatus::Profitable => "profitable",
            ProfitStatus::BreakEven => "at break-even",
            ProfitStatus::Loss => "not yet profitable",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Good,
    NeedsImprovement,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Good => "Good",
            Verdict::NeedsImprovement => "Needs Improvement",
        })
    }
}

/// Current ROAS is good when it meets or beats the break-even ROAS.
pub fn assess_roas(current: Option<Decimal>, breakeven: Ratio) -> Option<Verdict> {
    current.map(|c| {
        if Ratio::Finite(c) >= breakeven {
            Verdict::Good
        } else {
            Verdict::NeedsImprovement
        }
    })
}

/// Current CPP is good when it does not exceed the break-even CPP.
pub fn assess_cpp(current: Option<Decimal>, breakeven: Ratio) -> Option<Verdict> {
    current.map(|c| {
        if Ratio::Finite(c) <= breakeven {
            Verdict::Good
        } else {
            Verdict::NeedsImprovement
        }
    })
}

/// `current - breakeven`; absent when either side is missing or unbounded.
pub fn roas_gap(current: Option<Decimal>, breakeven: Ratio) -> Option<Decimal> {
    Some(current? - breakeven.finite()?)
}

/// `breakeven - current`; positive means room left per ticket.
pub fn cpp_headroom(current: Option<Decimal>, breakeven: Ratio) -> Option<Decimal> {
    Some(breakeven.finite()? - current?)
}

/// All verdicts for one output record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub profit: ProfitStatus,
    pub roas: Option<Verdict>,
    pub cpp: Option<Verdict>,
    pub roas_gap: Option<Decimal>,
    pub cpp_headroom: Option<Decimal>,
}

impl Assessment {
    pub fn from_output(out: &OutputRecord) -> Self {
        Self {
            profit: ProfitStatus::of(out.projected_profit),
            roas: assess_roas(out.current_roas, out.breakeven_roas),
            cpp: assess_cpp(out.current_cpp, out.breakeven_cpp),
            roas_gap: roas_gap(out.current_roas, out.breakeven_roas),
            cpp_headroom: cpp_headroom(out.current_cpp, out.breakeven_cpp),
        }
    }
}
