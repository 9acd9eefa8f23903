#![deny(warnings)]

//! Projection engine: revenue, profit and break-even advertising metrics.
//!
//! Every formula validates its own preconditions and fails with
//! [`ProjectionError::InvalidInput`] instead of clamping. Division by zero is
//! never an error:
//! - break-even ratios become [`Ratio::Unbounded`]
//! - current ratios become `None`

pub mod assessment;

use event_core::{
    ensure_non_negative, ensure_percent, validate_input, Constraint, InputRecord, OutputRecord,
    Projection, ProjectionError, Ratio, ThresholdRow, HUNDRED, REFERENCE_ATTENDANCE_LEVELS,
};
use rust_decimal::Decimal;
use tracing::{debug, warn};

fn checked_mul(a: Decimal, b: Decimal, quantity: &'static str) -> Result<Decimal, ProjectionError> {
    a.checked_mul(b)
        .ok_or(ProjectionError::InvalidInput(Constraint::Overflow { quantity }))
}

fn checked_add(a: Decimal, b: Decimal, quantity: &'static str) -> Result<Decimal, ProjectionError> {
    a.checked_add(b)
        .ok_or(ProjectionError::InvalidInput(Constraint::Overflow { quantity }))
}

fn checked_sub(a: Decimal, b: Decimal, quantity: &'static str) -> Result<Decimal, ProjectionError> {
    a.checked_sub(b)
        .ok_or(ProjectionError::InvalidInput(Constraint::Overflow { quantity }))
}

/// Sales-mix weighted ticket price.
///
/// `price_pre * mix_pre / 100 + price_post * (100 - mix_pre) / 100`
///
/// Example:
/// let p = average_ticket_price(Decimal::new(25,0), Decimal::new(50,0), Decimal::new(75,0)).unwrap();
/// assert_eq!(p, Decimal::new(3125,2));
pub fn average_ticket_price(
    price_pre: Decimal,
    price_post: Decimal,
    sales_mix_pre: Decimal,
) -> Result<Decimal, ProjectionError> {
    ensure_percent("sales_mix_pre", sales_mix_pre)?;
    ensure_non_negative("ticket_price_pre", price_pre)?;
    ensure_non_negative("ticket_price_post", price_post)?;
    let sales_mix_post = HUNDRED - sales_mix_pre;
    let pre = checked_mul(price_pre, sales_mix_pre, "avg_ticket_price")? / HUNDRED;
    let post = checked_mul(price_post, sales_mix_post, "avg_ticket_price")? / HUNDRED;
    checked_add(pre, post, "avg_ticket_price")
}

/// Fixed overhead across all events of the month.
pub fn total_fixed_costs(
    fixed_costs: Decimal,
    events_per_month: u32,
) -> Result<Decimal, ProjectionError> {
    ensure_non_negative("fixed_costs", fixed_costs)?;
    checked_mul(fixed_costs, Decimal::from(events_per_month), "total_fixed_costs")
}

/// Production cost across all events of the month.
pub fn total_event_costs(event_cost: Decimal, events_per_month: u32) -> Result<Decimal, ProjectionError> {
    ensure_non_negative("event_cost", event_cost)?;
    checked_mul(event_cost, Decimal::from(events_per_month), "total_event_costs")
}

/// Tickets expected to be sold over the month at `attendance_pct`.
pub fn projected_tickets(
    capacity: u32,
    attendance_pct: Decimal,
    events_per_month: u32,
) -> Result<Decimal, ProjectionError> {
    ensure_percent("attendance_percentage", attendance_pct)?;
    let per_event = checked_mul(Decimal::from(capacity), attendance_pct, "projected_tickets")? / HUNDRED;
    checked_mul(per_event, Decimal::from(events_per_month), "projected_tickets")
}

/// `avg_ticket_price * capacity * attendance_pct / 100 * events_per_month`
pub fn projected_revenue(
    avg_ticket_price: Decimal,
    capacity: u32,
    attendance_pct: Decimal,
    events_per_month: u32,
) -> Result<Decimal, ProjectionError> {
    let tickets = projected_tickets(capacity, attendance_pct, events_per_month)?;
    checked_mul(avg_ticket_price, tickets, "projected_revenue")
}

/// Revenue minus fixed costs, event costs and ad spend. Negative values are losses.
pub fn projected_profit(
    revenue: Decimal,
    total_fixed_costs: Decimal,
    event_cost: Decimal,
    events_per_month: u32,
    ad_spend: Decimal,
) -> Result<Decimal, ProjectionError> {
    ensure_non_negative("ad_spend", ad_spend)?;
    let event_costs = total_event_costs(event_cost, events_per_month)?;
    let profit = checked_sub(revenue, total_fixed_costs, "projected_profit")?;
    let profit = checked_sub(profit, event_costs, "projected_profit")?;
    checked_sub(profit, ad_spend, "projected_profit")
}

/// Total cost that advertising-driven revenue must cover: fixed plus event costs.
pub fn breakeven_ad_spend(
    total_fixed_costs: Decimal,
    event_cost: Decimal,
    events_per_month: u32,
) -> Result<Decimal, ProjectionError> {
    ensure_non_negative("total_fixed_costs", total_fixed_costs)?;
    let event_costs = total_event_costs(event_cost, events_per_month)?;
    checked_add(total_fixed_costs, event_costs, "breakeven_ad_spend")
}

/// `revenue / breakeven_ad_spend`; unbounded when there is nothing to cover.
pub fn breakeven_roas(
    total_fixed_costs: Decimal,
    event_cost: Decimal,
    events_per_month: u32,
    revenue: Decimal,
) -> Result<Ratio, ProjectionError> {
    let spend = breakeven_ad_spend(total_fixed_costs, event_cost, events_per_month)?;
    Ratio::of(revenue, spend)
}

/// `breakeven_ad_spend / projected tickets`; unbounded when no tickets are projected.
pub fn breakeven_cpp(
    total_fixed_costs: Decimal,
    event_cost: Decimal,
    events_per_month: u32,
    capacity: u32,
    attendance_pct: Decimal,
) -> Result<Ratio, ProjectionError> {
    let spend = breakeven_ad_spend(total_fixed_costs, event_cost, events_per_month)?;
    let tickets = projected_tickets(capacity, attendance_pct, events_per_month)?;
    Ratio::of(spend, tickets)
}

/// Revenue per unit of ad spend, absent when nothing was spent.
pub fn current_roas(revenue: Decimal, ad_spend: Decimal) -> Result<Option<Decimal>, ProjectionError> {
    ensure_non_negative("ad_spend", ad_spend)?;
    if ad_spend.is_zero() {
        return Ok(None);
    }
    revenue
        .checked_div(ad_spend)
        .map(Some)
        .ok_or(ProjectionError::InvalidInput(Constraint::Overflow {
            quantity: "current_roas",
        }))
}

/// Ad spend per ticket sold, absent when no tickets were sold.
pub fn current_cpp(ad_spend: Decimal, tickets_sold: u64) -> Result<Option<Decimal>, ProjectionError> {
    ensure_non_negative("ad_spend", ad_spend)?;
    if tickets_sold == 0 {
        return Ok(None);
    }
    Ok(Some(ad_spend / Decimal::from(tickets_sold)))
}

/// Run the full derivation chain for one input record.
///
/// The record is validated up front, so a failure never leaves a partially
/// computed output behind.
pub fn calculate(input: &InputRecord) -> Result<OutputRecord, ProjectionError> {
    validate_input(input)?;
    let avg_ticket_price = average_ticket_price(
        input.ticket_price_pre,
        input.ticket_price_post,
        input.sales_mix_pre,
    )?;
    let total_fixed = total_fixed_costs(input.fixed_costs, input.events_per_month)?;
    let total_events = total_event_costs(input.event_cost, input.events_per_month)?;
    let revenue = projected_revenue(
        avg_ticket_price,
        input.venue_capacity,
        input.attendance_percentage,
        input.events_per_month,
    )?;
    let profit = projected_profit(
        revenue,
        total_fixed,
        input.event_cost,
        input.events_per_month,
        input.ad_spend,
    )?;
    let be_roas = breakeven_roas(total_fixed, input.event_cost, input.events_per_month, revenue)?;
    let be_cpp = breakeven_cpp(
        total_fixed,
        input.event_cost,
        input.events_per_month,
        input.venue_capacity,
        input.attendance_percentage,
    )?;
    let cur_roas = current_roas(revenue, input.ad_spend)?;
    let cur_cpp = current_cpp(input.ad_spend, input.tickets_sold)?;
    debug!(%avg_ticket_price, %revenue, %profit, %be_roas, %be_cpp, "projection calculated");
    Ok(OutputRecord {
        avg_ticket_price,
        total_fixed_costs: total_fixed,
        total_event_costs: total_events,
        projected_revenue: revenue,
        projected_profit: profit,
        breakeven_roas: be_roas,
        breakeven_cpp: be_cpp,
        current_roas: cur_roas,
        current_cpp: cur_cpp,
    })
}

/// Break-even metrics at each reference attendance level, ascending.
///
/// All inputs except attendance are held fixed.
pub fn threshold_table(input: &InputRecord) -> Result<Vec<ThresholdRow>, ProjectionError> {
    validate_input(input)?;
    let avg_ticket_price = average_ticket_price(
        input.ticket_price_pre,
        input.ticket_price_post,
        input.sales_mix_pre,
    )?;
    let total_fixed = total_fixed_costs(input.fixed_costs, input.events_per_month)?;
    REFERENCE_ATTENDANCE_LEVELS
        .iter()
        .map(|&level| {
            let attendance = Decimal::from(level);
            let revenue = projected_revenue(
                avg_ticket_price,
                input.venue_capacity,
                attendance,
                input.events_per_month,
            )?;
            Ok(ThresholdRow {
                attendance_level: level,
                projected_revenue: revenue,
                breakeven_roas: breakeven_roas(
                    total_fixed,
                    input.event_cost,
                    input.events_per_month,
                    revenue,
                )?,
                breakeven_cpp: breakeven_cpp(
                    total_fixed,
                    input.event_cost,
                    input.events_per_month,
                    input.venue_capacity,
                    attendance,
                )?,
            })
        })
        .collect()
}

/// Output record plus threshold table for one request.
pub fn evaluate(input: &InputRecord) -> Result<Projection, ProjectionError> {
    let result = calculate(input).and_then(|output| {
        Ok(Projection {
            output,
            thresholds: threshold_table(input)?,
        })
    });
    if let Err(e) = &result {
        warn!(error = %e, "projection rejected");
    }
    result
}
