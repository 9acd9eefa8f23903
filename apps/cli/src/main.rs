#![deny(warnings)]

//! Headless CLI: load an input record or a saved scenario and print its projection.

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use event_core::{InputRecord, Projection, Ratio};
use event_econ::assessment::Assessment;
use rust_decimal::{Decimal, RoundingStrategy};
use scenarios::{Scenario, ScenarioStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    input: Option<PathBuf>,
    scenarios: Option<PathBuf>,
    scenario: Option<String>,
    json: bool,
    version: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--input" => args.input = Some(it.next().context("--input needs a path")?.into()),
            "--scenarios" => {
                args.scenarios = Some(it.next().context("--scenarios needs a path")?.into())
            }
            "--scenario" => args.scenario = Some(it.next().context("--scenario needs a name")?),
            "--json" => args.json = true,
            "--version" => args.version = true,
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(args)
}

fn read_input(path: &Path) -> Result<InputRecord> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading input {}", path.display()))?;
    let is_json = path.extension().is_some_and(|e| e == "json");
    let input: InputRecord = if is_json {
        serde_json::from_str(&text)?
    } else {
        serde_yaml::from_str(&text)?
    };
    Ok(input)
}

/// A scenario file entry: either a saved snapshot or bare inputs.
#[derive(Deserialize)]
#[serde(untagged)]
enum ScenarioEntry {
    Saved(Scenario),
    Inputs(InputRecord),
}

fn load_store(path: &Path) -> Result<ScenarioStore> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenarios {}", path.display()))?;
    let named: BTreeMap<String, ScenarioEntry> = serde_yaml::from_str(&text)?;
    // bare inputs count as saved on load
    let now = Local::now().naive_local();
    let mut store = ScenarioStore::new();
    for (name, entry) in named {
        let (inputs, saved_at) = match entry {
            ScenarioEntry::Saved(s) => (s.inputs, s.saved_at),
            ScenarioEntry::Inputs(inputs) => (inputs, now),
        };
        store.save(&name, inputs, saved_at)?;
    }
    Ok(store)
}

fn resolve_input(args: &Args) -> Result<InputRecord> {
    match (&args.scenarios, &args.scenario, &args.input) {
        (Some(path), Some(name), _) => {
            let store = load_store(path)?;
            let names: Vec<&str> = store.list().into_iter().map(|(n, _)| n).collect();
            info!(scenarios = ?names, "scenario file loaded");
            store
                .get(name)
                .map(|s| s.inputs.clone())
                .ok_or_else(|| anyhow!("no scenario named '{name}'"))
        }
        (Some(_), None, _) => bail!("--scenarios requires --scenario <name>"),
        (None, Some(_), _) => bail!("--scenario requires --scenarios <path>"),
        (None, None, Some(path)) => read_input(path),
        (None, None, None) => Ok(scenarios::reset_to_defaults()),
    }
}

fn cents(v: Decimal) -> Decimal {
    v.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Currency with comma thousands separators, e.g. `-$5,000.00`.
fn money(v: Decimal) -> String {
    let v = cents(v);
    let sign = if v < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", v.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let mut grouped = String::new();
    for (i, ch) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let whole: String = grouped.chars().rev().collect();
    format!("{sign}${whole}.{frac}")
}

fn roas(r: Ratio) -> String {
    match r {
        Ratio::Finite(v) => format!("{:.2}x", cents(v)),
        Ratio::Unbounded => "∞".to_string(),
    }
}

fn cpp(r: Ratio) -> String {
    match r {
        Ratio::Finite(v) => money(v),
        Ratio::Unbounded => "∞".to_string(),
    }
}

fn print_report(p: &Projection, a: &Assessment) {
    let o = &p.output;
    println!("Profit/Loss     : {} ({})", money(o.projected_profit), a.profit);
    println!("Revenue         : {}", money(o.projected_revenue));
    println!("Avg ticket price: {}", money(o.avg_ticket_price));
    println!("Fixed costs     : {}", money(o.total_fixed_costs));
    println!("Event costs     : {}", money(o.total_event_costs));
    println!("Break-even ROAS : {}", roas(o.breakeven_roas));
    match (o.current_roas, a.roas) {
        (Some(v), Some(verdict)) => {
            println!("Current ROAS    : {} ({})", roas(Ratio::Finite(v)), verdict)
        }
        _ => println!("Current ROAS    : N/A"),
    }
    println!("Break-even CPP  : {}", cpp(o.breakeven_cpp));
    match (o.current_cpp, a.cpp) {
        (Some(v), Some(verdict)) => println!("Current CPP     : {} ({})", money(v), verdict),
        _ => println!("Current CPP     : N/A"),
    }
    println!();
    println!("{:<12} {:<18} {:<15}", "Attendance", "Break-Even ROAS", "Break-Even CPP");
    for row in &p.thresholds {
        println!(
            "{:<12} {:<18} {:<15}",
            format!("{}%", row.attendance_level),
            roas(row.breakeven_roas),
            cpp(row.breakeven_cpp)
        );
    }
}

#[derive(Serialize)]
struct Report<'a> {
    projection: &'a Projection,
    assessment: &'a Assessment,
}

/// Log filter from a `RUST_LOG`-style directive, defaulting to `info`.
fn log_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> Result<()> {
    // Logging setup
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    if args.version {
        println!(
            "{} {} ({} {})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            env!("GIT_SHA"),
            env!("BUILD_DATE")
        );
        return Ok(());
    }
    info!(input = ?args.input, scenario = ?args.scenario, "starting CLI");

    let input = resolve_input(&args)?;
    let projection = event_econ::evaluate(&input).context("calculation error")?;
    let assessment = Assessment::from_output(&projection.output);

    if args.json {
        let report = Report {
            projection: &projection,
            assessment: &assessment,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&projection, &assessment);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../demos")
            .join(name)
    }

    #[test]
    fn formats_money_and_ratios() {
        assert_eq!(money(Decimal::new(-350_000, 2)), "-$3,500.00");
        assert_eq!(money(Decimal::new(5000, 0)), "$5,000.00");
        assert_eq!(money(Decimal::new(123_456_789, 1)), "$12,345,678.90");
        assert_eq!(money(Decimal::new(999, 0)), "$999.00");
        assert_eq!(money(Decimal::new(3125, 2)), "$31.25");
        assert_eq!(roas(Ratio::Unbounded), "∞");
        assert_eq!(cpp(Ratio::Finite(Decimal::new(75, 0))), "$75.00");
    }

    #[test]
    fn rounds_to_two_decimals() {
        let third = Ratio::of(Decimal::new(2500, 0), Decimal::new(6000, 0)).unwrap();
        assert_eq!(roas(third), "0.42x");
        let cpp_70 = Ratio::of(Decimal::new(6000, 0), Decimal::new(140, 0)).unwrap();
        assert_eq!(cpp(cpp_70), "$42.86");
        assert_eq!(money(Decimal::new(-12_345, 3)), "-$12.35");
    }

    #[test]
    fn reference_thresholds_render_rounded() {
        let input = read_input(&demo("reference.yaml")).unwrap();
        let rows = event_econ::threshold_table(&input).unwrap();
        let rendered: Vec<String> = rows.iter().map(|r| roas(r.breakeven_roas)).collect();
        assert_eq!(rendered[0], "0.42x");
        assert_eq!(cpp(rows[3].breakeven_cpp), "$42.86");
    }

    #[test]
    fn log_filter_honours_directive() {
        use tracing_subscriber::filter::LevelFilter;
        use tracing_subscriber::{Layer, Registry};
        let hint = |d: Option<&str>| Layer::<Registry>::max_level_hint(&log_filter(d));
        assert_eq!(hint(None), Some(LevelFilter::INFO));
        assert_eq!(hint(Some("error")), Some(LevelFilter::ERROR));
        assert_eq!(hint(Some("debug")), Some(LevelFilter::DEBUG));
        assert_eq!(hint(Some("event_econ=bogus")), Some(LevelFilter::INFO));
    }

    #[test]
    fn defaults_when_no_input_given() {
        let input = resolve_input(&Args::default()).unwrap();
        assert_eq!(input, InputRecord::default());
    }

    #[test]
    fn reads_reference_yaml() {
        let input = read_input(&demo("reference.yaml")).unwrap();
        let out = event_econ::calculate(&input).unwrap();
        assert_eq!(out.projected_revenue, Decimal::new(2500, 0));
    }

    #[test]
    fn resolves_named_scenario() {
        let args = Args {
            scenarios: Some(demo("scenarios.yaml")),
            scenario: Some("weekly-shows".into()),
            ..Args::default()
        };
        let input = resolve_input(&args).unwrap();
        assert_eq!(input.events_per_month, 4);
        let store = load_store(&demo("scenarios.yaml")).unwrap();
        let names: Vec<&str> = store.list().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["weekly-shows", "baseline"]);
        let missing = Args {
            scenario: Some("nope".into()),
            ..args
        };
        assert!(resolve_input(&missing).is_err());
    }
}
