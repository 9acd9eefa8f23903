use criterion::{black_box, criterion_group, criterion_main, Criterion};
use event_core::InputRecord;
use rust_decimal::Decimal;

fn build_input(events_per_month: u32) -> InputRecord {
    InputRecord {
        fixed_costs: Decimal::new(5000, 0),
        event_cost: Decimal::new(1000, 0),
        ticket_price_pre: Decimal::new(2500, 2),
        ticket_price_post: Decimal::new(4999, 2),
        sales_mix_pre: Decimal::new(675, 1),
        venue_capacity: 350,
        events_per_month,
        attendance_percentage: Decimal::new(62, 0),
        ad_spend: Decimal::new(1_250, 0),
        tickets_sold: 180,
    }
}

fn bench_evaluate(c: &mut Criterion) {
    let input = build_input(8);
    c.bench_function("evaluate single record", |b| {
        b.iter(|| black_box(event_econ::evaluate(black_box(&input))))
    });
    let batch: Vec<InputRecord> = (1..=30).map(build_input).collect();
    c.bench_function("threshold table x30 records", |b| {
        b.iter(|| {
            for input in &batch {
                let _ = black_box(event_econ::threshold_table(input));
            }
        })
    });
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
