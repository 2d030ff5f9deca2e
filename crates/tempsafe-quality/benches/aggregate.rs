use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempsafe_core::{GoodsType, LocationFilter, Period, Reading, ReadingCategory};
use tempsafe_quality::{ComplianceAggregator, ComplianceProfile};

fn month_of_readings() -> Vec<Reading> {
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).unwrap();
    let locations = ["kitchen", "bar", "deli", "store"];
    let mut readings = Vec::new();
    for i in 0..10_000i64 {
        let at = start + Duration::minutes(i * 4);
        let location = locations[(i % 4) as usize];
        let wobble = (i % 13) as f64 * 0.5;
        let reading = match i % 6 {
            0 => Reading::new(ReadingCategory::Fridge, 1.0 + wobble, at, location, "bench"),
            1 => Reading::new(ReadingCategory::Freezer, -21.0 + wobble, at, location, "bench"),
            2 => Reading::new(ReadingCategory::FoodHot, 58.0 + wobble, at, location, "bench"),
            3 => Reading::new(ReadingCategory::FoodCold, 2.0 + wobble, at, location, "bench"),
            4 => Reading::delivery(GoodsType::Chilled, 1.0 + wobble, at, location, "bench"),
            _ => Reading::cooling_curve(18.0 + wobble, 3.0 + wobble, at, location, "bench"),
        };
        readings.push(reading);
    }
    readings
}

fn bench_aggregate(c: &mut Criterion) {
    let readings = month_of_readings();
    let period = Period::new(
        Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 5, 31, 23, 59, 59).unwrap(),
    )
    .unwrap();
    let aggregator = ComplianceAggregator::new(ComplianceProfile::standard());

    c.bench_function("quality.aggregate.all_locations", |b| {
        b.iter(|| aggregator.aggregate(black_box(&readings), &period, &LocationFilter::All))
    });

    let kitchen = LocationFilter::location("kitchen");
    c.bench_function("quality.aggregate.one_location", |b| {
        b.iter(|| aggregator.aggregate(black_box(&readings), &period, &kitchen))
    });
}

criterion_group!(benches, bench_aggregate);
criterion_main!(benches);
