use criterion::{criterion_group, criterion_main, Criterion};
use localair::{concat_fragments, AirFrameExt, PollutantFilter};
use polars::prelude::*;

fn synthetic_year(code: &str) -> DataFrame {
    let hours = 24 * 365;
    let dates: Vec<String> = (0..hours).map(|h| format!("2018-01-01 {:02}:00:00", h % 24)).collect();
    let no2: Vec<f64> = (0..hours).map(|h| 10.0 + (h % 40) as f64).collect();
    let so2: Vec<f64> = (0..hours).map(|h| 1.0 + (h % 7) as f64).collect();
    let pm10: Vec<f64> = (0..hours).map(|h| 5.0 + (h % 25) as f64).collect();
    let codes: Vec<&str> = (0..hours).map(|_| code).collect();
    df!(
        "date" => dates,
        "no2" => no2,
        "so2" => so2,
        "pm10" => pm10,
        "code" => codes,
    )
    .unwrap()
}

fn bench_combine(c: &mut Criterion) {
    let fragments: Vec<DataFrame> = ["AD1", "CI1", "MY7"]
        .iter()
        .map(|code| synthetic_year(code))
        .collect();
    c.bench_function("concat three site years", |b| {
        b.iter(|| concat_fragments(fragments.clone()).unwrap())
    });
}

fn bench_reshape(c: &mut Criterion) {
    let combined = concat_fragments(
        ["AD1", "CI1", "MY7"]
            .iter()
            .map(|code| synthetic_year(code))
            .collect(),
    )
    .unwrap();

    c.bench_function("filter one pollutant", |b| {
        b.iter(|| {
            combined
                .clone()
                .filter_pollutants(&PollutantFilter::codes(["no2"]), false)
                .unwrap()
        })
    });
    c.bench_function("wide to narrow", |b| {
        b.iter(|| combined.clone().to_narrow().unwrap())
    });
}

criterion_group!(benches, bench_combine, bench_reshape);
criterion_main!(benches);
