//! Filter -> group -> view throughput over a synthetic encounter table.

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use healthcare_analytics::config::DashboardConfig;
use healthcare_analytics::dashboard::{Choice, Dashboard, FilterSelection, View};
use healthcare_analytics::healthcare::{self, BILLING_AMOUNT, GENDER, HOSPITAL};
use healthcare_analytics::processing::{group_by, FilterSpec, GroupBy, GroupOrder, KeySpec, ReduceOp};
use healthcare_analytics::types::{DataSet, Value};

const GENDERS: [&str; 2] = ["Female", "Male"];
const CONDITIONS: [&str; 6] = ["Arthritis", "Asthma", "Cancer", "Diabetes", "Hypertension", "Obesity"];
const HOSPITALS: [&str; 5] = ["Mercy", "General", "St. Luke", "Riverside", "Northview"];
const INSURERS: [&str; 4] = ["Aetna", "Blue Cross", "Cigna", "Medicare"];

fn synthetic_encounters(n: usize) -> DataSet {
    let base = NaiveDate::from_ymd_opt(2019, 1, 1).expect("valid date");
    let rows = (0..n)
        .map(|i| {
            let admitted = base + chrono::Duration::days((i % 1800) as i64);
            let stay = (i % 30) as i64 + 1;
            vec![
                format!("patient {i}").into(),
                Value::Int64((i % 90) as i64 + 5),
                GENDERS[i % GENDERS.len()].into(),
                "O+".into(),
                CONDITIONS[i % CONDITIONS.len()].into(),
                Value::Date(admitted),
                Value::Date(admitted + chrono::Duration::days(stay)),
                HOSPITALS[i % HOSPITALS.len()].into(),
                INSURERS[i % INSURERS.len()].into(),
                Value::Float64(1000.0 + (i % 500) as f64 * 7.5),
                Value::Int64(stay),
                Value::Null,
                Value::Int64((i % 400) as i64 + 100),
            ]
        })
        .collect();
    DataSet::new(healthcare::schema(), rows)
}

fn bench_pipeline(c: &mut Criterion) {
    let ds = synthetic_encounters(50_000);
    let mut group = c.benchmark_group("pipeline");

    group.bench_function("filter_then_group", |b| {
        let spec = FilterSpec::new().equals(GENDER, "Female");
        let by_hospital = GroupBy::aggregate(KeySpec::column(HOSPITAL), ReduceOp::Sum, BILLING_AMOUNT)
            .order(GroupOrder::ValueDescending);
        b.iter(|| {
            let subset = spec.apply(black_box(&ds)).expect("known columns");
            black_box(group_by(&subset, &by_hospital).expect("valid grouping"))
        })
    });

    let dashboard = Dashboard::new(ds, DashboardConfig::default());
    let selection = FilterSelection {
        gender: Choice::Only("Male".to_string()),
        ..FilterSelection::default()
    };
    for view in View::ALL {
        group.bench_function(format!("render_{view}"), |b| {
            b.iter(|| black_box(dashboard.render(view, &selection).expect("render")))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
