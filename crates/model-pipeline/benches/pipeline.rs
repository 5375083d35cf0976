use criterion::{black_box, criterion_group, criterion_main, Criterion};
use model_pipeline::{ClassifierConfig, ModelPipeline};
use passenger_data::{synthetic_manifest, titanic_preprocessor, to_table};

fn bench_fit(c: &mut Criterion) {
    let data = synthetic_manifest(891, 42);
    let table = to_table(data.records()).unwrap();

    c.bench_function("pipeline_fit_891", |b| {
        b.iter(|| {
            let mut pipeline =
                ModelPipeline::new(titanic_preprocessor().unwrap(), ClassifierConfig::default());
            pipeline.fit(black_box(&table), data.labels()).unwrap();
        })
    });
}

fn bench_predict(c: &mut Criterion) {
    let data = synthetic_manifest(891, 42);
    let mut pipeline = ModelPipeline::new(titanic_preprocessor().unwrap(), ClassifierConfig::default());
    pipeline.fit(&to_table(data.records()).unwrap(), data.labels()).unwrap();

    let single = to_table(&data.records()[..1]).unwrap();
    c.bench_function("pipeline_predict_single", |b| {
        b.iter(|| pipeline.predict(black_box(&single)).unwrap())
    });
}

criterion_group!(benches, bench_fit, bench_predict);
criterion_main!(benches);
