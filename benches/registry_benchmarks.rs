//! Registry Benchmarks
//!
//! Lookup and enumeration cost as namespaces grow.

use catalogue::registry::{ExportTable, Key, ManifestPluginSource, Namespace, PluginRegistry, Registrant, Store};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

fn populated_namespace(size: usize) -> Namespace {
    let namespace = Namespace::new(["bench", "components"])
        .unwrap()
        .in_store(Store::new())
        .with_plugins(PluginRegistry::new(Arc::new(ManifestPluginSource::empty(
            ExportTable::new(),
        ))));
    for i in 0..size {
        namespace.register(&format!("component_{i}"), i).unwrap();
    }
    namespace
}

fn benchmark_register(c: &mut Criterion) {
    let namespace = populated_namespace(0);
    c.bench_function("namespace_register", |b| {
        b.iter(|| namespace.register(black_box("component"), black_box(1u64)))
    });
}

fn benchmark_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("namespace_get");
    for size in [10usize, 100, 1_000] {
        let namespace = populated_namespace(size);
        let name = format!("component_{}", size / 2);
        group.bench_with_input(BenchmarkId::from_parameter(size), &name, |b, name| {
            b.iter(|| namespace.get(black_box(name)))
        });
    }
    group.finish();
}

fn benchmark_get_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_get_all");
    for size in [10usize, 100, 1_000] {
        let namespace = populated_namespace(size);
        let prefix = Key::new(["bench"]).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &prefix, |b, prefix| {
            b.iter(|| namespace.store().get_all(black_box(prefix)))
        });
    }
    group.finish();
}

fn benchmark_entry_point_cache(c: &mut Criterion) {
    let exports = ExportTable::new();
    exports
        .export("bench.plugins:component", Registrant::new(1u32))
        .unwrap();
    let manifest = catalogue::registry::PluginManifest::from_toml_str(
        "[entry_points.bench_components]\ncomponent = \"bench.plugins:component\"\n",
    )
    .unwrap();
    let plugins = PluginRegistry::new(Arc::new(ManifestPluginSource::new(manifest, exports)));

    c.bench_function("plugin_load_named_cached", |b| {
        b.iter(|| plugins.load_named(black_box("bench_components"), black_box("component")))
    });
}

criterion_group!(
    benches,
    benchmark_register,
    benchmark_lookup,
    benchmark_get_all,
    benchmark_entry_point_cache
);
criterion_main!(benches);
