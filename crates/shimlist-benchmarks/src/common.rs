//! Common utilities for benchmarks

use criterion::Criterion;
use pprof::criterion::{Output, PProfProfiler};
use serde_json::{json, Value};

/// Configure criterion with flamegraph profiling support
pub fn criterion_config() -> Criterion {
    Criterion::default()
        .warm_up_time(std::time::Duration::from_secs(3))
        .measurement_time(std::time::Duration::from_secs(10))
        .sample_size(100)
        .with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
}

/// Requests of increasing cost against the bundled registry
pub fn sample_requests() -> Vec<(&'static str, Value)> {
    vec![
        ("single_literal", json!({ "modules": "es.map", "targets": { "chrome": 40 } })),
        (
            "math_group",
            json!({ "modules": "core-js/es/math", "targets": { "chrome": 40, "firefox": 27 } }),
        ),
        (
            "mixed_selectors",
            json!({
                "modules": ["core-js/es/math", "es.array.at", "/^es\\.reflect/"],
                "exclude": ["es.reflect.prevent-extensions"],
                "targets": "firefox 27"
            }),
        ),
        ("everything_esmodules", json!({ "targets": { "esmodules": true } })),
        (
            "everything_inverse",
            json!({ "targets": "chrome 61, safari 10.1, ios_saf 10.3", "inverse": true }),
        ),
    ]
}
