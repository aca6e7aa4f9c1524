use actix_web::{HttpResponse, Responder};
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, TextEncoder};

/// Handler that serialises Prometheus metrics in text format.
pub async fn metrics_handler() -> impl Responder {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => HttpResponse::Ok()
            .content_type(encoder.format_type())
            .body(buffer),
        Err(err) => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

fn register_counter(name: &str, help: &str) -> IntCounter {
    let counter = IntCounter::new(name, help).expect("hardcoded counter name is invalid - fix source code");
    // Registration fails only on duplicate names; the counter still works
    let _ = prometheus::default_registry().register(Box::new(counter.clone()));
    counter
}

pub static TOKENS_ISSUED: Lazy<IntCounter> =
    Lazy::new(|| register_counter("tokens_issued_total", "Token pairs issued to new sessions"));

pub static TOKENS_ROTATED: Lazy<IntCounter> =
    Lazy::new(|| register_counter("tokens_rotated_total", "Successful refresh rotations"));

pub static ROTATIONS_REJECTED: Lazy<IntCounter> = Lazy::new(|| {
    register_counter(
        "rotations_rejected_total",
        "Refresh attempts rejected (no matching or already consumed record)",
    )
});

pub static IP_ANOMALIES: Lazy<IntCounter> = Lazy::new(|| {
    register_counter(
        "ip_anomalies_total",
        "Refresh requests arriving from a changed network address",
    )
});
