use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static APPOINTMENTS_BOOKED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "salon_appointments_booked_total",
        "Total appointments successfully booked"
    )
    .expect("register appointments_booked_total")
});

pub static BOOKING_CONFLICTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "salon_booking_conflicts_total",
        "Total booking attempts rejected because of an overlapping appointment"
    )
    .expect("register booking_conflicts_total")
});

pub static APPOINTMENT_TRANSITIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "salon_appointment_transitions_total",
        "Appointment status transitions by target status",
        &["status"]
    )
    .expect("register appointment_transitions_total")
});

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_metrics_include_booking_counters() {
        APPOINTMENTS_BOOKED_TOTAL.inc();
        APPOINTMENT_TRANSITIONS_TOTAL.with_label_values(&["confirmed"]).inc();
        let (status, body) = encode_metrics();
        assert_eq!(status, axum::http::StatusCode::OK);
        assert!(body.contains("salon_appointments_booked_total"));
        assert!(body.contains("salon_appointment_transitions_total{status=\"confirmed\"}"));
    }
}
