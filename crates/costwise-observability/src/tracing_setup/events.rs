//! Structured log events for key engine operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log a completed estimate.
pub fn estimate_completed(region: &str, categories: usize, empty_categories: usize, confidence: f64) {
    tracing::info!(
        event = "estimate_completed",
        region = %region,
        categories = categories,
        empty_categories = empty_categories,
        confidence = confidence,
        "estimate completed"
    );
}

/// Log a category with no data points in a region.
pub fn coverage_gap_detected(region: &str, category: &str) {
    tracing::warn!(
        event = "coverage_gap_detected",
        region = %region,
        category = %category,
        "coverage gap detected"
    );
}

/// Log a Data Access Port failure that aborted a request.
pub fn data_access_failed(region: &str, error: &str) {
    tracing::error!(
        event = "data_access_failed",
        region = %region,
        error = %error,
        "data access failed"
    );
}

/// Log a retry of a transient port failure.
pub fn retry_attempted(operation: &str, attempt: u32, max_attempts: u32, error: &str) {
    tracing::warn!(
        event = "retry_attempted",
        operation = %operation,
        attempt = attempt,
        max_attempts = max_attempts,
        error = %error,
        "retrying data access"
    );
}
