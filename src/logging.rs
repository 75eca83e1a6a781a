/// Initialize structured logging with tracing
/// This should be called once at application startup
pub fn init_logging() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr)
                .json() // JSON output for structured logging
        );

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        // A subscriber is already installed (tests, embedding host); keep it.
        eprintln!("[logging] tracing subscriber already set: {}", e);
        return;
    }

    tracing::info!("Structured logging initialized");
}

/// Record the outcome of a schedule generation run
pub fn log_schedule_generated(subjects: usize, placed: usize, requested: usize) {
    if placed < requested {
        tracing::warn!(
            subjects = subjects,
            placed = placed,
            dropped = requested - placed,
            "Adaptive schedule could not place every session"
        );
    } else {
        tracing::info!(subjects = subjects, placed = placed, "Adaptive schedule generated");
    }
}

/// Record a newly raised performance alert
pub fn log_alert_raised(kind: &str, subject_id: Option<&str>, severity: u8) {
    tracing::info!(
        alert_type = kind,
        subject_id = subject_id.unwrap_or("-"),
        severity = severity,
        "Performance alert raised"
    );
}

/// Record a write against an id that does not exist
pub fn log_not_found(kind: &str, id: &str) {
    tracing::warn!(kind = kind, id = id, "Record not found");
}
