// 📝 Logging - severity-tagged events on top of `tracing`
//
// Every batch message goes through `log(Severity, message)`.
// Rendering (colour, JSON, filtering) belongs to the subscriber installed by the binary.

use std::fmt::Display;
use std::io::IsTerminal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// ============================================================================
// SEVERITY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Progress messages
    Info,

    /// Account skipped, nothing was changed
    Warning,

    /// Store mutated or account registered
    Success,

    /// Something failed (the batch still continues)
    Error,

    /// Per-account stats line (ref code, points)
    Custom,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Custom => "custom",
        }
    }
}

/// Emit one batch message at the given severity.
///
/// Success and Custom are INFO-level events; the `severity` field keeps them apart.
pub fn log(severity: Severity, message: impl Display) {
    let tag = severity.as_str();
    match severity {
        Severity::Info | Severity::Success | Severity::Custom => {
            tracing::info!(severity = tag, "{}", message)
        }
        Severity::Warning => tracing::warn!(severity = tag, "{}", message),
        Severity::Error => tracing::error!(severity = tag, "{}", message),
    }
}

/// Install the global subscriber for a batch binary.
///
/// `RUST_LOG` overrides the default `info` filter. ANSI colour only when stdout is a terminal.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(std::io::stdout().is_terminal()),
        )
        .init();
}
