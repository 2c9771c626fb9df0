use thiserror::Error;

/// Engine-level error type.
///
/// Per-skill `NotFound` is recovered locally by callers (an unrecognized
/// skill becomes a warning, never an aborted evaluation). `InvalidWeights`
/// and `CyclicDependency` are caller configuration/data errors and surface
/// immediately. `UpstreamTimeout` triggers the documented relevance fallback
/// and is recorded on the breakdown as a warning.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Score weights must sum to 100, got {sum}")]
    InvalidWeights { sum: u32 },

    #[error("Prerequisite cycle: {}", .0.join(" -> "))]
    CyclicDependency(Vec<String>),

    #[error("Upstream call to {service} exceeded {timeout_ms}ms")]
    UpstreamTimeout {
        service: &'static str,
        timeout_ms: u64,
    },

    #[error("Upstream error from {service}: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    #[error("Ingest error: {0}")]
    Ingest(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cyclic_dependency_message_lists_members() {
        let err = EngineError::CyclicDependency(vec![
            "machine_learning".to_string(),
            "deep_learning".to_string(),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("machine_learning -> deep_learning"), "{msg}");
    }

    #[test]
    fn test_invalid_weights_message_carries_sum() {
        let err = EngineError::InvalidWeights { sum: 90 };
        assert!(err.to_string().contains("90"));
    }
}
