//! Structured logging utilities.
//!
//! Provides a log context carrying the aggregation cycle id and, inside a
//! collection task, the domain it runs on.

use std::fmt;

use uuid::Uuid;

/// Logging context for one aggregation cycle.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub cycle_id: String,
    pub domain: Option<String>,
}

impl LogContext {
    pub fn new(cycle_id: &str) -> Self {
        Self {
            cycle_id: cycle_id.to_string(),
            domain: None,
        }
    }

    /// Context for a freshly started cycle with a random id.
    pub fn new_cycle() -> Self {
        Self::new(&format!("cycle-{}", &Uuid::new_v4().to_string()[..8]))
    }

    pub fn with_domain(&self, domain: &str) -> Self {
        Self {
            cycle_id: self.cycle_id.clone(),
            domain: Some(domain.to_string()),
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.domain {
            Some(domain) => write!(f, "[cycle={}] [domain={}]", self.cycle_id, domain),
            None => write!(f, "[cycle={}]", self.cycle_id),
        }
    }
}
