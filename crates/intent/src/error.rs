use thiserror::Error;

use crate::plan::Plan;

/// Errors surfaced while interpreting a message.
///
/// There is deliberately no variant for "the model answered badly": a
/// completion that arrives is always decoded, and missing fields get
/// defaults. Only a completion that never arrives is an error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IntentError {
    /// Configuration is unusable (missing API key, bad temperature, ...).
    #[error("invalid intent config: {0}")]
    InvalidConfig(String),
    /// The request never produced an HTTP response (DNS, TLS, timeout, ...).
    #[error("completion transport failure: {0}")]
    Transport(String),
    /// The endpoint answered with a non-success status or a body without
    /// `choices[0].message.content`.
    #[error("upstream completion error: {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },
    /// The feature is not part of the customer's plan.
    #[error("{feature} is not available on the {plan} plan")]
    PlanRestricted { plan: Plan, feature: &'static str },
}

impl IntentError {
    pub fn is_upstream(&self) -> bool {
        matches!(self, IntentError::Upstream { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_display_carries_message() {
        let err = IntentError::Upstream {
            status: Some(429),
            message: "OpenAI API error: Rate limit reached".into(),
        };
        assert!(err.is_upstream());
        assert_eq!(
            err.to_string(),
            "upstream completion error: OpenAI API error: Rate limit reached"
        );
    }

    #[test]
    fn plan_restricted_names_plan() {
        let err = IntentError::PlanRestricted {
            plan: Plan::Pro,
            feature: "marketing messages",
        };
        assert!(!err.is_upstream());
        assert_eq!(err.to_string(), "marketing messages is not available on the pro plan");
    }

    #[test]
    fn errors_clone_and_compare() {
        let err = IntentError::Transport("connection refused".into());
        assert_eq!(err.clone(), err);
        assert!(format!("{err:?}").contains("Transport"));
    }
}
