//! Audit trail models.
//!
//! Calculators that make rule-based decisions record each decision as an
//! [`AuditStep`] so a statement's figures can be explained line by line.

use serde::{Deserialize, Serialize};

/// A single step in the audit trail recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_step_serialization() {
        let step = AuditStep {
            step_number: 1,
            rule_id: "national_pension".to_string(),
            rule_name: "National Pension".to_string(),
            input: serde_json::json!({"taxable_amount": 3000000}),
            output: serde_json::json!({"amount": 135000}),
            reasoning: "3000000 x 0.045 = 135000".to_string(),
        };

        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains("\"step_number\":1"));
        assert!(json.contains("\"rule_id\":\"national_pension\""));
        assert!(json.contains("\"amount\":135000"));
    }
}
