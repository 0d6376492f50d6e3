//! Statutory deduction calculation.
//!
//! Computes the employee-side social insurance premiums and the withheld
//! income taxes for one month's taxable pay. Income tax uses a bracket
//! approximation for a single dependent; it is not the official withholding
//! table.

use rust_decimal::Decimal;

use crate::config::{IncomeTaxBracket, StatutoryRates};
use crate::models::{AuditStep, DeductionResult, EnrollmentFlags};

use super::rounding::apply_rate;

/// The result of a deduction calculation, including the audit trail.
#[derive(Debug, Clone)]
pub struct DeductionCalculation {
    /// The taxable amount used, after clamping negatives to zero.
    pub taxable_amount: i64,
    /// The computed deductions.
    pub deductions: DeductionResult,
    /// One step per deduction, in statement order.
    pub audit_steps: Vec<AuditStep>,
}

/// Calculates the statutory deductions for a monthly taxable amount.
///
/// Each insurance premium is only charged when the matching enrollment flag
/// is set; long-term care follows the health insurance flag. Workers'
/// compensation is employer-borne and never produces a deduction. Income
/// taxes apply regardless of enrollment.
///
/// # Arguments
///
/// * `taxable_amount` - Monthly pay less included nontaxable allowances
/// * `enrollment` - Social insurance enrollment from the contract header
/// * `rates` - The statutory rate table for the payroll year
/// * `step_number` - The step number of the first audit step
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_deductions;
/// use payroll_engine::config::StatutoryRates;
/// use payroll_engine::models::EnrollmentFlags;
///
/// let result = calculate_deductions(3_000_000, &EnrollmentFlags::all(), &StatutoryRates::default(), 1);
/// assert_eq!(result.deductions.national_pension, 135_000);
/// assert_eq!(result.deductions.income_tax, 251_400);
/// assert_eq!(result.audit_steps.len(), 6);
/// ```
pub fn calculate_deductions(
    taxable_amount: i64,
    enrollment: &EnrollmentFlags,
    rates: &StatutoryRates,
    step_number: u32,
) -> DeductionCalculation {
    let taxable = taxable_amount.max(0);
    let mut audit_steps = Vec::with_capacity(6);
    let mut step = step_number;
    let mut next_step = || {
        let current = step;
        step += 1;
        current
    };

    let national_pension = gated_premium(
        next_step(),
        "national_pension",
        "National Pension",
        taxable,
        rates.national_pension_rate,
        enrollment.national_pension,
        &mut audit_steps,
    );

    let health_insurance = gated_premium(
        next_step(),
        "health_insurance",
        "Health Insurance",
        taxable,
        rates.health_insurance_rate,
        enrollment.health_insurance,
        &mut audit_steps,
    );

    let long_term_care = gated_premium(
        next_step(),
        "long_term_care",
        "Long-Term Care Insurance",
        health_insurance,
        rates.long_term_care_rate,
        enrollment.health_insurance,
        &mut audit_steps,
    );

    let employment_insurance = gated_premium(
        next_step(),
        "employment_insurance",
        "Employment Insurance",
        taxable,
        rates.employment_insurance_rate,
        enrollment.employment_insurance,
        &mut audit_steps,
    );

    let bracket = find_bracket(taxable, &rates.income_tax_brackets);
    let income_tax = bracket.map_or(0, |b| bracket_tax(taxable, b));
    audit_steps.push(AuditStep {
        step_number: next_step(),
        rule_id: "income_tax".to_string(),
        rule_name: "Income Tax (approximation)".to_string(),
        input: serde_json::json!({
            "taxable_amount": taxable,
            "bracket_lower_bound": bracket.map(|b| b.lower_bound),
            "bracket_upper_bound": bracket.and_then(|b| b.upper_bound),
        }),
        output: serde_json::json!({ "amount": income_tax }),
        reasoning: match bracket {
            Some(b) => format!(
                "{} + ({} - {}) x {} = {}",
                b.base_tax,
                taxable,
                b.lower_bound,
                b.rate.normalize(),
                income_tax
            ),
            None => "No income tax bracket configured".to_string(),
        },
    });

    let local_income_tax = apply_rate(income_tax, rates.local_income_tax_rate);
    audit_steps.push(AuditStep {
        step_number: next_step(),
        rule_id: "local_income_tax".to_string(),
        rule_name: "Local Income Tax".to_string(),
        input: serde_json::json!({ "income_tax": income_tax }),
        output: serde_json::json!({ "amount": local_income_tax }),
        reasoning: format!(
            "{} x {} = {}",
            income_tax,
            rates.local_income_tax_rate.normalize(),
            local_income_tax
        ),
    });

    DeductionCalculation {
        taxable_amount: taxable,
        deductions: DeductionResult {
            national_pension,
            health_insurance,
            long_term_care,
            employment_insurance,
            income_tax,
            local_income_tax,
        },
        audit_steps,
    }
}

/// Approximate monthly income tax for a taxable amount.
///
/// ```
/// use payroll_engine::calculation::income_tax;
/// use payroll_engine::config::StatutoryRates;
///
/// let rates = StatutoryRates::default();
/// assert_eq!(income_tax(1_060_000, &rates), 0);
/// assert_eq!(income_tax(3_000_000, &rates), 251_400);
/// ```
pub fn income_tax(taxable_amount: i64, rates: &StatutoryRates) -> i64 {
    let taxable = taxable_amount.max(0);
    find_bracket(taxable, &rates.income_tax_brackets).map_or(0, |b| bracket_tax(taxable, b))
}

/// Local income tax: a fixed share of income tax.
pub fn local_income_tax(income_tax: i64, rates: &StatutoryRates) -> i64 {
    apply_rate(income_tax.max(0), rates.local_income_tax_rate)
}

fn find_bracket(taxable: i64, brackets: &[IncomeTaxBracket]) -> Option<&IncomeTaxBracket> {
    brackets
        .iter()
        .find(|b| b.upper_bound.is_none_or(|upper| taxable <= upper))
}

fn bracket_tax(taxable: i64, bracket: &IncomeTaxBracket) -> i64 {
    let over = taxable.saturating_sub(bracket.lower_bound).max(0);
    bracket.base_tax.saturating_add(apply_rate(over, bracket.rate))
}

fn gated_premium(
    step_number: u32,
    rule_id: &str,
    rule_name: &str,
    base: i64,
    rate: Decimal,
    enrolled: bool,
    audit_steps: &mut Vec<AuditStep>,
) -> i64 {
    let amount = if enrolled { apply_rate(base, rate) } else { 0 };

    audit_steps.push(AuditStep {
        step_number,
        rule_id: rule_id.to_string(),
        rule_name: rule_name.to_string(),
        input: serde_json::json!({
            "base_amount": base,
            "rate": rate.normalize().to_string(),
            "enrolled": enrolled,
        }),
        output: serde_json::json!({ "amount": amount }),
        reasoning: if enrolled {
            format!("{} x {} = {}", base, rate.normalize(), amount)
        } else {
            "Not enrolled - no deduction".to_string()
        },
    });

    amount
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> StatutoryRates {
        StatutoryRates::default()
    }

    #[test]
    fn test_all_enrolled_at_three_million() {
        let result = calculate_deductions(3_000_000, &EnrollmentFlags::all(), &rates(), 1);
        let d = result.deductions;

        assert_eq!(d.national_pension, 135_000);
        assert_eq!(d.health_insurance, 106_350);
        assert_eq!(d.long_term_care, 13_623);
        assert_eq!(d.employment_insurance, 27_000);
        assert_eq!(d.income_tax, 251_400);
        assert_eq!(d.local_income_tax, 25_140);
        assert_eq!(d.total(), 558_513);
    }

    #[test]
    fn test_enrollment_gates_each_premium() {
        let flags = EnrollmentFlags {
            national_pension: false,
            health_insurance: false,
            employment_insurance: true,
            workers_compensation: true,
        };
        let d = calculate_deductions(3_000_000, &flags, &rates(), 1).deductions;

        assert_eq!(d.national_pension, 0);
        assert_eq!(d.health_insurance, 0);
        assert_eq!(d.long_term_care, 0);
        assert_eq!(d.employment_insurance, 27_000);
        // income taxes ignore enrollment
        assert_eq!(d.income_tax, 251_400);
    }

    #[test]
    fn test_workers_compensation_never_deducts() {
        let only_workers_comp = EnrollmentFlags {
            workers_compensation: true,
            ..EnrollmentFlags::default()
        };
        let with = calculate_deductions(2_500_000, &only_workers_comp, &rates(), 1);
        let without = calculate_deductions(2_500_000, &EnrollmentFlags::default(), &rates(), 1);

        assert_eq!(with.deductions, without.deductions);
    }

    #[test]
    fn test_negative_taxable_clamped_to_zero() {
        let result = calculate_deductions(-50_000, &EnrollmentFlags::all(), &rates(), 1);

        assert_eq!(result.taxable_amount, 0);
        assert_eq!(result.deductions.total(), 0);
    }

    #[test]
    fn test_income_tax_brackets() {
        let rates = rates();

        assert_eq!(income_tax(0, &rates), 0);
        assert_eq!(income_tax(1_060_000, &rates), 0);
        // (1,060,001 - 1,060,000) * 0.06 = 0.06
        assert_eq!(income_tax(1_060_001, &rates), 0);
        assert_eq!(income_tax(1_500_000, &rates), 26_400);
        assert_eq!(income_tax(2_000_000, &rates), 101_400);
        assert_eq!(income_tax(4_500_000, &rates), 611_400);
        assert_eq!(income_tax(8_700_000, &rates), 2_081_400);
        assert_eq!(income_tax(10_000_000, &rates), 2_575_400);
    }

    #[test]
    fn test_income_tax_rounds_half_away_from_zero() {
        // (1,060,025 - 1,060,000) * 0.06 = 1.5
        assert_eq!(income_tax(1_060_025, &rates()), 2);
    }

    #[test]
    fn test_local_income_tax_is_ten_percent() {
        let rates = rates();
        assert_eq!(local_income_tax(251_400, &rates), 25_140);
        assert_eq!(local_income_tax(15, &rates), 2);
    }

    #[test]
    fn test_income_tax_without_brackets_is_zero() {
        let mut rates = rates();
        rates.income_tax_brackets.clear();
        assert_eq!(income_tax(5_000_000, &rates), 0);
    }

    #[test]
    fn test_audit_steps_are_sequential() {
        let result = calculate_deductions(3_000_000, &EnrollmentFlags::all(), &rates(), 5);
        let numbers: Vec<u32> = result.audit_steps.iter().map(|s| s.step_number).collect();
        let rule_ids: Vec<&str> = result
            .audit_steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();

        assert_eq!(numbers, vec![5, 6, 7, 8, 9, 10]);
        assert_eq!(
            rule_ids,
            vec![
                "national_pension",
                "health_insurance",
                "long_term_care",
                "employment_insurance",
                "income_tax",
                "local_income_tax",
            ]
        );
        assert_eq!(result.audit_steps[0].reasoning, "3000000 x 0.045 = 135000");
    }

    #[test]
    fn test_not_enrolled_step_reasoning() {
        let result = calculate_deductions(1_000_000, &EnrollmentFlags::default(), &rates(), 1);
        assert_eq!(result.audit_steps[0].reasoning, "Not enrolled - no deduction");
        assert_eq!(result.audit_steps[0].input["enrolled"], false);
    }

    #[test]
    fn test_extreme_taxable_amount_saturates() {
        let result = calculate_deductions(i64::MAX, &EnrollmentFlags::all(), &rates(), 1);

        assert!(result.deductions.income_tax > 0);
        assert!(result.deductions.total() > 0);
        assert_eq!(result.audit_steps.len(), 6);
    }
}
