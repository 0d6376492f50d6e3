//! Contract compensation profile construction and validation.
//!
//! A profile is built from the wage calculator's output and specialized by
//! pay structure:
//!
//! - Inclusive annual contracts fold the four premiums into fixed monthly pay.
//! - Non-inclusive annual contracts keep base pay fixed and settle premiums
//!   each period from attendance at the supplemental rates.
//! - Part-time contracts have no fixed pay, only weekday, overtime and
//!   holiday rates plus any recurring bonuses.

use crate::config::StatutoryRates;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    BonusLine, CompensationBreakdown, ContractCompensationProfile, EmploymentContract,
    EnrollmentFlags, LookupOutcome, NontaxableAllowances, PayStructure, PaymentCode,
    PremiumAmounts, SupplementalRateOverrides, SupplementalRates, WageInputs,
};

use super::deductions::{DeductionCalculation, calculate_deductions};
use super::rounding::sum_won;
use super::selection::select_previous_contract;
use super::wage_converter::derive_supplemental_rates;

/// Builds a compensation profile for a pay structure.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{build_profile, convert_wages};
/// use payroll_engine::models::{PayStructure, SupplementalRateOverrides, WageInputs};
///
/// let inputs = WageInputs::reset(10_030);
/// let breakdown = convert_wages(&inputs, Some(10_030));
/// let profile = build_profile(
///     PayStructure::NonInclusiveAnnual,
///     &inputs,
///     &breakdown,
///     SupplementalRateOverrides::default(),
///     vec![],
/// );
///
/// assert_eq!(profile.basic_amount, Some(2_096_270));
/// assert_eq!(profile.supplemental_rates.unwrap().overtime, 15_045);
/// assert!(profile.premiums.is_none());
/// ```
pub fn build_profile(
    pay_structure: PayStructure,
    inputs: &WageInputs,
    breakdown: &CompensationBreakdown,
    rate_overrides: SupplementalRateOverrides,
    bonuses: Vec<BonusLine>,
) -> ContractCompensationProfile {
    let hourly_wage = inputs.hourly_wage.max(0);

    match pay_structure {
        PayStructure::InclusiveAnnual => ContractCompensationProfile {
            pay_structure,
            hourly_wage,
            breakdown: Some(breakdown.clone()),
            basic_amount: Some(breakdown.monthly_basic_amount),
            premiums: Some(PremiumAmounts {
                overtime: breakdown.monthly_overtime_amount,
                night: breakdown.monthly_night_amount,
                holiday: breakdown.monthly_holiday_amount,
                extra_holiday: breakdown.monthly_extra_holiday_amount,
            }),
            allowances: inputs.allowances,
            supplemental_rates: None,
            rate_overrides: SupplementalRateOverrides::default(),
            bonuses: reindex_bonuses(bonuses),
        },
        PayStructure::NonInclusiveAnnual => ContractCompensationProfile {
            pay_structure,
            hourly_wage,
            breakdown: Some(breakdown.clone()),
            basic_amount: Some(breakdown.monthly_basic_amount),
            premiums: None,
            allowances: inputs.allowances,
            supplemental_rates: Some(supplemental_rates_for(
                pay_structure,
                hourly_wage,
                &rate_overrides,
            )),
            rate_overrides,
            bonuses: reindex_bonuses(bonuses),
        },
        PayStructure::PartTime => ContractCompensationProfile {
            pay_structure,
            hourly_wage,
            breakdown: None,
            basic_amount: None,
            premiums: None,
            allowances: NontaxableAllowances::none(),
            supplemental_rates: Some(supplemental_rates_for(
                pay_structure,
                hourly_wage,
                &rate_overrides,
            )),
            rate_overrides,
            bonuses: reindex_bonuses(bonuses),
        },
    }
}

/// Supplemental rates for a rate-bearing pay structure.
///
/// Part-time contracts have no night rate.
fn supplemental_rates_for(
    pay_structure: PayStructure,
    hourly_wage: i64,
    overrides: &SupplementalRateOverrides,
) -> SupplementalRates {
    let mut rates = derive_supplemental_rates(hourly_wage, overrides);
    if pay_structure == PayStructure::PartTime {
        rates.night = 0;
    }
    rates
}

fn reindex_bonuses(mut bonuses: Vec<BonusLine>) -> Vec<BonusLine> {
    for (index, bonus) in bonuses.iter_mut().enumerate() {
        bonus.order = index as u32 + 1;
    }
    bonuses
}

/// Updates the hourly wage and re-derives supplemental rates.
///
/// Rates with a nonzero override keep the override.
pub fn apply_hourly_wage(profile: &mut ContractCompensationProfile, hourly_wage: i64) {
    profile.hourly_wage = hourly_wage.max(0);
    if profile.pay_structure.uses_supplemental_rates() {
        profile.supplemental_rates = Some(supplemental_rates_for(
            profile.pay_structure,
            profile.hourly_wage,
            &profile.rate_overrides,
        ));
    }
}

/// Checks a profile before it is saved with its contract.
///
/// Part-time profiles need a positive weekday rate, and every bonus line
/// must carry a positive amount.
pub fn validate_profile(profile: &ContractCompensationProfile) -> EngineResult<()> {
    if profile.pay_structure == PayStructure::PartTime {
        let weekday = profile.supplemental_rates.map_or(0, |r| r.weekday);
        if weekday <= 0 {
            return Err(EngineError::InvalidSupplementalRate {
                message: format!(
                    "part-time weekday rate must be greater than zero, got {}",
                    weekday
                ),
            });
        }
    }

    validate_bonuses(&profile.bonuses)
}

/// Rejects any bonus line whose amount is not positive.
pub fn validate_bonuses(bonuses: &[BonusLine]) -> EngineResult<()> {
    match bonuses.iter().find(|b| b.amount <= 0) {
        Some(bonus) => Err(EngineError::NonPositiveBonus {
            category: bonus.category.clone(),
            amount: bonus.amount,
        }),
        None => Ok(()),
    }
}

/// Copies the compensation profile of the employee's most recent previous
/// contract into `contract`.
///
/// Only compensation travels: the header (dates, attachments, enrollment,
/// salary timing) is left untouched. Without a previous contract the target
/// is unchanged and [`LookupOutcome::NotFound`] is returned.
pub fn load_previous_compensation(
    contract: &mut EmploymentContract,
    previous_contracts: &[EmploymentContract],
) -> LookupOutcome {
    match select_previous_contract(
        previous_contracts,
        &contract.header.employee_id,
        &contract.header.contract_id,
    ) {
        Some(previous) => {
            contract.compensation = previous.compensation.clone();
            LookupOutcome::Applied
        }
        None => LookupOutcome::NotFound,
    }
}

/// The payment lines a profile fixes, in statement order.
///
/// Premiums of non-inclusive contracts and part-time hourly pay come from
/// attendance and are not listed. Excluded allowances are listed as zero.
pub fn payment_fields(profile: &ContractCompensationProfile) -> Vec<(PaymentCode, i64)> {
    let mut fields = Vec::new();

    if let Some(basic) = profile.basic_amount {
        fields.push((PaymentCode::BaseSalary, basic));
    }

    if let Some(premiums) = profile.premiums {
        fields.push((PaymentCode::Overtime, premiums.overtime));
        fields.push((PaymentCode::Night, premiums.night));
        fields.push((PaymentCode::Holiday, premiums.holiday));
        fields.push((PaymentCode::ExtraHoliday, premiums.extra_holiday));
    }

    if profile.pay_structure != PayStructure::PartTime {
        let allowances = &profile.allowances;
        fields.push((PaymentCode::MealAllowance, allowances.meal.effective_amount()));
        fields.push((PaymentCode::CarAllowance, allowances.car.effective_amount()));
        fields.push((
            PaymentCode::ChildcareAllowance,
            allowances.childcare.effective_amount(),
        ));
    }

    fields
}

/// Fixed monthly pay of a profile, bonuses included.
pub fn monthly_total(profile: &ContractCompensationProfile) -> i64 {
    sum_won(
        payment_fields(profile)
            .into_iter()
            .map(|(_, amount)| amount)
            .chain(profile.bonuses.iter().map(|b| b.amount.max(0))),
    )
}

/// Monthly pay less included nontaxable allowances.
pub fn taxable_amount(profile: &ContractCompensationProfile) -> i64 {
    let nontaxable = sum_won(
        payment_fields(profile)
            .into_iter()
            .filter(|(code, _)| code.is_nontaxable())
            .map(|(_, amount)| amount),
    );
    monthly_total(profile).saturating_sub(nontaxable).max(0)
}

/// Estimates the statutory deductions for a profile's fixed monthly pay.
pub fn estimate_deductions(
    profile: &ContractCompensationProfile,
    enrollment: &EnrollmentFlags,
    rates: &StatutoryRates,
) -> DeductionCalculation {
    calculate_deductions(taxable_amount(profile), enrollment, rates, 1)
}
