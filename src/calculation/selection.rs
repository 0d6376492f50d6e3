//! Deterministic "most recent record" selection.
//!
//! When two records share the same date the one with the greater
//! identifier wins, so repeated lookups always pick the same record.

use crate::models::{EmploymentContract, PayrollStatement, StatementStatus, YearMonth};

/// Returns the record with the greatest `(date, id)` key.
pub fn most_recent<'a, T, D, I, F>(records: impl IntoIterator<Item = &'a T>, key: F) -> Option<&'a T>
where
    T: 'a,
    D: Ord,
    I: Ord,
    F: Fn(&T) -> (D, I),
{
    records.into_iter().max_by(|a, b| key(a).cmp(&key(b)))
}

/// The employee's most recent contract other than `current_contract_id`.
///
/// Contracts are ordered by start date, then by contract id.
pub fn select_previous_contract<'a>(
    contracts: &'a [EmploymentContract],
    employee_id: &str,
    current_contract_id: &str,
) -> Option<&'a EmploymentContract> {
    most_recent(
        contracts.iter().filter(|c| {
            c.header.employee_id == employee_id && c.header.contract_id != current_contract_id
        }),
        |c| (c.header.start_date, c.header.contract_id.clone()),
    )
}

/// The employee's most recent persisted statement for a month before
/// `period`.
///
/// Drafts are never selected. Statements are ordered by payroll period,
/// then by id.
pub fn select_previous_statement<'a>(
    statements: &'a [PayrollStatement],
    employee_id: &str,
    period: YearMonth,
) -> Option<&'a PayrollStatement> {
    most_recent(
        statements
            .iter()
            .filter(|s| {
                s.employee_id == employee_id
                    && s.payroll_period < period
                    && s.status != StatementStatus::Draft
            }),
        |s| (s.payroll_period, s.id),
    )
}
