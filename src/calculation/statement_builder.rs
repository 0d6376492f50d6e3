//! Monthly payroll statement assembly.
//!
//! [`PayrollStatementBuilder`] owns one draft [`PayrollStatement`] and keeps
//! its totals consistent after every mutation:
//!
//! - `total_payment_amount` is the sum of payment lines and bonuses.
//! - `total_deduction_amount` is the sum of deduction lines.
//! - `net_pay` is payments less deductions and may go negative.
//!
//! While a contract profile is attached, statutory deduction lines are
//! recomputed from the taxable pay on every change unless they were edited
//! by hand. In file mode a replacement document stands in for the line
//! items and no totals are computed.
//!
//! Editing a saved statement returns it to `DRAFT`. An emailed statement
//! is frozen and every edit is rejected with [`EngineError::StatementLocked`].

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{EngineConfig, ItemCatalog};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AmountInput, BonusLine, ContractCompensationProfile, ContractHeader, DeductionCode,
    DeductionItem, EnrollmentFlags, FileAttachment, LineItemKind, LookupOutcome, PayStructure,
    PaymentCode, PaymentItem, PayrollLineItem, PayrollStatement, PeriodAttendance, SalaryTiming,
    StatementMode, StatementStatus, YearMonth,
};

use super::deductions::calculate_deductions;
use super::profile::{payment_fields, validate_bonuses};
use super::rounding::{round_to_won, saturating_mul, sum_won};

/// Persists statements on behalf of the builder.
///
/// The builder calls [`persist`](StatementRepository::persist) once per save
/// and never retries. A failure aborts the save and leaves the draft as it
/// was.
pub trait StatementRepository {
    /// The repository's failure type.
    type Error: std::fmt::Display;

    /// Stores the statement, replacing any earlier version with the same id.
    fn persist(&mut self, statement: &PayrollStatement) -> Result<(), Self::Error>;
}

/// Builds and maintains one employee's statement for one payroll month.
#[derive(Debug, Clone)]
pub struct PayrollStatementBuilder<'a> {
    config: &'a EngineConfig,
    statement: PayrollStatement,
    enrollment: EnrollmentFlags,
    profile: Option<ContractCompensationProfile>,
    manual_deductions: HashSet<DeductionCode>,
}

impl<'a> PayrollStatementBuilder<'a> {
    /// Starts a zero-filled draft for `payroll_period`.
    ///
    /// Payment lines come from every catalog payment item; deduction lines
    /// from the catalog items marked as default lines. A code listed twice
    /// gets one line. With `NEXT` salary
    /// timing the settlement period is the month before the payroll month.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::calculation::PayrollStatementBuilder;
    /// use payroll_engine::config::EngineConfig;
    /// use payroll_engine::models::{ContractHeader, SalaryTiming};
    /// use chrono::NaiveDate;
    ///
    /// let config = EngineConfig::default();
    /// let header = ContractHeader {
    ///     contract_id: "ct_001".to_string(),
    ///     employee_id: "emp_001".to_string(),
    ///     start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
    ///     end_date: None,
    ///     salary_timing: Some(SalaryTiming::Next),
    ///     enrollment: Default::default(),
    ///     attachments: vec![],
    /// };
    ///
    /// let builder = PayrollStatementBuilder::initialize_draft(&config, &header, "2025-03".parse().unwrap());
    /// let statement = builder.statement();
    /// assert_eq!(statement.settlement_start_date, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
    /// assert_eq!(statement.settlement_end_date, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    /// assert_eq!(statement.net_pay, 0);
    /// ```
    pub fn initialize_draft(
        config: &'a EngineConfig,
        header: &ContractHeader,
        payroll_period: YearMonth,
    ) -> Self {
        let timing = header
            .salary_timing
            .unwrap_or(config.organization().default_salary_timing);
        let settlement = match timing {
            SalaryTiming::Current => payroll_period,
            SalaryTiming::Next => payroll_period.previous(),
        };

        let (payment_items, deduction_items) = catalog_lines(config.catalog());

        let statement = PayrollStatement {
            id: Uuid::new_v4(),
            employee_id: header.employee_id.clone(),
            contract_id: header.contract_id.clone(),
            payroll_period,
            settlement_start_date: settlement.first_day(),
            settlement_end_date: settlement.last_day(),
            payment_date: None,
            status: StatementStatus::Draft,
            mode: StatementMode::Computed,
            payment_items,
            deduction_items,
            bonuses: vec![],
            total_payment_amount: 0,
            total_deduction_amount: 0,
            net_pay: 0,
            saved_at: None,
        };

        info!(
            statement_id = %statement.id,
            employee_id = %statement.employee_id,
            payroll_period = %payroll_period,
            settlement_period = %settlement,
            "Initialized payroll statement draft"
        );

        Self {
            config,
            statement,
            enrollment: header.enrollment,
            profile: None,
            manual_deductions: HashSet::new(),
        }
    }

    /// The statement as it currently stands.
    pub fn statement(&self) -> &PayrollStatement {
        &self.statement
    }

    /// Consumes the builder, returning the statement.
    pub fn into_statement(self) -> PayrollStatement {
        self.statement
    }

    /// The attached contract profile, if any.
    pub fn profile(&self) -> Option<&ContractCompensationProfile> {
        self.profile.as_ref()
    }

    /// Fills payment lines and bonuses from a contract profile.
    ///
    /// Every payment line is zeroed first, then each code the profile fixes
    /// overwrites its line; nonzero amounts without a line are appended.
    /// Attendance must be settled again afterwards. The bonus list is
    /// replaced wholesale. The profile stays attached so statutory
    /// deductions follow later edits.
    pub fn apply_contract_profile(
        &mut self,
        profile: &ContractCompensationProfile,
    ) -> EngineResult<()> {
        self.ensure_editable()?;

        for item in self.statement.payment_items.iter_mut() {
            item.amount = 0;
        }
        for (code, amount) in payment_fields(profile) {
            self.upsert_payment(code, amount);
        }

        self.statement.bonuses = profile
            .bonuses
            .iter()
            .enumerate()
            .map(|(index, bonus)| BonusLine {
                order: index as u32 + 1,
                ..bonus.clone()
            })
            .collect();

        self.profile = Some(profile.clone());
        self.manual_deductions.clear();

        debug!(
            statement_id = %self.statement.id,
            pay_structure = ?profile.pay_structure,
            bonuses = self.statement.bonuses.len(),
            "Applied contract profile"
        );

        self.finish_edit();
        Ok(())
    }

    /// Settles premium lines from the period's attendance totals.
    ///
    /// Non-inclusive contracts settle overtime, night and holiday pay;
    /// part-time contracts settle hourly, overtime and holiday pay. Each
    /// line is `hours x supplemental rate`, rounded. Inclusive contracts
    /// already carry their premiums and ignore attendance.
    pub fn apply_attendance(
        &mut self,
        attendance: Option<&PeriodAttendance>,
    ) -> EngineResult<LookupOutcome> {
        self.ensure_editable()?;

        let Some(attendance) = attendance else {
            debug!(statement_id = %self.statement.id, "No attendance record for settlement period");
            return Ok(LookupOutcome::NotFound);
        };

        let Some(profile) = self.profile.as_ref() else {
            return Err(EngineError::MissingRequiredField {
                field: "compensation_profile".to_string(),
            });
        };

        let pay_structure = profile.pay_structure;
        let Some(rates) = profile.supplemental_rates else {
            debug!(
                statement_id = %self.statement.id,
                pay_structure = ?pay_structure,
                "Attendance ignored for contract without supplemental rates"
            );
            return Ok(LookupOutcome::Applied);
        };

        let settle = |hours: Decimal, rate: i64| {
            round_to_won(saturating_mul(hours.max(Decimal::ZERO), Decimal::from(rate)))
        };

        let mut settled = vec![
            (PaymentCode::Overtime, settle(attendance.overtime_hours, rates.overtime)),
            (PaymentCode::Holiday, settle(attendance.holiday_hours, rates.holiday)),
        ];
        match pay_structure {
            PayStructure::PartTime => {
                settled.push((PaymentCode::HourlyPay, settle(attendance.weekday_hours, rates.weekday)));
            }
            _ => {
                settled.push((PaymentCode::Night, settle(attendance.night_hours, rates.night)));
            }
        }

        for (code, amount) in settled {
            self.upsert_payment(code, amount);
        }

        self.finish_edit();
        Ok(LookupOutcome::Applied)
    }

    /// Recomputes statutory deductions and the three totals.
    ///
    /// Idempotent. Does nothing in file mode.
    pub fn recompute_totals(&mut self) {
        if self.statement.is_file_mode() {
            return;
        }

        let total_payment = sum_won(
            self.statement
                .payment_items
                .iter()
                .map(|item| item.amount)
                .chain(self.statement.bonuses.iter().map(|bonus| bonus.amount)),
        );

        if self.profile.is_some() {
            let nontaxable = sum_won(
                self.statement
                    .payment_items
                    .iter()
                    .filter(|item| item.code.is_nontaxable())
                    .map(|item| item.amount),
            );
            let rates = self.config.rates_for(self.statement.payroll_period.year());
            let taxable = total_payment.saturating_sub(nontaxable);
            let calculation = calculate_deductions(taxable, &self.enrollment, rates, 1);

            for item in self.statement.deduction_items.iter_mut() {
                if self.manual_deductions.contains(&item.code) {
                    continue;
                }
                if let Some(amount) = calculation.deductions.amount_for(&item.code) {
                    item.amount = amount;
                }
            }
        }

        let total_deduction = sum_won(self.statement.deduction_items.iter().map(|item| item.amount));

        self.statement.total_payment_amount = total_payment;
        self.statement.total_deduction_amount = total_deduction;
        self.statement.net_pay = total_payment.saturating_sub(total_deduction);
    }

    /// Overwrites a payment line's amount.
    ///
    /// Non-numeric or negative input is stored as zero.
    pub fn edit_payment_item(
        &mut self,
        code: PaymentCode,
        amount: impl Into<AmountInput>,
    ) -> EngineResult<()> {
        self.ensure_editable()?;
        let item = find_item_mut(&mut self.statement.payment_items, &code, LineItemKind::Payment)?;
        item.amount = amount.into().coerce();
        self.finish_edit();
        Ok(())
    }

    /// Overwrites a deduction line's amount.
    ///
    /// A hand-edited statutory line keeps its value when totals are
    /// recomputed, until a profile is applied again.
    pub fn edit_deduction_item(
        &mut self,
        code: &DeductionCode,
        amount: impl Into<AmountInput>,
    ) -> EngineResult<()> {
        self.ensure_editable()?;
        let item = find_item_mut(&mut self.statement.deduction_items, code, LineItemKind::Deduction)?;
        item.amount = amount.into().coerce();
        self.manual_deductions.insert(code.clone());
        self.finish_edit();
        Ok(())
    }

    /// Sets the remark on a payment or deduction line.
    pub fn set_item_remark(
        &mut self,
        kind: LineItemKind,
        code: &str,
        remark: impl Into<String>,
    ) -> EngineResult<()> {
        self.ensure_editable()?;
        let not_found = || EngineError::LineItemNotFound {
            kind,
            code: code.to_string(),
        };
        let remark_slot = match kind {
            LineItemKind::Payment => {
                let payment_code = PaymentCode::from_code(code).ok_or_else(not_found)?;
                &mut find_item_mut(&mut self.statement.payment_items, &payment_code, kind)?.remark
            }
            LineItemKind::Deduction => {
                let deduction_code = DeductionCode::from(code);
                &mut find_item_mut(&mut self.statement.deduction_items, &deduction_code, kind)?.remark
            }
            LineItemKind::Bonus => {
                &mut self
                    .statement
                    .bonuses
                    .iter_mut()
                    .find(|bonus| bonus.category == code)
                    .ok_or_else(not_found)?
                    .remark
            }
        };
        *remark_slot = remark.into();
        self.finish_edit();
        Ok(())
    }

    /// Adds a bonus line for a catalog category with its default amount
    /// and remark.
    pub fn add_bonus_line(&mut self, category: &str) -> EngineResult<()> {
        self.ensure_editable()?;

        if self.statement.bonuses.iter().any(|bonus| bonus.category == category) {
            return Err(EngineError::DuplicateLineItem {
                kind: LineItemKind::Bonus,
                code: category.to_string(),
            });
        }

        let entry = self
            .config
            .catalog()
            .bonus_category(category)
            .ok_or_else(|| EngineError::CatalogEntryNotFound {
                kind: LineItemKind::Bonus,
                code: category.to_string(),
            })?;

        self.statement.bonuses.push(BonusLine {
            category: entry.code.clone(),
            name: entry.name.clone(),
            order: self.statement.bonuses.len() as u32 + 1,
            amount: entry.default_amount.max(0),
            remark: entry.default_remark.clone(),
        });

        self.finish_edit();
        Ok(())
    }

    /// Overwrites a bonus line's amount.
    ///
    /// Zero is accepted in the draft but blocks saving.
    pub fn edit_bonus_line(
        &mut self,
        category: &str,
        amount: impl Into<AmountInput>,
    ) -> EngineResult<()> {
        self.ensure_editable()?;
        let bonus = self
            .statement
            .bonuses
            .iter_mut()
            .find(|bonus| bonus.category == category)
            .ok_or_else(|| EngineError::LineItemNotFound {
                kind: LineItemKind::Bonus,
                code: category.to_string(),
            })?;
        bonus.amount = amount.into().coerce();
        self.finish_edit();
        Ok(())
    }

    /// Removes a bonus line and renumbers the rest.
    pub fn remove_bonus_line(&mut self, category: &str) -> EngineResult<()> {
        self.ensure_editable()?;
        let position = self
            .statement
            .bonuses
            .iter()
            .position(|bonus| bonus.category == category)
            .ok_or_else(|| EngineError::LineItemNotFound {
                kind: LineItemKind::Bonus,
                code: category.to_string(),
            })?;
        self.statement.bonuses.remove(position);
        for (index, bonus) in self.statement.bonuses.iter_mut().enumerate() {
            bonus.order = index as u32 + 1;
        }
        self.finish_edit();
        Ok(())
    }

    /// Adds a deduction line for a catalog code with its default amount.
    pub fn add_deduction_line(&mut self, code: &DeductionCode) -> EngineResult<()> {
        self.ensure_editable()?;

        if self.statement.deduction_items.iter().any(|item| &item.code == code) {
            return Err(EngineError::DuplicateLineItem {
                kind: LineItemKind::Deduction,
                code: code.to_string(),
            });
        }

        let entry = self.config.catalog().deduction_item(code).ok_or_else(|| {
            EngineError::CatalogEntryNotFound {
                kind: LineItemKind::Deduction,
                code: code.to_string(),
            }
        })?;

        self.statement.deduction_items.push(PayrollLineItem {
            code: entry.code.clone(),
            name: entry.name.clone(),
            order: self.statement.deduction_items.len() as u32 + 1,
            amount: entry.default_amount.max(0),
            remark: String::new(),
        });

        self.finish_edit();
        Ok(())
    }

    /// Removes a deduction line and renumbers the rest.
    pub fn remove_deduction_line(&mut self, code: &DeductionCode) -> EngineResult<()> {
        self.ensure_editable()?;
        let position = self
            .statement
            .deduction_items
            .iter()
            .position(|item| &item.code == code)
            .ok_or_else(|| EngineError::LineItemNotFound {
                kind: LineItemKind::Deduction,
                code: code.to_string(),
            })?;
        self.statement.deduction_items.remove(position);
        for (index, item) in self.statement.deduction_items.iter_mut().enumerate() {
            item.order = index as u32 + 1;
        }
        self.manual_deductions.remove(code);
        self.finish_edit();
        Ok(())
    }

    /// Replaces payment and deduction lines with those of a previous
    /// statement.
    ///
    /// The copied amounts are kept as entered: any attached profile is
    /// detached so statutory lines are not recomputed over them. Without a
    /// previous statement the draft is unchanged.
    pub fn load_previous_statement(
        &mut self,
        previous: Option<&PayrollStatement>,
    ) -> EngineResult<LookupOutcome> {
        self.ensure_editable()?;

        let Some(previous) = previous else {
            debug!(statement_id = %self.statement.id, "No previous statement to load");
            return Ok(LookupOutcome::NotFound);
        };

        self.statement.payment_items = reindexed(&previous.payment_items);
        self.statement.deduction_items = reindexed(&previous.deduction_items);
        self.profile = None;
        self.manual_deductions.clear();

        info!(
            statement_id = %self.statement.id,
            previous_statement_id = %previous.id,
            previous_period = %previous.payroll_period,
            "Loaded line items from previous statement"
        );

        self.finish_edit();
        Ok(LookupOutcome::Applied)
    }

    /// Replaces the computed line items with an uploaded document.
    ///
    /// Line items and bonuses are cleared and totals zeroed.
    pub fn attach_replacement_file(&mut self, attachment: FileAttachment) -> EngineResult<()> {
        self.ensure_unlocked()?;
        self.reopen_if_saved();

        info!(
            statement_id = %self.statement.id,
            file_name = %attachment.file_name,
            "Switched statement to file mode"
        );

        self.statement.mode = StatementMode::File { attachment };
        self.statement.payment_items.clear();
        self.statement.deduction_items.clear();
        self.statement.bonuses.clear();
        self.statement.total_payment_amount = 0;
        self.statement.total_deduction_amount = 0;
        self.statement.net_pay = 0;
        self.manual_deductions.clear();
        Ok(())
    }

    /// Leaves file mode, restoring catalog lines and the attached profile.
    pub fn detach_replacement_file(&mut self) -> EngineResult<()> {
        self.ensure_unlocked()?;
        if !self.statement.is_file_mode() {
            return Ok(());
        }

        self.statement.mode = StatementMode::Computed;
        (self.statement.payment_items, self.statement.deduction_items) =
            catalog_lines(self.config.catalog());

        match self.profile.take() {
            Some(profile) => {
                // apply_contract_profile recomputes totals
                if let Err(e) = self.apply_contract_profile(&profile) {
                    warn!(statement_id = %self.statement.id, error = %e, "Failed to restore profile");
                    self.profile = Some(profile);
                }
            }
            None => self.finish_edit(),
        }
        Ok(())
    }

    /// Sets the date the pay reaches the employee.
    pub fn set_payment_date(&mut self, payment_date: NaiveDate) -> EngineResult<()> {
        self.ensure_unlocked()?;
        if self.statement.payment_date != Some(payment_date) {
            self.reopen_if_saved();
            self.statement.payment_date = Some(payment_date);
        }
        Ok(())
    }

    /// Checks everything that must hold before the statement is persisted.
    pub fn validate_for_submission(&self) -> EngineResult<()> {
        if self.statement.employee_id.trim().is_empty() {
            return Err(EngineError::MissingRequiredField {
                field: "employee_id".to_string(),
            });
        }

        if self.statement.payment_date.is_none() {
            return Err(EngineError::MissingRequiredField {
                field: "payment_date".to_string(),
            });
        }

        validate_bonuses(&self.statement.bonuses)
    }

    /// Validates and persists the statement, moving it to `SAVED`.
    ///
    /// Validation runs before the repository is called. A repository
    /// failure is surfaced as [`EngineError::Persistence`] and the draft is
    /// left unchanged.
    pub fn save<R: StatementRepository>(&mut self, repository: &mut R) -> EngineResult<()> {
        if self.statement.status == StatementStatus::Emailed {
            return Err(EngineError::InvalidStateTransition {
                from: self.statement.status.to_string(),
                to: StatementStatus::Saved.to_string(),
            });
        }

        if let Err(e) = self.validate_for_submission() {
            warn!(statement_id = %self.statement.id, error = %e, "Statement rejected before save");
            return Err(e);
        }

        self.recompute_totals();

        let mut candidate = self.statement.clone();
        candidate.status = StatementStatus::Saved;
        candidate.saved_at = Some(Utc::now());

        repository.persist(&candidate).map_err(|e| {
            warn!(statement_id = %candidate.id, error = %e, "Failed to persist statement");
            EngineError::Persistence {
                message: e.to_string(),
            }
        })?;

        info!(
            statement_id = %candidate.id,
            employee_id = %candidate.employee_id,
            payroll_period = %candidate.payroll_period,
            net_pay = candidate.net_pay,
            "Saved payroll statement"
        );

        self.statement = candidate;
        Ok(())
    }

    /// Records that the saved statement was emailed.
    pub fn mark_emailed(&mut self) -> EngineResult<()> {
        if self.statement.status != StatementStatus::Saved {
            return Err(EngineError::InvalidStateTransition {
                from: self.statement.status.to_string(),
                to: StatementStatus::Emailed.to_string(),
            });
        }
        self.statement.status = StatementStatus::Emailed;
        Ok(())
    }

    /// Drops the draft without persisting anything.
    pub fn discard(self) {
        debug!(statement_id = %self.statement.id, status = %self.statement.status, "Discarded statement");
    }

    fn ensure_unlocked(&self) -> EngineResult<()> {
        if self.statement.status == StatementStatus::Emailed {
            return Err(EngineError::StatementLocked {
                status: self.statement.status.to_string(),
            });
        }
        Ok(())
    }

    fn ensure_editable(&self) -> EngineResult<()> {
        self.ensure_unlocked()?;
        if self.statement.is_file_mode() {
            return Err(EngineError::FileModeActive);
        }
        Ok(())
    }

    fn reopen_if_saved(&mut self) {
        if self.statement.status == StatementStatus::Saved {
            debug!(statement_id = %self.statement.id, "Saved statement edited, reopened as draft");
            self.statement.status = StatementStatus::Draft;
        }
    }

    fn finish_edit(&mut self) {
        self.reopen_if_saved();
        self.recompute_totals();
    }

    fn upsert_payment(&mut self, code: PaymentCode, amount: i64) {
        let amount = amount.max(0);
        if let Some(item) = self
            .statement
            .payment_items
            .iter_mut()
            .find(|item| item.code == code)
        {
            item.amount = amount;
        } else if amount > 0 {
            let order = self.statement.payment_items.len() as u32 + 1;
            let name = self.config.catalog().payment_name(code);
            self.statement.payment_items.push(PayrollLineItem {
                code,
                name,
                order,
                amount,
                remark: String::new(),
            });
        }
    }
}

/// Zeroed payment lines for every catalog payment item and deduction lines
/// for the default deduction items, one line per code.
fn catalog_lines(catalog: &ItemCatalog) -> (Vec<PaymentItem>, Vec<DeductionItem>) {
    let mut seen_payments = HashSet::new();
    let payment_items = catalog
        .payment_items
        .iter()
        .filter(|item| seen_payments.insert(item.code))
        .enumerate()
        .map(|(index, item)| PaymentItem::zeroed(item.code, item.name.clone(), index as u32 + 1))
        .collect();

    let mut seen_deductions = HashSet::new();
    let deduction_items = catalog
        .deduction_items
        .iter()
        .filter(|item| item.default_line && seen_deductions.insert(item.code.clone()))
        .enumerate()
        .map(|(index, item)| {
            DeductionItem::zeroed(item.code.clone(), item.name.clone(), index as u32 + 1)
        })
        .collect();

    (payment_items, deduction_items)
}

fn find_item_mut<'s, C: PartialEq + std::fmt::Display>(
    items: &'s mut [PayrollLineItem<C>],
    code: &C,
    kind: LineItemKind,
) -> EngineResult<&'s mut PayrollLineItem<C>> {
    items
        .iter_mut()
        .find(|item| &item.code == code)
        .ok_or_else(|| EngineError::LineItemNotFound {
            kind,
            code: code.to_string(),
        })
}

fn reindexed<C: Clone>(items: &[PayrollLineItem<C>]) -> Vec<PayrollLineItem<C>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| PayrollLineItem {
            order: index as u32 + 1,
            amount: item.amount.max(0),
            ..item.clone()
        })
        .collect()
}
