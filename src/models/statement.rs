//! Payroll statement models.
//!
//! This module contains the [`PayrollStatement`] type and the line items,
//! bonus lines, lifecycle status and mode that make it up.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::codes::{DeductionCode, PaymentCode};
use super::contract::FileAttachment;
use super::year_month::YearMonth;

/// The kind of line a code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemKind {
    /// A payment line.
    Payment,
    /// A deduction line.
    Deduction,
    /// A bonus line.
    Bonus,
}

impl fmt::Display for LineItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LineItemKind::Payment => "payment",
            LineItemKind::Deduction => "deduction",
            LineItemKind::Bonus => "bonus",
        })
    }
}

/// A single payment or deduction line on a statement.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{PaymentCode, PaymentItem};
///
/// let item = PaymentItem::zeroed(PaymentCode::BaseSalary, "Base salary", 1);
/// assert_eq!(item.amount, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollLineItem<C> {
    /// The canonical code.
    pub code: C,
    /// Display name from the catalog.
    pub name: String,
    /// 1-based position within its list.
    pub order: u32,
    /// Amount in whole currency units, never negative.
    pub amount: i64,
    /// Free-text remark.
    #[serde(default)]
    pub remark: String,
}

impl<C> PayrollLineItem<C> {
    /// A zero-amount line with no remark.
    pub fn zeroed(code: C, name: impl Into<String>, order: u32) -> Self {
        Self {
            code,
            name: name.into(),
            order,
            amount: 0,
            remark: String::new(),
        }
    }
}

/// A payment line.
pub type PaymentItem = PayrollLineItem<PaymentCode>;
/// A deduction line.
pub type DeductionItem = PayrollLineItem<DeductionCode>;

/// A bonus line; category codes come from the organization catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusLine {
    /// Bonus category code.
    pub category: String,
    /// Display name.
    pub name: String,
    /// 1-based position.
    pub order: u32,
    /// Amount; must be positive to be saved.
    pub amount: i64,
    /// Free-text remark.
    #[serde(default)]
    pub remark: String,
}

/// Amount typed into an editable cell.
///
/// Non-numeric text and negative numbers both coerce to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// A numeric value.
    Number(i64),
    /// Raw text as typed.
    Text(String),
}

impl AmountInput {
    /// The amount to store.
    pub fn coerce(&self) -> i64 {
        match self {
            AmountInput::Number(n) => (*n).max(0),
            AmountInput::Text(text) => {
                let digits: String = text
                    .trim()
                    .chars()
                    .filter(|c| *c != ',' && *c != '_')
                    .collect();
                digits.parse::<i64>().map(|n| n.max(0)).unwrap_or(0)
            }
        }
    }
}

impl From<i64> for AmountInput {
    fn from(value: i64) -> Self {
        AmountInput::Number(value)
    }
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        AmountInput::Text(value.to_string())
    }
}

/// Result of a lookup against an external record that may not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupOutcome {
    /// The record was found and applied.
    Applied,
    /// Nothing matched; state was left unchanged.
    NotFound,
}

/// Statement lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementStatus {
    /// Editable, not yet persisted.
    #[default]
    Draft,
    /// Persisted.
    Saved,
    /// Persisted and dispatched by email.
    Emailed,
}

impl fmt::Display for StatementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatementStatus::Draft => "draft",
            StatementStatus::Saved => "saved",
            StatementStatus::Emailed => "emailed",
        })
    }
}

/// Whether figures are computed from line items or supplied as a file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatementMode {
    /// Line items and totals are maintained by the engine.
    #[default]
    Computed,
    /// A replacement document stands in for the line items.
    File {
        /// The uploaded document.
        attachment: FileAttachment,
    },
}

/// One employee's statement for one payroll month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollStatement {
    /// Statement identifier.
    pub id: Uuid,
    /// Employee the statement is for.
    pub employee_id: String,
    /// Contract the figures come from.
    pub contract_id: String,
    /// The payroll month.
    pub payroll_period: YearMonth,
    /// First day of the settled period.
    pub settlement_start_date: NaiveDate,
    /// Last day of the settled period.
    pub settlement_end_date: NaiveDate,
    /// Date the pay reaches the employee; required to save.
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: StatementStatus,
    /// Computed or file-backed.
    #[serde(default)]
    pub mode: StatementMode,
    /// Payment lines.
    pub payment_items: Vec<PaymentItem>,
    /// Deduction lines.
    pub deduction_items: Vec<DeductionItem>,
    /// Bonus lines.
    pub bonuses: Vec<BonusLine>,
    /// Sum of payment lines and bonuses.
    pub total_payment_amount: i64,
    /// Sum of deduction lines.
    pub total_deduction_amount: i64,
    /// Payments less deductions.
    pub net_pay: i64,
    /// When the statement was persisted.
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl PayrollStatement {
    /// Whether a replacement file stands in for the line items.
    pub fn is_file_mode(&self) -> bool {
        matches!(self.mode, StatementMode::File { .. })
    }
}
