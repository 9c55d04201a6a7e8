//! Compensation record model.
//!
//! A [`CompensationRecord`] is a read-only snapshot supplied by the external
//! payroll datastore. The engine never edits one in place.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest magnitude the engine computes with for any amount, 10^15.
///
/// Anything past it parses but is flagged and clamped before arithmetic, so
/// deduction and totals sums stay inside the `Decimal` range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// One employee's compensation for a pay cycle.
///
/// Every field has a serde default so that malformed upstream rows still
/// deserialize and can be flagged instead of rejected.
///
/// # Example
///
/// ```
/// use payroll_engine::models::CompensationRecord;
/// use rust_decimal::Decimal;
///
/// let record = CompensationRecord::new("emp_001", Decimal::from(10000), Decimal::from(15000));
/// assert!(record.has_identity());
/// assert_eq!(record.deductions_or_zero(), Decimal::ZERO);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompensationRecord {
    /// Unique identifier for the employee.
    #[serde(default)]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Department the employee belongs to.
    #[serde(default)]
    pub department: String,
    /// Job role.
    #[serde(default)]
    pub role: String,
    /// Monthly basic pay.
    #[serde(default)]
    pub basic: Decimal,
    /// Monthly gross pay.
    #[serde(default)]
    pub gross: Decimal,
    /// Monthly house rent allowance.
    #[serde(default)]
    pub hra: Decimal,
    /// Deductions already recorded against this record, if any.
    #[serde(default)]
    pub deductions: Option<Decimal>,
    /// Working days with no attendance entry in the cycle.
    #[serde(default)]
    pub attendance_gap_days: u32,
    /// Leave days taken without approval.
    #[serde(default)]
    pub unapproved_leave_days: u32,
    /// Reimbursement claims awaiting verification.
    #[serde(default)]
    pub unverified_claims: u32,
    /// Salary bank account reference.
    #[serde(default)]
    pub bank_account: Option<String>,
    /// Tax identifier.
    #[serde(default)]
    pub tax_id: Option<String>,
}

impl CompensationRecord {
    /// Creates a record with the given identity and pay, leaving everything else empty.
    pub fn new(id: impl Into<String>, basic: Decimal, gross: Decimal) -> Self {
        Self {
            id: id.into(),
            basic,
            gross,
            ..Self::default()
        }
    }

    /// Returns true if the record carries a non-blank identity key.
    pub fn has_identity(&self) -> bool {
        !self.id.trim().is_empty()
    }

    /// Recorded deductions, treating an absent value as zero.
    pub fn deductions_or_zero(&self) -> Decimal {
        self.deductions.unwrap_or(Decimal::ZERO)
    }

    /// Gross pay less recorded deductions, saturating at the `Decimal` bounds.
    pub fn net_pay(&self) -> Decimal {
        self.gross.saturating_sub(self.deductions_or_zero())
    }

    /// The first monetary field whose magnitude exceeds [`MAX_AMOUNT`], with its value.
    pub fn out_of_range_amount(&self) -> Option<(&'static str, Decimal)> {
        [
            ("basic", Some(self.basic)),
            ("gross", Some(self.gross)),
            ("hra", Some(self.hra)),
            ("deductions", self.deductions),
        ]
        .into_iter()
        .find_map(|(field, value)| value.filter(|v| v.abs() > MAX_AMOUNT).map(|v| (field, v)))
    }

    /// Returns a copy of this record with `deductions` set.
    ///
    /// The original snapshot is left untouched.
    pub fn with_deductions(&self, deductions: Decimal) -> Self {
        Self {
            deductions: Some(deductions),
            ..self.clone()
        }
    }

    /// Returns true if a non-blank bank account is on file.
    pub fn has_bank_account(&self) -> bool {
        is_present(self.bank_account.as_deref())
    }

    /// Returns true if a non-blank tax identifier is on file.
    pub fn has_tax_id(&self) -> bool {
        is_present(self.tax_id.as_deref())
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
