use chrono::NaiveDate;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fine {
    pub id: Uuid,
    pub code: String,
    pub nickname: String,
    pub loan_code: String,
    /// Kept in cents so arithmetic stays exact.
    pub amount_cents: i64,
    pub issued_on: NaiveDate,
    pub paid: bool,
}

impl Fine {
    pub fn amount_display(&self) -> String {
        format!("{}.{:02}", self.amount_cents / 100, self.amount_cents % 100)
    }
}

#[derive(Debug, Clone)]
pub struct NewFine {
    pub code: String,
    pub nickname: String,
    pub loan_code: String,
    pub amount_cents: i64,
}

#[derive(Debug, Clone, Default)]
pub struct FinePatch {
    pub amount_cents: Option<i64>,
    pub paid: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct FineFilter {
    pub nickname: Option<String>,
    pub loan_code: Option<String>,
    pub paid: Option<bool>,
}

/// Parse an amount typed as `12`, `12.5` or `12,50` into cents.
pub fn parse_amount(raw: &str) -> Option<i64> {
    let normalized = raw.trim().replace(',', ".");
    let (units, fraction) = match normalized.split_once('.') {
        Some((units, fraction)) => (units, fraction),
        None => (normalized.as_str(), ""),
    };
    if units.is_empty() || fraction.len() > 2 {
        return None;
    }
    if !units.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }
    let units: i64 = units.parse().ok()?;
    let cents = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().ok()? * 10,
        _ => fraction.parse::<i64>().ok()?,
    };
    units.checked_mul(100)?.checked_add(cents)
}
