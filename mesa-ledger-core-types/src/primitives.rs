use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

crate::entity_id! { AccountId }
crate::entity_id! { JournalEntryId }
crate::entity_id! { JournalPostingId }
crate::entity_id! { FiscalYearId }
crate::entity_id! { AccountingPeriodId }
crate::entity_id! { DocumentId }

/// Tolerance applied when comparing debit and credit sums.
pub const BALANCE_TOLERANCE: rust_decimal::Decimal =
    rust_decimal::Decimal::from_parts(1, 0, 0, false, 2);

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "AccountType", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

impl AccountType {
    /// The side on which accounts of this type normally carry their balance.
    pub fn normal_balance_type(&self) -> DebitOrCredit {
        match self {
            AccountType::Asset | AccountType::Expense => DebitOrCredit::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Revenue => {
                DebitOrCredit::Credit
            }
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("Unknown account type '{0}'")]
pub struct ParseAccountTypeError(String);

impl std::str::FromStr for AccountType {
    type Err = ParseAccountTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asset" => Ok(AccountType::Asset),
            "liability" => Ok(AccountType::Liability),
            "equity" => Ok(AccountType::Equity),
            "revenue" => Ok(AccountType::Revenue),
            "expense" => Ok(AccountType::Expense),
            other => Err(ParseAccountTypeError(other.to_string())),
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AccountType::Asset => "asset",
            AccountType::Liability => "liability",
            AccountType::Equity => "equity",
            AccountType::Revenue => "revenue",
            AccountType::Expense => "expense",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "DebitOrCredit", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DebitOrCredit {
    Debit,
    Credit,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "EntryStatus", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Posted,
    Reversed,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "FiscalYearStatus", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FiscalYearStatus {
    Open,
    Closed,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "AccountingPeriodStatus", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccountingPeriodStatus {
    Open,
    Locked,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "DocumentKind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Invoice,
    Expense,
    SupplierInvoice,
    PayrollRun,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DocumentKind::Invoice => "invoice",
            DocumentKind::Expense => "expense",
            DocumentKind::SupplierInvoice => "supplier_invoice",
            DocumentKind::PayrollRun => "payroll_run",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    OnAccount,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::OnAccount => "on_account",
        };
        write!(f, "{s}")
    }
}

/// Numeric code identifying an account in the chart of accounts.
#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct AccountCode(i32);

impl AccountCode {
    pub fn into_inner(self) -> i32 {
        self.0
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ParseAccountCodeError {
    #[error("Account code must be numeric")]
    NotNumeric,
    #[error("Account code must be positive")]
    NotPositive,
}

impl std::str::FromStr for AccountCode {
    type Err = ParseAccountCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: i32 = s.parse().map_err(|_| ParseAccountCodeError::NotNumeric)?;
        AccountCode::try_from(n)
    }
}

impl TryFrom<i32> for AccountCode {
    type Error = ParseAccountCodeError;

    fn try_from(n: i32) -> Result<Self, Self::Error> {
        if n <= 0 {
            Err(ParseAccountCodeError::NotPositive)
        } else {
            Ok(AccountCode(n))
        }
    }
}

impl From<AccountCode> for i32 {
    fn from(code: AccountCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for AccountCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Year-month key derived from an entry's transaction date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodKey {
    year: i32,
    month: u32,
}

impl PeriodKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(PeriodKey { year, month })
        } else {
            None
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl From<NaiveDate> for PeriodKey {
    fn from(date: NaiveDate) -> Self {
        PeriodKey {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl std::fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(thiserror::Error, Debug)]
#[error("Period key must be formatted as YYYY-MM")]
pub struct ParsePeriodKeyError;

impl std::str::FromStr for PeriodKey {
    type Err = ParsePeriodKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s.split_once('-').ok_or(ParsePeriodKeyError)?;
        let year = year.parse().map_err(|_| ParsePeriodKeyError)?;
        let month = month.parse().map_err(|_| ParsePeriodKeyError)?;
        PeriodKey::new(year, month).ok_or(ParsePeriodKeyError)
    }
}

impl Serialize for PeriodKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PeriodKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl sqlx::Type<sqlx::Postgres> for PeriodKey {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for PeriodKey {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::Postgres>>::encode(self.to_string(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for PeriodKey {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(s.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_key_from_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let key = PeriodKey::from(date);
        assert_eq!(key.to_string(), "2024-03");
    }

    #[test]
    fn period_key_round_trips() {
        let key: PeriodKey = "2023-11".parse().unwrap();
        assert_eq!(key.year(), 2023);
        assert_eq!(key.month(), 11);
        assert_eq!(key.to_string(), "2023-11");
    }

    #[test]
    fn period_key_rejects_bad_month() {
        assert!("2023-13".parse::<PeriodKey>().is_err());
        assert!("2023".parse::<PeriodKey>().is_err());
    }

    #[test]
    fn account_code_must_be_positive() {
        assert!("1000".parse::<AccountCode>().is_ok());
        assert!("-5".parse::<AccountCode>().is_err());
        assert!("cash".parse::<AccountCode>().is_err());
    }

    #[test]
    fn natural_balance_sides() {
        assert_eq!(
            AccountType::Asset.normal_balance_type(),
            DebitOrCredit::Debit
        );
        assert_eq!(
            AccountType::Revenue.normal_balance_type(),
            DebitOrCredit::Credit
        );
    }
}
