#![allow(dead_code)]

use std::collections::HashMap;

use rand::distr::{Alphanumeric, SampleString};

use mesa_ledger::{
    account::{Account, NewAccount},
    period::NewFiscalYear,
    AccountMapping, BranchAccounts, MesaLedger, MesaLedgerConfig,
};
use mesa_ledger::{AccountCode, AccountId, AccountType, FiscalYearId, PaymentMethod};

pub fn pg_host() -> String {
    std::env::var("PG_HOST").unwrap_or("localhost".to_string())
}

/// Each test gets its own database: fiscal-year state is global, so sharing
/// one database across tests would make them step on each other.
pub async fn init_pool() -> anyhow::Result<sqlx::PgPool> {
    let host = pg_host();
    let admin_pool =
        sqlx::PgPool::connect(&format!("postgres://user:password@{host}:5432/pg")).await?;
    let db_name = format!(
        "mesa_test_{}",
        Alphanumeric
            .sample_string(&mut rand::rng(), 12)
            .to_lowercase()
    );
    sqlx::query(&format!(r#"CREATE DATABASE "{db_name}""#))
        .execute(&admin_pool)
        .await?;
    let pool =
        sqlx::PgPool::connect(&format!("postgres://user:password@{host}:5432/{db_name}")).await?;
    Ok(pool)
}

pub async fn init_ledger() -> anyhow::Result<MesaLedger> {
    init_ledger_with_mapping(AccountMapping::default()).await
}

pub async fn init_ledger_with_mapping(mapping: AccountMapping) -> anyhow::Result<MesaLedger> {
    let pool = init_pool().await?;
    let config = MesaLedgerConfig::builder()
        .pool(pool)
        .exec_migrations(true)
        .account_mapping(mapping)
        .build()?;
    Ok(MesaLedger::init(config).await?)
}

pub fn code(n: i32) -> AccountCode {
    AccountCode::try_from(n).unwrap()
}

pub async fn create_account(
    ledger: &MesaLedger,
    code_n: i32,
    name: &str,
    account_type: AccountType,
) -> anyhow::Result<Account> {
    let new_account = NewAccount::builder()
        .id(AccountId::new())
        .code(code(code_n))
        .name(name)
        .account_type(account_type)
        .build()?;
    Ok(ledger.accounts().create(new_account).await?)
}

pub async fn open_year(ledger: &MesaLedger, year: i32) -> anyhow::Result<()> {
    ledger
        .period_guard()
        .open_year(
            NewFiscalYear::builder()
                .id(FiscalYearId::new())
                .year(year)
                .build()?,
        )
        .await?;
    Ok(())
}

/// The accounts used by the branch mapping fixture.
pub async fn standard_chart(ledger: &MesaLedger) -> anyhow::Result<()> {
    create_account(ledger, 1910, "Cash till", AccountType::Asset).await?;
    create_account(ledger, 1580, "Card clearing", AccountType::Asset).await?;
    create_account(ledger, 2440, "Accounts payable", AccountType::Liability).await?;
    create_account(ledger, 2610, "Output VAT", AccountType::Liability).await?;
    create_account(ledger, 2640, "Input VAT", AccountType::Asset).await?;
    create_account(ledger, 3000, "Sales", AccountType::Revenue).await?;
    create_account(ledger, 4010, "Cost of goods", AccountType::Expense).await?;
    Ok(())
}

pub fn mapping_fixture() -> AccountMapping {
    let mut settlement = HashMap::new();
    settlement.insert(PaymentMethod::Cash, code(1910));
    settlement.insert(PaymentMethod::Card, code(1580));
    let mut branches = HashMap::new();
    branches.insert(
        "downtown".to_string(),
        BranchAccounts {
            settlement,
            sales: code(3000),
            vat_output: Some(code(2610)),
            vat_input: Some(code(2640)),
            payable: code(2440),
        },
    );
    AccountMapping { branches }
}
