mod helpers;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use mesa_ledger::journal::{NewJournalEntry, NewPosting};
use mesa_ledger::{AccountType, JournalEntryId};

async fn post_simple(
    ledger: &mesa_ledger::MesaLedger,
    cash: mesa_ledger::AccountId,
    sales: mesa_ledger::AccountId,
    description: &str,
) -> anyhow::Result<mesa_ledger::journal::JournalEntry> {
    Ok(ledger
        .journal()
        .create(
            NewJournalEntry::builder()
                .id(JournalEntryId::new())
                .description(description)
                .entry_date(NaiveDate::from_ymd_opt(2025, 5, 20).unwrap())
                .posting(NewPosting::debit(cash, dec!(10.00)))
                .posting(NewPosting::credit(sales, dec!(10.00)))
                .build()?,
        )
        .await?)
}

#[tokio::test]
async fn entry_numbers_start_at_one_and_grow_densely() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let cash = helpers::create_account(&ledger, 1910, "Cash", AccountType::Asset).await?;
    let sales = helpers::create_account(&ledger, 3000, "Sales", AccountType::Revenue).await?;
    helpers::open_year(&ledger, 2025).await?;

    assert_eq!(ledger.journal().next_entry_number().await?, 1);
    for expected in 1..=4 {
        let entry = post_simple(&ledger, cash.id(), sales.id(), "seq").await?;
        assert_eq!(entry.entry_number(), expected);
    }
    assert_eq!(ledger.journal().next_entry_number().await?, 5);
    Ok(())
}

#[tokio::test]
async fn deleted_numbers_are_recycled_before_the_sequence_grows() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let cash = helpers::create_account(&ledger, 1910, "Cash", AccountType::Asset).await?;
    let sales = helpers::create_account(&ledger, 3000, "Sales", AccountType::Revenue).await?;
    helpers::open_year(&ledger, 2025).await?;

    let mut entries = Vec::new();
    for _ in 0..4 {
        entries.push(post_simple(&ledger, cash.id(), sales.id(), "seq").await?);
    }
    ledger.journal().delete(entries[1].id()).await?;

    assert_eq!(ledger.journal().next_entry_number().await?, 2);
    let refill = post_simple(&ledger, cash.id(), sales.id(), "refill").await?;
    assert_eq!(refill.entry_number(), 2);
    let next = post_simple(&ledger, cash.id(), sales.id(), "tail").await?;
    assert_eq!(next.entry_number(), 5);
    Ok(())
}

#[tokio::test]
async fn peeking_the_next_number_reserves_nothing() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let cash = helpers::create_account(&ledger, 1910, "Cash", AccountType::Asset).await?;
    let sales = helpers::create_account(&ledger, 3000, "Sales", AccountType::Revenue).await?;
    helpers::open_year(&ledger, 2025).await?;

    assert_eq!(ledger.journal().next_entry_number().await?, 1);
    assert_eq!(ledger.journal().next_entry_number().await?, 1);
    let entry = post_simple(&ledger, cash.id(), sales.id(), "first").await?;
    assert_eq!(entry.entry_number(), 1);
    Ok(())
}

#[tokio::test]
async fn deleting_an_entry_restores_account_balances() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let cash = helpers::create_account(&ledger, 1910, "Cash", AccountType::Asset).await?;
    let sales = helpers::create_account(&ledger, 3000, "Sales", AccountType::Revenue).await?;
    helpers::open_year(&ledger, 2025).await?;

    let entry = post_simple(&ledger, cash.id(), sales.id(), "mistake").await?;
    ledger.journal().delete(entry.id()).await?;

    let balance = ledger
        .balances()
        .account_balance(cash.id(), None, None)
        .await?;
    assert_eq!(balance.ending(), rust_decimal::Decimal::ZERO);
    assert!(matches!(
        ledger.journal().find_by_id(entry.id()).await,
        Err(mesa_ledger::journal::error::JournalError::CouldNotFindById(_))
    ));
    Ok(())
}
