mod helpers;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use mesa_ledger::account::{error::AccountError, NewAccount};
use mesa_ledger::journal::{NewJournalEntry, NewPosting};
use mesa_ledger::{AccountId, AccountType, JournalEntryId};

async fn create_child(
    ledger: &mesa_ledger::MesaLedger,
    code: i32,
    name: &str,
    account_type: AccountType,
    parent: i32,
) -> anyhow::Result<mesa_ledger::account::Account> {
    let new_account = NewAccount::builder()
        .id(AccountId::new())
        .code(helpers::code(code))
        .name(name)
        .account_type(account_type)
        .parent_code(helpers::code(parent))
        .build()?;
    Ok(ledger.accounts().create(new_account).await?)
}

#[tokio::test]
async fn the_tree_mirrors_parent_links() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let assets = helpers::create_account(&ledger, 1000, "Assets", AccountType::Asset).await?;
    let cash = create_child(&ledger, 1900, "Cash and bank", AccountType::Asset, 1000).await?;
    create_child(&ledger, 1910, "Cash till", AccountType::Asset, 1900).await?;
    helpers::create_account(&ledger, 3000, "Sales", AccountType::Revenue).await?;

    let forest = ledger.accounts().tree().await?;
    assert_eq!(forest.len(), 2);
    assert_eq!(forest[0].account.id, assets.id());
    assert_eq!(forest[0].children.len(), 1);
    assert_eq!(forest[0].children[0].account.id, cash.id());
    assert_eq!(forest[0].children[0].children.len(), 1);
    Ok(())
}

#[tokio::test]
async fn unknown_parents_are_rejected() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let res = create_child(&ledger, 1910, "Cash till", AccountType::Asset, 9999).await;
    let err = res.unwrap_err().downcast::<AccountError>()?;
    assert!(matches!(err, AccountError::UnknownParent(code) if code == helpers::code(9999)));
    Ok(())
}

#[tokio::test]
async fn duplicate_codes_are_rejected() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    helpers::create_account(&ledger, 1910, "Cash", AccountType::Asset).await?;
    let res = helpers::create_account(&ledger, 1910, "Cash again", AccountType::Asset).await;
    let err = res.unwrap_err().downcast::<AccountError>()?;
    assert!(matches!(err, AccountError::CodeAlreadyExists(_)));
    Ok(())
}

#[tokio::test]
async fn referenced_accounts_refuse_plain_deletion() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let cash = helpers::create_account(&ledger, 1910, "Cash", AccountType::Asset).await?;
    let sales = helpers::create_account(&ledger, 3000, "Sales", AccountType::Revenue).await?;
    helpers::open_year(&ledger, 2025).await?;

    ledger
        .journal()
        .create(
            NewJournalEntry::builder()
                .id(JournalEntryId::new())
                .description("sale")
                .entry_date(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap())
                .posting(NewPosting::debit(cash.id(), dec!(30.00)))
                .posting(NewPosting::credit(sales.id(), dec!(30.00)))
                .build()?,
        )
        .await?;

    let res = ledger.accounts().delete(cash.id(), false).await;
    assert!(matches!(res, Err(AccountError::Referenced(id)) if id == cash.id()));

    // parents of other accounts refuse too
    let parent = helpers::create_account(&ledger, 4000, "Expenses", AccountType::Expense).await?;
    create_child(&ledger, 4010, "Cost of goods", AccountType::Expense, 4000).await?;
    let res = ledger.accounts().delete(parent.id(), false).await;
    assert!(matches!(res, Err(AccountError::Referenced(_))));
    Ok(())
}

#[tokio::test]
async fn unreferenced_accounts_delete_cleanly() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let lonely = helpers::create_account(&ledger, 8999, "Unused", AccountType::Expense).await?;
    ledger.accounts().delete(lonely.id(), false).await?;
    let res = ledger.accounts().find_by_id(lonely.id()).await;
    assert!(matches!(res, Err(AccountError::CouldNotFindById(_))));
    Ok(())
}

#[tokio::test]
async fn cascade_deletion_removes_the_subtree_and_its_entries() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let assets = helpers::create_account(&ledger, 1000, "Assets", AccountType::Asset).await?;
    let cash = create_child(&ledger, 1910, "Cash", AccountType::Asset, 1000).await?;
    let sales = helpers::create_account(&ledger, 3000, "Sales", AccountType::Revenue).await?;
    helpers::open_year(&ledger, 2025).await?;

    let entry = ledger
        .journal()
        .create(
            NewJournalEntry::builder()
                .id(JournalEntryId::new())
                .description("sale")
                .entry_date(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap())
                .posting(NewPosting::debit(cash.id(), dec!(30.00)))
                .posting(NewPosting::credit(sales.id(), dec!(30.00)))
                .build()?,
        )
        .await?;

    ledger.accounts().delete(assets.id(), true).await?;

    assert!(ledger.accounts().find_by_id(assets.id()).await.is_err());
    assert!(ledger.accounts().find_by_id(cash.id()).await.is_err());
    // the entry touched the subtree, so it went with it
    assert!(ledger.journal().find_by_id(entry.id()).await.is_err());
    // accounts outside the subtree survive
    assert!(ledger.accounts().find_by_id(sales.id()).await.is_ok());
    // the freed entry number is available again
    assert_eq!(ledger.journal().next_entry_number().await?, 1);
    Ok(())
}
