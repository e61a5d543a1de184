mod helpers;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use mesa_ledger::account::NewAccount;
use mesa_ledger::journal::{NewJournalEntry, NewPosting};
use mesa_ledger::{AccountId, AccountType, JournalEntryId};

async fn post(
    ledger: &mesa_ledger::MesaLedger,
    debit: AccountId,
    credit: AccountId,
    amount: Decimal,
    date: NaiveDate,
) -> anyhow::Result<()> {
    ledger
        .journal()
        .create(
            NewJournalEntry::builder()
                .id(JournalEntryId::new())
                .description("movement")
                .entry_date(date)
                .posting(NewPosting::debit(debit, amount))
                .posting(NewPosting::credit(credit, amount))
                .build()?,
        )
        .await?;
    Ok(())
}

#[tokio::test]
async fn windows_split_activity_into_beginning_and_movement() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let cash = helpers::create_account(&ledger, 1910, "Cash", AccountType::Asset).await?;
    let sales = helpers::create_account(&ledger, 3000, "Sales", AccountType::Revenue).await?;
    helpers::open_year(&ledger, 2025).await?;

    post(&ledger, cash.id(), sales.id(), dec!(100.00), NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()).await?;
    post(&ledger, cash.id(), sales.id(), dec!(40.00), NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()).await?;
    post(&ledger, cash.id(), sales.id(), dec!(7.00), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()).await?;

    // February only: January is beginning, March is outside
    let from = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
    let to = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
    let balance = ledger
        .balances()
        .account_balance(cash.id(), Some(from), Some(to))
        .await?;
    assert_eq!(balance.details.beginning, dec!(100.00));
    assert_eq!(balance.details.debit, dec!(40.00));
    assert_eq!(balance.details.credit, Decimal::ZERO);
    assert_eq!(balance.ending(), dec!(140.00));

    let trial_balance = ledger.balances().trial_balance(Some(from), Some(to)).await?;
    assert!(trial_balance.is_balanced());
    let cash_row = trial_balance
        .rows
        .iter()
        .find(|r| r.account.id == cash.id())
        .unwrap();
    assert_eq!(cash_row.beginning, dec!(100.00));
    assert_eq!(cash_row.debit, dec!(40.00));
    Ok(())
}

#[tokio::test]
async fn opening_balances_seed_the_beginning() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let bank = ledger
        .accounts()
        .create(
            NewAccount::builder()
                .id(AccountId::new())
                .code(helpers::code(1930))
                .name("Bank")
                .account_type(AccountType::Asset)
                .opening_balance(dec!(5000.00))
                .build()?,
        )
        .await?;
    let equity = ledger
        .accounts()
        .create(
            NewAccount::builder()
                .id(AccountId::new())
                .code(helpers::code(2010))
                .name("Owner's equity")
                .account_type(AccountType::Equity)
                .opening_balance(dec!(-5000.00))
                .build()?,
        )
        .await?;

    let balance = ledger
        .balances()
        .account_balance(bank.id(), None, None)
        .await?;
    assert_eq!(balance.details.beginning, dec!(5000.00));
    assert_eq!(balance.ending(), dec!(5000.00));

    let equity_balance = ledger
        .balances()
        .account_balance(equity.id(), None, None)
        .await?;
    assert_eq!(equity_balance.normal_balance(), dec!(5000.00));

    let trial_balance = ledger.balances().trial_balance(None, None).await?;
    assert_eq!(trial_balance.totals.ending, Decimal::ZERO);
    Ok(())
}

#[tokio::test]
async fn roll_up_annotates_the_account_tree() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let assets = helpers::create_account(&ledger, 1000, "Assets", AccountType::Asset).await?;
    let cash = ledger
        .accounts()
        .create(
            NewAccount::builder()
                .id(AccountId::new())
                .code(helpers::code(1910))
                .name("Cash")
                .account_type(AccountType::Asset)
                .parent_code(helpers::code(1000))
                .build()?,
        )
        .await?;
    let card = ledger
        .accounts()
        .create(
            NewAccount::builder()
                .id(AccountId::new())
                .code(helpers::code(1580))
                .name("Card clearing")
                .account_type(AccountType::Asset)
                .parent_code(helpers::code(1000))
                .build()?,
        )
        .await?;
    let sales = helpers::create_account(&ledger, 3000, "Sales", AccountType::Revenue).await?;
    helpers::open_year(&ledger, 2025).await?;

    let date = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
    post(&ledger, cash.id(), sales.id(), dec!(70.00), date).await?;
    post(&ledger, card.id(), sales.id(), dec!(50.00), date).await?;

    let annotated = ledger.balances().roll_up(None, None).await?;
    let assets_node = annotated
        .iter()
        .find(|n| n.account.id == assets.id())
        .unwrap();
    assert_eq!(assets_node.own.ending, Decimal::ZERO);
    assert_eq!(assets_node.rolled_up.ending, dec!(120.00));
    assert_eq!(assets_node.children.len(), 2);
    Ok(())
}

#[tokio::test]
async fn statements_bucket_accounts_by_type() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let cash = helpers::create_account(&ledger, 1910, "Cash", AccountType::Asset).await?;
    let payable =
        helpers::create_account(&ledger, 2440, "Accounts payable", AccountType::Liability).await?;
    let sales = helpers::create_account(&ledger, 3000, "Sales", AccountType::Revenue).await?;
    let cogs = helpers::create_account(&ledger, 4010, "Cost of goods", AccountType::Expense).await?;
    helpers::open_year(&ledger, 2025).await?;

    let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
    post(&ledger, cash.id(), sales.id(), dec!(500.00), date).await?;
    post(&ledger, cogs.id(), payable.id(), dec!(180.00), date).await?;

    let income = ledger.balances().income_statement(None, None).await?;
    assert_eq!(income.total_revenue, dec!(500.00));
    assert_eq!(income.total_expenses, dec!(180.00));
    assert_eq!(income.net_income, dec!(320.00));
    assert_eq!(income.revenue.len(), 1);
    assert_eq!(income.revenue[0].account.id, sales.id());

    let sheet = ledger.balances().balance_sheet(None).await?;
    assert_eq!(sheet.total_assets, dec!(500.00));
    assert_eq!(sheet.total_liabilities, dec!(180.00));
    assert_eq!(sheet.total_equity, Decimal::ZERO);
    assert_eq!(sheet.retained_result, dec!(320.00));
    assert!(sheet.in_balance());
    Ok(())
}

#[tokio::test]
async fn statements_respect_the_reporting_window() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let cash = helpers::create_account(&ledger, 1910, "Cash", AccountType::Asset).await?;
    let sales = helpers::create_account(&ledger, 3000, "Sales", AccountType::Revenue).await?;
    helpers::open_year(&ledger, 2025).await?;

    post(&ledger, cash.id(), sales.id(), dec!(300.00), NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()).await?;
    post(&ledger, cash.id(), sales.id(), dec!(200.00), NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()).await?;

    let income = ledger
        .balances()
        .income_statement(
            Some(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()),
            Some(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()),
        )
        .await?;
    assert_eq!(income.total_revenue, dec!(200.00));

    let sheet = ledger
        .balances()
        .balance_sheet(Some(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()))
        .await?;
    assert_eq!(sheet.total_assets, dec!(300.00));
    Ok(())
}
