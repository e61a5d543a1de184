//! Read-side aggregation: account balances, the trial balance, hierarchy
//! roll-ups and the two financial statements.
mod account_balance;
pub mod error;
mod repo;
mod rollup;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use mesa_types::account::AccountValues;

use crate::{account::tree, primitives::*};

pub use account_balance::{AccountBalance, BalanceAmounts};
use error::*;
use repo::*;
pub use rollup::AnnotatedAccount;

/// One account's line in the trial balance.
#[derive(Debug, sqlx::FromRow)]
pub struct TrialBalanceRow {
    #[sqlx(flatten)]
    pub account: AccountValues,
    pub beginning: Decimal,
    pub debit: Decimal,
    pub credit: Decimal,
}

impl TrialBalanceRow {
    pub fn amounts(&self) -> BalanceAmounts {
        BalanceAmounts::from_sums(self.beginning, self.debit, self.credit)
    }
}

/// All accounts with their window activity, plus the grand totals.
#[derive(Debug)]
pub struct TrialBalance {
    pub rows: Vec<TrialBalanceRow>,
    pub totals: BalanceAmounts,
}

impl TrialBalance {
    /// Total debits equal total credits, within the rounding tolerance.
    pub fn is_balanced(&self) -> bool {
        (self.totals.debit - self.totals.credit).abs() <= BALANCE_TOLERANCE
    }
}

/// One account's contribution to a financial statement, expressed in the
/// sign convention natural to its section.
#[derive(Debug)]
pub struct StatementLine {
    pub account: AccountValues,
    pub amount: Decimal,
}

#[derive(Debug)]
pub struct IncomeStatement {
    pub revenue: Vec<StatementLine>,
    pub expenses: Vec<StatementLine>,
    pub total_revenue: Decimal,
    pub total_expenses: Decimal,
    pub net_income: Decimal,
}

#[derive(Debug)]
pub struct BalanceSheet {
    pub assets: Vec<StatementLine>,
    pub liabilities: Vec<StatementLine>,
    pub equity: Vec<StatementLine>,
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub total_equity: Decimal,
    /// Net result accumulated on revenue and expense accounts, which has not
    /// been closed into equity yet.
    pub retained_result: Decimal,
}

impl BalanceSheet {
    pub fn in_balance(&self) -> bool {
        let diff =
            self.total_assets - self.total_liabilities - self.total_equity - self.retained_result;
        diff.abs() <= BALANCE_TOLERANCE
    }
}

/// Service computing balances over the journal.
#[derive(Clone)]
pub struct Balances {
    repo: BalanceRepo,
}

impl Balances {
    pub(crate) fn new(pool: &PgPool) -> Self {
        Self {
            repo: BalanceRepo::new(pool),
        }
    }

    /// Balance of one account over `[from, to]`; either bound may be open.
    #[instrument(name = "mesa_ledger.balance.account_balance", skip(self), err)]
    pub async fn account_balance(
        &self,
        account_id: AccountId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<AccountBalance, BalanceError> {
        let account = self.repo.find_account(account_id).await?;
        let beginning = self.repo.beginning_balance(account_id, from).await?;
        let (debit, credit) = self.repo.range_sums(account_id, from, to).await?;
        Ok(AccountBalance {
            balance_type: account.normal_balance_type,
            details: BalanceAmounts::from_sums(beginning, debit, credit),
        })
    }

    #[instrument(name = "mesa_ledger.balance.trial_balance", skip(self), err)]
    pub async fn trial_balance(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<TrialBalance, BalanceError> {
        let rows = self.repo.trial_balance_rows(from, to).await?;
        let mut totals = BalanceAmounts::default();
        for row in &rows {
            totals.accumulate(&row.amounts());
        }
        Ok(TrialBalance { rows, totals })
    }

    /// The chart of accounts annotated with per-account and per-subtree
    /// figures for the window.
    #[instrument(name = "mesa_ledger.balance.roll_up", skip(self), err)]
    pub async fn roll_up(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<AnnotatedAccount>, BalanceError> {
        let rows = self.repo.trial_balance_rows(from, to).await?;
        let amounts = rows
            .iter()
            .map(|row| (row.account.id, row.amounts()))
            .collect();
        let forest = tree::build_forest(rows.into_iter().map(|row| row.account).collect());
        Ok(rollup::annotate_forest(forest, &amounts))
    }

    /// Revenue and expense activity within the window. Accounts with no
    /// activity are omitted.
    #[instrument(name = "mesa_ledger.balance.income_statement", skip(self), err)]
    pub async fn income_statement(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<IncomeStatement, BalanceError> {
        let rows = self.repo.trial_balance_rows(from, to).await?;
        let mut revenue = Vec::new();
        let mut expenses = Vec::new();
        for row in rows {
            if row.debit.is_zero() && row.credit.is_zero() {
                continue;
            }
            match row.account.account_type {
                AccountType::Revenue => {
                    let amount = row.credit - row.debit;
                    revenue.push(StatementLine {
                        account: row.account,
                        amount,
                    });
                }
                AccountType::Expense => {
                    let amount = row.debit - row.credit;
                    expenses.push(StatementLine {
                        account: row.account,
                        amount,
                    });
                }
                _ => (),
            }
        }
        let total_revenue: Decimal = revenue.iter().map(|l| l.amount).sum();
        let total_expenses: Decimal = expenses.iter().map(|l| l.amount).sum();
        Ok(IncomeStatement {
            revenue,
            expenses,
            total_revenue,
            total_expenses,
            net_income: total_revenue - total_expenses,
        })
    }

    /// Financial position as of `as_of` (today's data included when `None`).
    /// The unclosed result of revenue and expense accounts is reported as
    /// `retained_result`.
    #[instrument(name = "mesa_ledger.balance.balance_sheet", skip(self), err)]
    pub async fn balance_sheet(
        &self,
        as_of: Option<NaiveDate>,
    ) -> Result<BalanceSheet, BalanceError> {
        let rows = self.repo.trial_balance_rows(None, as_of).await?;
        let mut assets = Vec::new();
        let mut liabilities = Vec::new();
        let mut equity = Vec::new();
        let mut retained_result = Decimal::ZERO;
        for row in rows {
            let ending = row.amounts().ending;
            if ending.is_zero() {
                continue;
            }
            match row.account.account_type {
                AccountType::Asset => assets.push(StatementLine {
                    account: row.account,
                    amount: ending,
                }),
                AccountType::Liability => liabilities.push(StatementLine {
                    account: row.account,
                    amount: -ending,
                }),
                AccountType::Equity => equity.push(StatementLine {
                    account: row.account,
                    amount: -ending,
                }),
                AccountType::Revenue | AccountType::Expense => {
                    retained_result -= ending;
                }
            }
        }
        let total_assets: Decimal = assets.iter().map(|l| l.amount).sum();
        let total_liabilities: Decimal = liabilities.iter().map(|l| l.amount).sum();
        let total_equity: Decimal = equity.iter().map(|l| l.amount).sum();
        Ok(BalanceSheet {
            assets,
            liabilities,
            equity,
            total_assets,
            total_liabilities,
            total_equity,
            retained_result,
        })
    }
}
