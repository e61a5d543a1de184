mod config;
mod domain;
pub mod error;
mod mapping;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::instrument;

use crate::{
    account::Accounts,
    balance::Balances,
    integrity::Integrity,
    journal::{error::JournalError, JournalEntries, JournalEntry, NewJournalEntry, NewPosting},
    ledger_operation::LedgerOperation,
    period::PeriodGuard,
    primitives::*,
};

pub use config::*;
pub use domain::*;
pub use error::LedgerError;
pub use mapping::*;

/// An embedded double-entry ledger for back-office accounting.
#[derive(Clone)]
pub struct MesaLedger {
    pool: PgPool,
    accounts: Accounts,
    period_guard: PeriodGuard,
    journal: JournalEntries,
    integrity: Integrity,
    balances: Balances,
    mapping: AccountMapping,
}

impl MesaLedger {
    pub async fn init(config: MesaLedgerConfig) -> Result<Self, LedgerError> {
        let pool = match (config.pool, config.pg_con) {
            (Some(pool), None) => pool,
            (None, Some(pg_con)) => {
                let mut pool_opts = PgPoolOptions::new();
                if let Some(max_connections) = config.max_connections {
                    pool_opts = pool_opts.max_connections(max_connections);
                }
                pool_opts.connect(&pg_con).await?
            }
            _ => {
                return Err(LedgerError::Config(
                    "One of pg_con or pool must be set".to_string(),
                ))
            }
        };
        if config.exec_migrations {
            sqlx::migrate!().run(&pool).await?;
        }

        let accounts = Accounts::new(&pool);
        let period_guard = PeriodGuard::new(&pool);
        let journal = JournalEntries::new(&pool, &period_guard);
        let integrity = Integrity::new(&pool);
        let balances = Balances::new(&pool);
        Ok(Self {
            pool,
            accounts,
            period_guard,
            journal,
            integrity,
            balances,
            mapping: config.account_mapping,
        })
    }

    pub async fn begin_operation(&self) -> Result<LedgerOperation<'static>, LedgerError> {
        Ok(LedgerOperation::init(&self.pool).await?)
    }

    pub fn accounts(&self) -> &Accounts {
        &self.accounts
    }

    pub fn period_guard(&self) -> &PeriodGuard {
        &self.period_guard
    }

    pub fn journal(&self) -> &JournalEntries {
        &self.journal
    }

    pub fn integrity(&self) -> &Integrity {
        &self.integrity
    }

    pub fn balances(&self) -> &Balances {
        &self.balances
    }

    pub fn account_mapping(&self) -> &AccountMapping {
        &self.mapping
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Posts the journal entry for a customer sale: the settlement account is
    /// debited with the gross total, sales credited with the net subtotal and
    /// output VAT credited when due.
    #[instrument(name = "mesa_ledger.create_invoice_entry", skip(self, entry))]
    pub async fn create_invoice_entry(
        &self,
        entry: InvoiceEntry,
    ) -> Result<JournalEntry, LedgerError> {
        let mut op = self.begin_operation().await?;
        let entry = self.create_invoice_entry_in_op(&mut op, entry).await?;
        op.commit().await?;
        Ok(entry)
    }

    pub async fn create_invoice_entry_in_op(
        &self,
        op: &mut LedgerOperation<'_>,
        entry: InvoiceEntry,
    ) -> Result<JournalEntry, LedgerError> {
        let branch = self.branch_accounts(&entry.branch)?;
        let settlement_code = branch.settlement_account(entry.payment_method).ok_or_else(|| {
            JournalError::Configuration(format!(
                "branch '{}' has no settlement account for payment method '{}'",
                entry.branch, entry.payment_method
            ))
        })?;
        let vat_code = self.vat_code(branch.vat_output, entry.vat_amount, &entry.branch, "output")?;
        let settlement = self.accounts.find_by_code_in_op(op, settlement_code).await?;
        let sales = self.accounts.find_by_code_in_op(op, branch.sales).await?;

        let mut builder = NewJournalEntry::builder();
        builder
            .id(JournalEntryId::new())
            .description(entry.description)
            .entry_date(entry.entry_date)
            .reference(crate::primitives::DocumentReference {
                kind: DocumentKind::Invoice,
                id: entry.invoice_id,
            })
            .posting(NewPosting::debit(
                settlement.id(),
                entry.subtotal + entry.vat_amount,
            ))
            .posting(NewPosting::credit(sales.id(), entry.subtotal));
        if let Some(vat_code) = vat_code {
            let vat = self.accounts.find_by_code_in_op(op, vat_code).await?;
            builder.posting(NewPosting::credit(vat.id(), entry.vat_amount));
        }
        let new_entry = builder
            .build()
            .map_err(|e| LedgerError::Config(e.to_string()))?;
        Ok(self.journal.create_in_op(op, new_entry).await?)
    }

    /// Posts the journal entry for a paid expense: the expense account and
    /// input VAT are debited, the settlement account credited with the gross
    /// total.
    #[instrument(name = "mesa_ledger.create_expense_entry", skip(self, entry))]
    pub async fn create_expense_entry(
        &self,
        entry: ExpenseEntry,
    ) -> Result<JournalEntry, LedgerError> {
        let mut op = self.begin_operation().await?;
        let entry = self.create_expense_entry_in_op(&mut op, entry).await?;
        op.commit().await?;
        Ok(entry)
    }

    pub async fn create_expense_entry_in_op(
        &self,
        op: &mut LedgerOperation<'_>,
        entry: ExpenseEntry,
    ) -> Result<JournalEntry, LedgerError> {
        let branch = self.branch_accounts(&entry.branch)?;
        let settlement_code = branch.settlement_account(entry.payment_method).ok_or_else(|| {
            JournalError::Configuration(format!(
                "branch '{}' has no settlement account for payment method '{}'",
                entry.branch, entry.payment_method
            ))
        })?;
        let vat_code = self.vat_code(branch.vat_input, entry.vat_amount, &entry.branch, "input")?;
        let expense = self
            .accounts
            .find_by_code_in_op(op, entry.expense_account)
            .await?;
        let settlement = self.accounts.find_by_code_in_op(op, settlement_code).await?;

        let mut builder = NewJournalEntry::builder();
        builder
            .id(JournalEntryId::new())
            .description(entry.description)
            .entry_date(entry.entry_date)
            .reference(crate::primitives::DocumentReference {
                kind: DocumentKind::Expense,
                id: entry.expense_id,
            })
            .posting(NewPosting::debit(expense.id(), entry.net_amount))
            .posting(NewPosting::credit(
                settlement.id(),
                entry.net_amount + entry.vat_amount,
            ));
        if let Some(vat_code) = vat_code {
            let vat = self.accounts.find_by_code_in_op(op, vat_code).await?;
            builder.posting(NewPosting::debit(vat.id(), entry.vat_amount));
        }
        let new_entry = builder
            .build()
            .map_err(|e| LedgerError::Config(e.to_string()))?;
        Ok(self.journal.create_in_op(op, new_entry).await?)
    }

    /// Posts the journal entry for a supplier invoice bought on credit: the
    /// expense account and input VAT are debited, accounts payable credited
    /// with the gross total.
    #[instrument(name = "mesa_ledger.create_supplier_invoice_entry", skip(self, entry))]
    pub async fn create_supplier_invoice_entry(
        &self,
        entry: SupplierInvoiceEntry,
    ) -> Result<JournalEntry, LedgerError> {
        let mut op = self.begin_operation().await?;
        let entry = self
            .create_supplier_invoice_entry_in_op(&mut op, entry)
            .await?;
        op.commit().await?;
        Ok(entry)
    }

    pub async fn create_supplier_invoice_entry_in_op(
        &self,
        op: &mut LedgerOperation<'_>,
        entry: SupplierInvoiceEntry,
    ) -> Result<JournalEntry, LedgerError> {
        let branch = self.branch_accounts(&entry.branch)?;
        let vat_code = self.vat_code(branch.vat_input, entry.vat_amount, &entry.branch, "input")?;
        let expense = self
            .accounts
            .find_by_code_in_op(op, entry.expense_account)
            .await?;
        let payable = self.accounts.find_by_code_in_op(op, branch.payable).await?;

        let mut builder = NewJournalEntry::builder();
        builder
            .id(JournalEntryId::new())
            .description(entry.description)
            .entry_date(entry.entry_date)
            .reference(crate::primitives::DocumentReference {
                kind: DocumentKind::SupplierInvoice,
                id: entry.supplier_invoice_id,
            })
            .posting(NewPosting::debit(expense.id(), entry.net_amount))
            .posting(NewPosting::credit(
                payable.id(),
                entry.net_amount + entry.vat_amount,
            ));
        if let Some(vat_code) = vat_code {
            let vat = self.accounts.find_by_code_in_op(op, vat_code).await?;
            builder.posting(NewPosting::debit(vat.id(), entry.vat_amount));
        }
        let new_entry = builder
            .build()
            .map_err(|e| LedgerError::Config(e.to_string()))?;
        Ok(self.journal.create_in_op(op, new_entry).await?)
    }

    fn branch_accounts(&self, branch: &str) -> Result<&BranchAccounts, LedgerError> {
        Ok(self.mapping.branch(branch).ok_or_else(|| {
            JournalError::Configuration(format!("no account mapping for branch '{branch}'"))
        })?)
    }

    /// A VAT line is only emitted for a positive amount; a positive amount
    /// without a mapped VAT account is a configuration error.
    fn vat_code(
        &self,
        code: Option<AccountCode>,
        vat_amount: rust_decimal::Decimal,
        branch: &str,
        side: &str,
    ) -> Result<Option<AccountCode>, LedgerError> {
        if vat_amount <= rust_decimal::Decimal::ZERO {
            return Ok(None);
        }
        match code {
            Some(code) => Ok(Some(code)),
            None => Err(JournalError::Configuration(format!(
                "branch '{branch}' has no {side} VAT account but VAT of {vat_amount} was given"
            ))
            .into()),
        }
    }
}
