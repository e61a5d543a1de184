use chrono::NaiveDate;
use derive_builder::Builder;
use rust_decimal::Decimal;

use crate::primitives::*;

/// A customer sale to be posted: settlement against sales and output VAT.
#[derive(Builder, Debug, Clone)]
pub struct InvoiceEntry {
    #[builder(setter(into))]
    pub invoice_id: DocumentId,
    #[builder(setter(into))]
    pub branch: String,
    pub payment_method: PaymentMethod,
    /// Net sales amount, excluding VAT.
    pub subtotal: Decimal,
    #[builder(default = "Decimal::ZERO")]
    pub vat_amount: Decimal,
    pub entry_date: NaiveDate,
    #[builder(setter(into))]
    pub description: String,
}

impl InvoiceEntry {
    pub fn builder() -> InvoiceEntryBuilder {
        InvoiceEntryBuilder::default()
    }

    pub fn total(&self) -> Decimal {
        self.subtotal + self.vat_amount
    }
}

/// A paid expense to be posted: expense and input VAT against settlement.
#[derive(Builder, Debug, Clone)]
pub struct ExpenseEntry {
    #[builder(setter(into))]
    pub expense_id: DocumentId,
    #[builder(setter(into))]
    pub branch: String,
    pub payment_method: PaymentMethod,
    /// The expense account to charge.
    #[builder(setter(into))]
    pub expense_account: AccountCode,
    /// Net expense amount, excluding VAT.
    pub net_amount: Decimal,
    #[builder(default = "Decimal::ZERO")]
    pub vat_amount: Decimal,
    pub entry_date: NaiveDate,
    #[builder(setter(into))]
    pub description: String,
}

impl ExpenseEntry {
    pub fn builder() -> ExpenseEntryBuilder {
        ExpenseEntryBuilder::default()
    }

    pub fn total(&self) -> Decimal {
        self.net_amount + self.vat_amount
    }
}

/// A supplier invoice to be posted on credit: expense and input VAT against
/// accounts payable.
#[derive(Builder, Debug, Clone)]
pub struct SupplierInvoiceEntry {
    #[builder(setter(into))]
    pub supplier_invoice_id: DocumentId,
    #[builder(setter(into))]
    pub branch: String,
    #[builder(setter(into))]
    pub expense_account: AccountCode,
    /// Net amount, excluding VAT.
    pub net_amount: Decimal,
    #[builder(default = "Decimal::ZERO")]
    pub vat_amount: Decimal,
    pub entry_date: NaiveDate,
    #[builder(setter(into))]
    pub description: String,
}

impl SupplierInvoiceEntry {
    pub fn builder() -> SupplierInvoiceEntryBuilder {
        SupplierInvoiceEntryBuilder::default()
    }

    pub fn total(&self) -> Decimal {
        self.net_amount + self.vat_amount
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn it_builds() {
        let entry = InvoiceEntry::builder()
            .invoice_id(DocumentId::new())
            .branch("downtown")
            .payment_method(PaymentMethod::Cash)
            .subtotal(dec!(200))
            .vat_amount(dec!(30))
            .entry_date(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap())
            .description("Cash sale")
            .build()
            .unwrap();
        assert_eq!(entry.total(), dec!(230));
    }

    #[test]
    fn vat_defaults_to_zero() {
        let entry = ExpenseEntry::builder()
            .expense_id(DocumentId::new())
            .branch("downtown")
            .payment_method(PaymentMethod::Card)
            .expense_account("4010".parse::<AccountCode>().unwrap())
            .net_amount(dec!(80))
            .entry_date(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap())
            .description("Produce")
            .build()
            .unwrap();
        assert_eq!(entry.vat_amount, Decimal::ZERO);
        assert_eq!(entry.total(), dec!(80));
    }
}
