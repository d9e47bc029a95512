use super::{extract_date, parse_amount, Contribution, ParseAnomaly, SalesPipeline};
use crate::domain::category::{Category, Classifier};
use crate::domain::record::InvoiceLedgerRecord;

/// Ledger lines by invoice date. Description keywords win over product codes.
#[derive(Debug, Clone, Copy)]
pub struct InvoicePipeline<'a> {
    classifier: &'a Classifier,
}

impl<'a> InvoicePipeline<'a> {
    pub fn new(classifier: &'a Classifier) -> Self {
        Self { classifier }
    }

    fn categorize(&self, record: &InvoiceLedgerRecord) -> Category {
        let description = record
            .description
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();

        if description.contains("freight") {
            Category::Freight
        } else if description.contains("misc") {
            Category::Misc
        } else {
            let code = record.product_code().map(str::to_uppercase);
            self.classifier.classify(code.as_deref())
        }
    }
}

impl SalesPipeline for InvoicePipeline<'_> {
    type Record = InvoiceLedgerRecord;
    const NAME: &'static str = "invoice";

    fn contribution(&self, record: &InvoiceLedgerRecord) -> Result<Contribution, ParseAnomaly> {
        let date = extract_date(record.invoice_date.as_deref())?;

        // Debits and credits both count as volume.
        let amount = parse_amount(record.amount.as_deref()).abs();
        if amount.is_zero() {
            return Err(ParseAnomaly::ZeroAmount);
        }

        Ok(Contribution {
            date,
            category: self.categorize(record),
            amount,
        })
    }
}
