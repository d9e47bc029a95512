use super::{extract_date, parse_amount, Contribution, ParseAnomaly, SalesPipeline};
use crate::domain::category::Classifier;
use crate::domain::record::OrderLineRecord;
use rust_decimal::Decimal;

/// Order lines by record date. Only Product and Service come out of here.
#[derive(Debug, Clone, Copy)]
pub struct OrderPipeline<'a> {
    classifier: &'a Classifier,
}

impl<'a> OrderPipeline<'a> {
    pub fn new(classifier: &'a Classifier) -> Self {
        Self { classifier }
    }
}

impl SalesPipeline for OrderPipeline<'_> {
    type Record = OrderLineRecord;
    const NAME: &'static str = "order";

    fn contribution(&self, record: &OrderLineRecord) -> Result<Contribution, ParseAnomaly> {
        let date = extract_date(record.record_date.as_deref())?;

        let amount = parse_amount(record.extended_price.as_deref());
        if amount.is_zero() {
            return Err(ParseAnomaly::ZeroAmount);
        }
        if amount < Decimal::ZERO {
            return Err(ParseAnomaly::NegativeAmount(amount));
        }

        Ok(Contribution {
            date,
            category: self.classifier.classify(record.product_code.as_deref()),
            amount,
        })
    }
}
