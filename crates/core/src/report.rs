use crate::aggregate::{aggregate, InvoicePipeline, OrderPipeline, SalesPipeline};
use crate::config::Settings;
use crate::domain::category::Classifier;
use crate::domain::sales::SalesEntry;
use crate::ido::{IdoError, LoadRequest, RecordSource};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Order,
    Invoice,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Order => f.write_str("order"),
            ReportKind::Invoice => f.write_str("invoice"),
        }
    }
}

/// Fetches one collection and folds it into flattened daily sales.
///
/// Nothing is cached: every call issues exactly one upstream load.
#[derive(Clone)]
pub struct SalesReporter {
    source: Arc<dyn RecordSource>,
    classifier: Classifier,
    order_collection: String,
    invoice_collection: String,
}

impl SalesReporter {
    pub fn new(
        source: Arc<dyn RecordSource>,
        classifier: Classifier,
        order_collection: impl Into<String>,
        invoice_collection: impl Into<String>,
    ) -> Self {
        Self {
            source,
            classifier,
            order_collection: order_collection.into(),
            invoice_collection: invoice_collection.into(),
        }
    }

    pub fn from_settings(settings: &Settings, source: Arc<dyn RecordSource>) -> Self {
        Self::new(
            source,
            Classifier::new(&settings.service_product_codes),
            settings.order_collection.clone(),
            settings.invoice_collection.clone(),
        )
    }

    pub async fn report(
        &self,
        kind: ReportKind,
        filter: Option<&str>,
    ) -> Result<Vec<SalesEntry>, IdoError> {
        match kind {
            ReportKind::Order => {
                let pipeline = OrderPipeline::new(&self.classifier);
                self.run(&pipeline, &self.order_collection, filter).await
            }
            ReportKind::Invoice => {
                let pipeline = InvoicePipeline::new(&self.classifier);
                self.run(&pipeline, &self.invoice_collection, filter).await
            }
        }
    }

    async fn run<P>(
        &self,
        pipeline: &P,
        collection: &str,
        filter: Option<&str>,
    ) -> Result<Vec<SalesEntry>, IdoError>
    where
        P: SalesPipeline + Sync,
    {
        let mut request = LoadRequest::new(collection, pipeline.properties());
        if let Some(filter) = filter {
            request = request.with_filter(filter);
        }

        let records = self.source.load_collection(&request).await?;
        Ok(aggregate(pipeline, &records).flatten())
    }
}

impl fmt::Debug for SalesReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SalesReporter")
            .field("classifier", &self.classifier)
            .field("order_collection", &self.order_collection)
            .field("invoice_collection", &self.invoice_collection)
            .finish_non_exhaustive()
    }
}
