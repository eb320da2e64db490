// src/heuristics/mod.rs

mod generic;

use crate::fields::FieldKind;

/// Per-field results of the rule-based extractor. A missing field is
/// not an error; the pattern simply did not match.
#[derive(Debug, Clone, Default)]
pub struct PatternFields {
    pub invoice_number: Option<String>,
    pub invoice_date: Option<String>,
    pub seller_name: Option<String>,
    pub client_name: Option<String>,
    pub total: Option<String>,
}

impl PatternFields {
    /// The candidate for one field, if any. The line-item amount fields
    /// have no patterns and always come back empty here.
    pub fn get(&self, kind: FieldKind) -> Option<&str> {
        let value = match kind {
            FieldKind::InvoiceNumber => &self.invoice_number,
            FieldKind::InvoiceDate => &self.invoice_date,
            FieldKind::SellerName => &self.seller_name,
            FieldKind::ClientName => &self.client_name,
            FieldKind::Total => &self.total,
            _ => &None,
        };
        value.as_deref()
    }
}

/// Extract pattern-based candidates from raw invoice text.
pub fn extract(text: &str) -> PatternFields {
    generic::extract(text)
}
