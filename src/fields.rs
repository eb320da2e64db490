// src/fields.rs

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One structured field of an invoice, matching the tagging model's
/// label set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldKind {
    InvoiceNumber,
    InvoiceDate,
    SellerName,
    ClientName,
    Price,
    Vat,
    NetWorth,
    Total,
}

/// How the arbitration engine resolves a field from its two sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Best-scoring purely-numeric model candidate, pattern fallback.
    NumericBestOf,
    /// Pattern candidate when it looks like a full date, else model
    /// fragment reconstruction.
    DatePreferPattern,
    /// Pattern candidate unconditionally, else best model candidate.
    TotalPreferPattern,
    /// Joined model composite, pattern fallback.
    GenericJoin,
}

impl FieldKind {
    /// Every field, in output order.
    pub const ALL: [FieldKind; 8] = [
        FieldKind::InvoiceNumber,
        FieldKind::InvoiceDate,
        FieldKind::SellerName,
        FieldKind::ClientName,
        FieldKind::Price,
        FieldKind::Vat,
        FieldKind::NetWorth,
        FieldKind::Total,
    ];

    /// The model-side label for this field.
    pub fn label(self) -> &'static str {
        match self {
            FieldKind::InvoiceNumber => "INVOICE_NUMBER",
            FieldKind::InvoiceDate => "INVOICE_DATE",
            FieldKind::SellerName => "SELLER_NAME",
            FieldKind::ClientName => "CLIENT_NAME",
            FieldKind::Price => "PRICE",
            FieldKind::Vat => "VAT",
            FieldKind::NetWorth => "NET_WORTH",
            FieldKind::Total => "TOTAL",
        }
    }

    /// Parse a model-side label. Labels outside the closed set (the
    /// training data also carries addresses, tax ids, etc.) map to None.
    pub fn from_label(label: &str) -> Option<FieldKind> {
        FieldKind::ALL.into_iter().find(|k| k.label() == label)
    }

    /// Numeric, date and monetary fields that the tokenizer commonly
    /// splits into sub-token fragments.
    pub fn fragment_prone(self) -> bool {
        matches!(
            self,
            FieldKind::InvoiceNumber
                | FieldKind::InvoiceDate
                | FieldKind::Price
                | FieldKind::Total
                | FieldKind::Vat
                | FieldKind::NetWorth
        )
    }

    /// Name-like fields that get punctuation restored from the source
    /// text.
    pub fn name_like(self) -> bool {
        matches!(self, FieldKind::SellerName | FieldKind::ClientName)
    }

    pub fn strategy(self) -> Strategy {
        match self {
            FieldKind::InvoiceNumber => Strategy::NumericBestOf,
            FieldKind::InvoiceDate => Strategy::DatePreferPattern,
            FieldKind::Total => Strategy::TotalPreferPattern,
            _ => Strategy::GenericJoin,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The extraction output: field → final value. Fields with no
/// sufficiently confident candidate from either source are absent,
/// never present with an empty value.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct FieldMap(BTreeMap<FieldKind, String>);

impl FieldMap {
    pub fn insert(&mut self, kind: FieldKind, value: String) {
        self.0.insert(kind, value);
    }

    pub fn get(&self, kind: FieldKind) -> Option<&str> {
        self.0.get(&kind).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKind, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// How many fields were successfully extracted (out of all known).
    pub fn coverage(&self) -> (usize, usize) {
        (self.0.len(), FieldKind::ALL.len())
    }
}
