// src/heuristics/generic.rs

use super::PatternFields;
use regex::Regex;

/// Main extraction entry point — keyword-anchored regex rules per field.
pub fn extract(text: &str) -> PatternFields {
    PatternFields {
        invoice_number: extract_invoice_number(text),
        invoice_date: extract_invoice_date(text),
        seller_name: extract_seller_name(text),
        client_name: extract_client_name(text),
        total: extract_total(text),
    }
}

// ---------------------------------------------------------------------------
// Scalar field extractors
// ---------------------------------------------------------------------------

fn extract_invoice_number(text: &str) -> Option<String> {
    // Earlier patterns are more specific and win outright
    first_capture(
        text,
        &[
            r"(?i)Invoice\s+no:?\s*(\d+)",
            r"(?i)Invoice\s+number:?\s*(\d+)",
            r"#\s*(\d+)",
        ],
    )
}

fn extract_invoice_date(text: &str) -> Option<String> {
    first_capture(
        text,
        &[
            r"(?i)Date\s+of\s+issue:?\s*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4})",
            r"(?i)Date:?\s*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4})",
            r"(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4})",
        ],
    )
}

fn extract_seller_name(text: &str) -> Option<String> {
    // The name runs until the next keyword, a number block, or the end
    let re = Regex::new(r"(?i)Seller:?\s*([A-Za-z\s\-&,]+?)(?:\s+Client|\s+\d|\s*$)").ok()?;
    re.captures(text).map(|c| c[1].trim().to_string())
}

fn extract_client_name(text: &str) -> Option<String> {
    let re = Regex::new(r"(?i)Client:?\s*([A-Za-z\s\-&]+?)(?:\s+\d|\s+Tax|\s*$)").ok()?;
    re.captures(text).map(|c| c[1].trim().to_string())
}

/// First capture group of the first pattern that matches.
fn first_capture(text: &str, patterns: &[&str]) -> Option<String> {
    for pattern in patterns {
        let Ok(re) = Regex::new(pattern) else {
            continue;
        };
        if let Some(cap) = re.captures(text) {
            return Some(cap[1].trim().to_string());
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Monetary total
// ---------------------------------------------------------------------------

/// Find the grand total by scanning summary lines bottom-up.
///
/// Totals sit at the bottom of the document and are right-aligned after
/// a currency symbol or preceding subtotal figures, so the last "total"
/// line wins and the rightmost numeric token on it is the value.
fn extract_total(text: &str) -> Option<String> {
    for line in text.lines().rev() {
        if line.to_lowercase().contains("total") {
            if let Some(val) = rightmost_amount(line) {
                return Some(val);
            }
        }
    }

    // Secondary summary keyword used by this invoice corpus
    let gross = Regex::new(r"(?i)gross\s*worth").ok()?;
    for line in text.lines().rev() {
        if gross.is_match(line) {
            if let Some(val) = rightmost_amount(line) {
                return Some(val);
            }
        }
    }

    rightmost_amount(text)
}

/// Rightmost numeric token: a maximal run of digits with interior
/// spaces, commas, or periods.
fn rightmost_amount(text: &str) -> Option<String> {
    let re = Regex::new(r"\d[\d\s.,]*\d").ok()?;
    re.find_iter(text)
        .last()
        .map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_number_keyword_variants() {
        assert_eq!(
            extract_invoice_number("Invoice no: 12345"),
            Some("12345".to_string())
        );
        assert_eq!(
            extract_invoice_number("Invoice number 98765"),
            Some("98765".to_string())
        );
        assert_eq!(
            extract_invoice_number("Order # 555"),
            Some("555".to_string())
        );
        assert_eq!(extract_invoice_number("no identifiers here"), None);
    }

    #[test]
    fn invoice_number_prefers_specific_pattern() {
        // "# 999" also matches, but the keyword-anchored rule is earlier
        let text = "Ref # 999\nInvoice no: 12345";
        assert_eq!(extract_invoice_number(text), Some("12345".to_string()));
    }

    #[test]
    fn date_of_issue_wins_over_bare_date() {
        let text = "Printed 01/01/2020\nDate of issue: 12/06/2025";
        assert_eq!(extract_invoice_date(text), Some("12/06/2025".to_string()));
    }

    #[test]
    fn bare_date_fallback() {
        assert_eq!(
            extract_invoice_date("due 3-11-2024 net 30"),
            Some("3-11-2024".to_string())
        );
    }

    #[test]
    fn seller_stops_at_client_keyword() {
        let text = "Seller: Acme Widgets Client: Beta Industrial";
        assert_eq!(extract_seller_name(text), Some("Acme Widgets".to_string()));
        assert_eq!(
            extract_client_name(text),
            Some("Beta Industrial".to_string())
        );
    }

    #[test]
    fn client_stops_at_tax_block() {
        let text = "Client: Rodriguez and Sons Tax Id: 922-81-1234";
        assert_eq!(
            extract_client_name(text),
            Some("Rodriguez and Sons".to_string())
        );
    }

    #[test]
    fn last_total_line_wins_rightmost_token() {
        let text = "Subtotal  US$ 100,00\nVAT 20,00\nTotal  US$ 120,00";
        assert_eq!(extract_total(text), Some("120,00".to_string()));
    }

    #[test]
    fn total_line_without_amount_falls_back_to_earlier_line() {
        let text = "Total 3 440,50\nTotal due upon receipt";
        assert_eq!(extract_total(text), Some("3 440,50".to_string()));
    }

    #[test]
    fn gross_worth_fallback() {
        let text = "Items 2\nGross worth 1 250,00\nThank you";
        assert_eq!(extract_total(text), Some("1 250,00".to_string()));
    }

    #[test]
    fn rightmost_token_in_text_as_last_resort() {
        let text = "amount due 54,10 by friday";
        assert_eq!(extract_total(text), Some("54,10".to_string()));
    }

    #[test]
    fn no_total_in_empty_text() {
        assert_eq!(extract_total(""), None);
    }
}
