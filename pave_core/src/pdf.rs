//! # PDF Generation Module
//!
//! Renders customer quotes to PDF using Typst.
//!
//! ## Architecture
//!
//! - The Typst template is embedded as a string constant
//! - Data is injected via placeholder replacement before compilation
//! - Fonts come from `typst-assets`, so no files are read at runtime
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use pave_core::calculations::sealcoat::{estimate, SealcoatInput};
//! use pave_core::pdf::render_quote_pdf;
//! use pave_core::quote::{CustomerInfo, Quote};
//! use pave_core::rates::RateConfig;
//!
//! let rates = RateConfig::default();
//! let input = SealcoatInput::new(5000.0);
//! let result = estimate(&input, &rates).unwrap();
//! let quote = Quote::from_estimate(&input, &result, CustomerInfo::named("Acme"), Utc::now()).unwrap();
//!
//! let pdf_bytes = render_quote_pdf(&quote, &rates.business).unwrap();
//! std::fs::write("quote.pdf", pdf_bytes).unwrap();
//! ```

use chrono::Utc;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::errors::{CalcError, CalcResult};
use crate::quote::Quote;
use crate::rates::BusinessProfile;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    /// The main source document
    main: Source,
    /// Font book
    book: LazyHash<FontBook>,
    /// Available fonts
    fonts: Vec<Font>,
    /// Library (standard functions)
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    fn load_fonts() -> Vec<Font> {
        typst_assets::fonts()
            .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
            .collect()
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// PDF Template
// ============================================================================

/// Typst template for a customer quote
const QUOTE_TEMPLATE: &str = r##"
#set page(
  paper: "us-letter",
  margin: (top: 0.9in, bottom: 0.9in, left: 0.9in, right: 0.9in),
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[Quote {{QUOTE_NUMBER}}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[Valid until {{VALID_UNTIL}}]],
    )
  ]
)

#set text(font: "Libertinus Serif", size: 11pt)

#grid(
  columns: (1fr, auto),
  [
    #text(size: 18pt, weight: "bold")[{{BUSINESS_NAME}}] \
    {{BUSINESS_ADDRESS}} \
    {{BUSINESS_PHONE}} · {{BUSINESS_EMAIL}}
  ],
  align(right)[
    #text(size: 16pt, weight: "bold")[QUOTE] \
    No. {{QUOTE_NUMBER}} \
    Date: {{DATE}}
  ],
)

#v(16pt)

#block(width: 100%, fill: rgb("#f0f0f0"), inset: 10pt, radius: 4pt)[
  *Prepared for:* {{CUSTOMER_NAME}} \
  {{CUSTOMER_ADDRESS}} \
  Phone: {{CUSTOMER_PHONE}} · Email: {{CUSTOMER_EMAIL}} \
  *Job site:* {{SITE_LOCATION}}
]

#v(12pt)

#table(
  columns: (1fr, auto, auto, auto, auto),
  align: (left, right, left, right, right),
  stroke: 0.5pt + gray,
  table.header([*Description*], [*Qty*], [*Unit*], [*Unit Price*], [*Total*]),
{{LINE_ROWS}}
)

#v(8pt)

#align(right)[
  #grid(
    columns: (auto, 6em),
    gutter: 6pt,
    align(right)[Subtotal:], align(right)[\${{SUBTOTAL}}],
    align(right)[Sales tax ({{TAX_PERCENT}}%):], align(right)[\${{SALES_TAX}}],
    align(right)[*Total:*], align(right)[*\${{TOTAL}}*],
  )
]

#v(12pt)

Estimated completion: {{COMPLETION_DAYS}} working day(s), weather permitting.

{{NOTES}}

#v(24pt)

#grid(
  columns: (1fr, 1fr),
  gutter: 30pt,
  [#line(length: 100%) Accepted by (customer)],
  [#line(length: 100%) Date],
)
"##;

/// Render a quote to PDF.
///
/// # Arguments
///
/// * `quote` - The quote to render
/// * `business` - Contractor details for the letterhead
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(CalcError::Internal)` - Typst compilation or PDF export failed
pub fn render_quote_pdf(quote: &Quote, business: &BusinessProfile) -> CalcResult<Vec<u8>> {
    let source = fill_quote_template(quote, business);

    let world = PdfWorld::new(source);

    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors
            .iter()
            .map(|e| e.message.to_string())
            .collect();
        CalcError::Internal {
            message: format!("Typst compilation failed: {}", error_msgs.join("; ")),
        }
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::Internal {
            message: format!("PDF rendering failed: {}", error_msgs.join("; ")),
        }
    })?;

    tracing::info!(quote_number = %quote.quote_number, bytes = pdf_bytes.len(), "rendered quote PDF");
    Ok(pdf_bytes)
}

/// Fill the Typst template with quote data.
fn fill_quote_template(quote: &Quote, business: &BusinessProfile) -> String {
    let customer = &quote.customer;
    let notes = if quote.notes.trim().is_empty() {
        String::new()
    } else {
        format!("*Notes:* {}", escape_typst(&quote.notes))
    };

    QUOTE_TEMPLATE
        .replace("{{BUSINESS_NAME}}", &escape_typst(&business.name))
        .replace("{{BUSINESS_ADDRESS}}", &escape_typst(&business.address))
        .replace("{{BUSINESS_PHONE}}", &escape_typst(&business.phone))
        .replace("{{BUSINESS_EMAIL}}", &escape_typst(&business.email))
        .replace("{{QUOTE_NUMBER}}", &escape_typst(&quote.quote_number))
        .replace("{{DATE}}", &quote.date.format("%Y-%m-%d").to_string())
        .replace("{{VALID_UNTIL}}", &quote.valid_until.format("%Y-%m-%d").to_string())
        .replace("{{CUSTOMER_NAME}}", &escape_typst(&customer.name))
        .replace("{{CUSTOMER_ADDRESS}}", &escape_typst(&customer.address))
        .replace("{{CUSTOMER_PHONE}}", &escape_typst(&customer.phone))
        .replace("{{CUSTOMER_EMAIL}}", &escape_typst(&customer.email))
        .replace("{{SITE_LOCATION}}", &escape_typst(&customer.site_location))
        .replace("{{LINE_ROWS}}", &build_line_rows(quote))
        .replace("{{SUBTOTAL}}", &format!("{:.2}", quote.subtotal()))
        .replace("{{TAX_PERCENT}}", &format!("{}", quote.sales_tax_percent))
        .replace("{{SALES_TAX}}", &format!("{:.2}", quote.sales_tax()))
        .replace("{{TOTAL}}", &format!("{:.2}", quote.total()))
        .replace("{{COMPLETION_DAYS}}", &quote.completion_days.to_string())
        .replace("{{NOTES}}", &notes)
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Build table rows for the line items
fn build_line_rows(quote: &Quote) -> String {
    quote
        .line_items
        .iter()
        .map(|item| {
            format!(
                "  [{}], [{}], [{}], [\\${:.3}], [\\${:.2}],",
                escape_typst(&item.description),
                format_quantity(item.quantity),
                escape_typst(&item.unit),
                item.unit_price,
                item.total()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whole numbers print without decimals
fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{:.0}", quantity)
    } else {
        format!("{:.2}", quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::sealcoat::{estimate, SealcoatInput};
    use crate::quote::{CustomerInfo, QuoteLineItem, Service};
    use crate::rates::RateConfig;
    use chrono::TimeZone;

    fn sample_quote() -> Quote {
        let input = SealcoatInput::new(5000.0).with_second_coat().with_oil_spots(4);
        let result = estimate(&input, &RateConfig::default()).unwrap();
        let issued = Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap();
        let mut customer = CustomerInfo::named("Smith & Sons_LLC");
        customer.site_location = "Lot #3".to_string();
        Quote::from_estimate(&input, &result, customer, issued).unwrap()
    }

    #[test]
    fn test_escape_typst() {
        assert_eq!(escape_typst("Lot #3"), "Lot \\#3");
        assert_eq!(escape_typst("$5 [net]"), "\\$5 \\[net\\]");
        assert_eq!(escape_typst("plain"), "plain");
    }

    #[test]
    fn test_template_filled() {
        let quote = sample_quote();
        let source = fill_quote_template(&quote, &RateConfig::default().business);

        assert!(!source.contains("{{"), "unfilled placeholder left in template");
        assert!(source.contains("Smith & Sons\\_LLC"));
        assert!(source.contains("Lot \\#3"));
        assert!(source.contains("2025-05-31"));
        assert!(source.contains(Service::SecondCoat.description()));
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(5000.0), "5000");
        assert_eq!(format_quantity(12.345), "12.35");
    }

    #[test]
    fn test_pdf_generation() {
        let mut quote = sample_quote();
        quote.add_item(QuoteLineItem::from_service(Service::Striping, 1.0));
        quote.notes = "Crack filling quoted separately.".to_string();

        let pdf = render_quote_pdf(&quote, &RateConfig::default().business);

        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }
}
