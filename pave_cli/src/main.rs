//! # Pavemark CLI
//!
//! Terminal driver for the sealcoat estimator. Prompts for a job, prints the
//! estimate and its JSON form, and can write a customer quote PDF.
//!
//! ## Usage
//!
//! ```text
//! pave_cli [--rates <rates.json>] [--quote-pdf <quote.pdf>]
//! ```
//!
//! Set `RUST_LOG=debug` to see the estimate stages.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use pave_core::calculations::cost_rollup::{roll_up, CostRollupInput};
use pave_core::form::SealcoatForm;
use pave_core::pdf::render_quote_pdf;
use pave_core::{estimate, load_rates, CalcError, CustomerInfo, Quote, RateConfig, SealcoatResult};
use tracing_subscriber::EnvFilter;

/// Interactive sealcoat estimator
#[derive(Parser, Debug)]
#[command(name = "pave_cli")]
#[command(about = "Sealcoat estimate, selling price and customer quote", long_about = None)]
struct Args {
    /// Rate configuration JSON file (defaults are used when omitted)
    #[arg(long)]
    rates: Option<PathBuf>,

    /// Write a customer quote PDF to this path
    #[arg(long)]
    quote_pdf: Option<PathBuf>,
}

/// Prompt for a text field; an empty answer keeps `default`.
fn prompt_text(prompt: &str, default: &str) -> String {
    print!("{} [{}]: ", prompt, default);
    if io::stdout().flush().is_err() {
        return default.to_string();
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default.to_string();
    }

    let trimmed = input.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

fn prompt_yes_no(prompt: &str, default: bool) -> bool {
    let answer = prompt_text(prompt, if default { "y" } else { "n" });
    matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let rates = match &args.rates {
        Some(path) => match load_rates(path) {
            Ok(rates) => rates,
            Err(e) => return report_error(&e),
        },
        None => RateConfig::default(),
    };

    println!("Pavemark - Sealcoat Estimator");
    println!("=============================");
    println!("{}", rates.business.name);
    println!();

    let defaults = SealcoatForm::default();
    let form = SealcoatForm {
        square_feet: prompt_text("Total area (sq ft)", "5000"),
        second_coat: prompt_yes_no("Second coat?", false),
        third_coat: prompt_yes_no("Third coat?", false),
        sand_added: prompt_yes_no("Add sand?", true),
        polymer_added: prompt_yes_no("Add polymer?", false),
        water_percent: prompt_text("Water (% of mix)", &defaults.water_percent),
        oil_spot_count: prompt_text("Oil spots to prime", &defaults.oil_spot_count),
        distance_miles: prompt_text("Distance from yard (mi)", &defaults.distance_miles),
        job_location: prompt_text("Job location", ""),
        ..defaults
    };

    let input = form.to_input();
    let result = match estimate(&input, &rates) {
        Ok(result) => result,
        Err(e) => return report_error(&e),
    };

    print_estimate(&result);

    let area = input.area_sq_ft.unwrap_or_default();
    match roll_up(&CostRollupInput::from_estimate(area, &result)) {
        Ok(price) => {
            println!("Selling price (20% overhead, 20% profit):");
            println!("  Overhead:   ${:>10.2}", price.overhead);
            println!("  Profit:     ${:>10.2}", price.profit);
            println!("  Total:      ${:>10.2}  (${:.3}/sq ft)", price.total, price.cost_per_sq_ft);
            println!();
        }
        Err(e) => return report_error(&e),
    }

    println!("JSON Output:");
    if let Ok(json) = serde_json::to_string_pretty(&result) {
        println!("{}", json);
    }

    if let Some(path) = &args.quote_pdf {
        let customer = CustomerInfo::named(prompt_text("Customer name", "Customer"));
        let quote = match Quote::from_estimate(&input, &result, customer, Utc::now()) {
            Ok(quote) => quote,
            Err(e) => return report_error(&e),
        };
        let bytes = match render_quote_pdf(&quote, &rates.business) {
            Ok(bytes) => bytes,
            Err(e) => return report_error(&e),
        };
        if let Err(e) = std::fs::write(path, bytes) {
            eprintln!("Error: could not write {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
        println!();
        println!("Quote {} (${:.2}) written to {}", quote.quote_number, quote.total(), path.display());
    }

    ExitCode::SUCCESS
}

fn print_estimate(result: &SealcoatResult) {
    let m = &result.materials;
    let c = &result.costs;
    let l = &result.logistics;

    println!();
    println!("═══════════════════════════════════════");
    println!("  SEALCOAT ESTIMATE");
    println!("═══════════════════════════════════════");
    println!();
    println!("Materials:");
    println!("  Sealer (undiluted): {:.2} gal ({} coat(s))", m.total_undiluted_gallons, result.coats_applied());
    println!("  Sand:               {:.2} lb ({} bags)", m.sand_lbs, m.sand_bags);
    println!("  Water:              {:.2} gal", m.water_gallons);
    println!("  Polymer:            {:.2} gal ({} buckets)", m.polymer_gallons, m.polymer_buckets);
    println!("  Oil-spot primer:    {} buckets", m.oil_spot_primer_buckets);
    println!("  Total mix:          {:.2} gal", m.total_mix_gallons);
    println!();
    println!("Costs:");
    println!("  Materials:  ${:>10.2}", c.material_subtotal);
    println!("  Labor:      ${:>10.2}", c.labor);
    println!("  Fuel:       ${:>10.2}", c.fuel);
    println!("  Project:    ${:>10.2}", c.total_project);
    println!();
    println!("Logistics:");
    println!("  Hours: {:.2}  Days: {}  Tank loads: {}", l.total_hours, l.work_days, l.tank_loads);
    println!(
        "  Truck weight: {:.0} lb {}",
        l.truck_weight.total_weight_lbs,
        status_icon(l.truck_weight.within_gvwr)
    );
    if !l.truck_weight.warning.is_empty() {
        println!("  {}", l.truck_weight.warning);
    }
    println!();
    println!("Coverage: {:.2} sq ft per gallon of mix", result.coverage.avg_sq_ft_per_gallon);
    println!();
}

fn report_error(e: &CalcError) -> ExitCode {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
    ExitCode::FAILURE
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[OVER GVWR]"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_paths() {
        let args = Args::try_parse_from(["pave_cli", "--rates", "rates.json", "--quote-pdf", "q.pdf"]).unwrap();
        assert_eq!(args.rates, Some(PathBuf::from("rates.json")));
        assert_eq!(args.quote_pdf, Some(PathBuf::from("q.pdf")));

        let args = Args::try_parse_from(["pave_cli"]).unwrap();
        assert!(args.rates.is_none());
        assert!(args.quote_pdf.is_none());
    }

    #[test]
    fn test_help_is_not_a_failure() {
        let err = Args::try_parse_from(["pave_cli", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let err = Args::try_parse_from(["pave_cli", "--bogus"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_status_icon() {
        assert_eq!(status_icon(true), "[OK]");
        assert_eq!(status_icon(false), "[OVER GVWR]");
    }
}
