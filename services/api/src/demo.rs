use chrono::NaiveDate;
use clap::Args;
use estate_metrics::config::AppConfig;
use estate_metrics::engine::{
    mortgage_report, EnergyRating, InsufficientInput, MetricsEngine, MobilityAssessment,
    MortgageReport, MortgageRequest,
};
use estate_metrics::error::AppError;
use estate_metrics::listings::{Listing, ListingGenerator, MarketReport};
use estate_metrics::telemetry;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Property price
    #[arg(long)]
    pub(crate) price: f64,
    /// Cash paid up front; the rest is financed
    #[arg(long, default_value_t = 0.0)]
    pub(crate) down_payment: f64,
    /// Annual interest rate in percent (3.5 means 3.5%)
    #[arg(long)]
    pub(crate) rate: f64,
    /// Loan term in years
    #[arg(long, default_value_t = 25)]
    pub(crate) years: u32,
    /// Print the year-by-year amortization table
    #[arg(long)]
    pub(crate) schedule: bool,
}

#[derive(Args, Debug)]
pub(crate) struct GradeArgs {
    /// Primary energy use in kWh/m²/yr
    #[arg(long)]
    pub(crate) consumption: Option<f64>,
    /// Emissions in kg CO₂/m²/yr
    #[arg(long)]
    pub(crate) emissions: Option<f64>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Number of synthetic listings to generate
    #[arg(long, default_value_t = 50)]
    pub(crate) count: usize,
    /// Generator seed (defaults to APP_DEMO_SEED)
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Only report listings published on or after this date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) listed_since: Option<NaiveDate>,
    /// How many listing cards to print before the report
    #[arg(long, default_value_t = 5)]
    pub(crate) show: usize,
}

fn engine_from_env() -> Result<(AppConfig, MetricsEngine), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_cli(&config.telemetry)?;
    let engine = MetricsEngine::new(config.policy.clone());
    Ok((config, engine))
}

fn not_available(reason: InsufficientInput) -> String {
    format!("N/A ({reason})")
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let (_, engine) = engine_from_env()?;
    let request = MortgageRequest {
        property_price: args.price,
        principal: None,
        down_payment: Some(args.down_payment),
        annual_rate_percent: args.rate,
        term_years: args.years,
        include_schedule: args.schedule,
    };

    match mortgage_report(&engine, &request) {
        Ok(report) => render_quote(&report),
        Err(reason) => println!("Mortgage quote: {}", not_available(reason)),
    }
    Ok(())
}

fn render_quote(report: &MortgageReport) {
    let quote = &report.quote;
    println!("Mortgage quote");
    println!(
        "Financed {:.2} ({:.1}% of price) over {} payments",
        report.principal, report.loan_to_value_percent, quote.number_of_payments
    );
    println!(
        "- Principal and interest: {:.2}/month",
        quote.monthly_principal_and_interest
    );
    println!("- Property tax estimate: {:.2}/month", quote.monthly_taxes_estimate);
    println!(
        "- Insurance estimate: {:.2}/month",
        quote.monthly_insurance_estimate
    );
    println!("- Total: {:.2}/month", quote.total_monthly_payment);
    println!(
        "Interest over term {:.2}, paid over term {:.2}",
        quote.total_interest_over_term, quote.total_paid_over_term
    );

    if let Some(schedule) = &report.schedule {
        println!("\nYear  Interest      Principal     Balance");
        for year in schedule {
            println!(
                "{:>4}  {:>12.2}  {:>12.2}  {:>12.2}",
                year.year, year.interest_paid, year.principal_paid, year.remaining_balance
            );
        }
    }
}

pub(crate) fn run_grade(args: GradeArgs) -> Result<(), AppError> {
    let (_, engine) = engine_from_env()?;
    match engine.energy_rating(args.consumption, args.emissions) {
        Ok(rating) => render_rating(&rating),
        Err(reason) => println!("Energy grade: {}", not_available(reason)),
    }
    Ok(())
}

fn render_rating(rating: &EnergyRating) {
    println!(
        "Energy grade {} ({})",
        rating.letter_grade.letter(),
        rating.color
    );
    if let (Some(value), Some(grade)) = (rating.numeric_score, rating.consumption_grade) {
        println!("- Consumption {value} kWh/m²/yr: {}", grade.letter());
    }
    if let (Some(value), Some(grade)) = (rating.co2_per_area_per_year, rating.emissions_grade) {
        println!("- Emissions {value} kg CO₂/m²/yr: {}", grade.letter());
    }
}

pub(crate) fn run_mobility(city: &str) -> Result<(), AppError> {
    let (_, engine) = engine_from_env()?;
    render_mobility(&engine.mobility(city));
    Ok(())
}

fn render_mobility(assessment: &MobilityAssessment) {
    if assessment.matched {
        println!("Mobility for {}", assessment.location);
    } else {
        println!(
            "Mobility for {} (not in table, default scores)",
            assessment.location
        );
    }
    for (name, entry) in [
        ("Walk", &assessment.walk),
        ("Transit", &assessment.transit),
        ("Bike", &assessment.bike),
    ] {
        println!("- {name}: {} ({})", entry.score, entry.label_text);
    }
    println!("Composite: {:.1}", assessment.composite);
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let (config, engine) = engine_from_env()?;
    let seed = args.seed.unwrap_or(config.demo_seed);

    let mut generator = ListingGenerator::standard(seed)?;
    let listings: Vec<Listing> = generator
        .generate(args.count)
        .into_iter()
        .filter(|listing| {
            args.listed_since
                .map_or(true, |since| listing.listed_on >= since)
        })
        .collect();

    println!("Estate metrics demo");
    println!(
        "Generated {} listings with seed {} ({} kept)",
        args.count,
        seed,
        listings.len()
    );

    if !listings.is_empty() && args.show > 0 {
        println!("\nSample listings");
        for listing in listings.iter().take(args.show) {
            render_listing(&engine, listing);
        }
    }

    let report = MarketReport::build(&listings, &engine);
    render_market_report(&report);

    if let Some(listing) = listings.first() {
        let request = MortgageRequest {
            property_price: listing.price,
            principal: None,
            down_payment: Some(listing.price * 0.2),
            annual_rate_percent: 3.5,
            term_years: 25,
            include_schedule: false,
        };
        println!("\nSample financing for {} (20% down, 3.5%, 25 years)", listing.id);
        match mortgage_report(&engine, &request) {
            Ok(report) => render_quote(&report),
            Err(reason) => println!("Mortgage quote: {}", not_available(reason)),
        }
    }

    Ok(())
}

fn render_listing(engine: &MetricsEngine, listing: &Listing) {
    let metrics = engine.listing_metrics(listing);
    let price_per_area = match metrics.price_per_area.clone().computed() {
        Some(ppa) => format!("{:.0}/m²", ppa.display),
        None => "N/A".to_string(),
    };
    let energy = match metrics.energy.clone().computed() {
        Some(rating) => rating.letter_grade.letter().to_string(),
        None => "N/A".to_string(),
    };
    println!(
        "- [{}] {} | {:.0} | {} | energy {} | walk {}",
        listing.id,
        listing.title,
        listing.price,
        price_per_area,
        energy,
        metrics.mobility.walk.score
    );
}

fn render_market_report(report: &MarketReport) {
    println!("\nMarket report");
    if report.cities.is_empty() {
        println!("No listings to report");
        return;
    }
    for entry in &report.cities {
        let grades = entry
            .energy_grades
            .iter()
            .map(|share| format!("{}:{}", share.grade.letter(), share.count))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "- {}: {} listings, mean {:.0}, {:.0}/m² (range {:.0} to {:.0}), grades {}",
            entry.city,
            entry.listings,
            entry.mean_price,
            entry.mean_price_per_area,
            entry.min_price_per_area,
            entry.max_price_per_area,
            grades
        );
    }
    if report.skipped > 0 {
        println!("Skipped {} listings without a usable surface", report.skipped);
    }
}
