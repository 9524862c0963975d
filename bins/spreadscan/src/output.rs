//! Human-readable command output

use common::OptionSide;
use serde::Serialize;
use trade_engine::{
    OcoLevels, ScannerEngine, ScannerResult, TradeFees, TradeLogEntry, TradeRecommendation,
    TradeValidation,
};

#[derive(Serialize)]
pub struct RecommendReport<'a> {
    pub recommendation: &'a TradeRecommendation,
    pub validation: &'a TradeValidation,
    pub journal_entry: &'a TradeLogEntry,
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.1}", v))
}

fn verdict(passes: bool) -> &'static str {
    if passes {
        "PASS"
    } else {
        "FAIL"
    }
}

pub fn print_scan(engine: &ScannerEngine, results: &[ScannerResult]) {
    println!(
        "{:<4} {:<8} {:>10} {:>6} {:>8} {:>6} {:>6}",
        "#", "TICKER", "PRICE", "IVR", "EMA10", "RSI14", "SCORE"
    );

    for (rank, result) in results.iter().enumerate() {
        let data = &result.market_data;
        println!(
            "{:<4} {:<8} {:>10.2} {:>6} {:>8} {:>6} {:>6}  {}",
            rank + 1,
            result.ticker,
            data.price,
            optional(data.iv_rank),
            optional(data.ema10),
            optional(data.rsi14),
            result.score,
            verdict(result.passes),
        );
        for reason in &result.reasons {
            println!("       - {}", reason);
        }
        for line in engine.generate_recommendations(result).iter().skip(1) {
            println!("       + {}", line);
        }
    }

    let passed = results.iter().filter(|r| r.passes).count();
    println!();
    println!("{} of {} tickers meet the criteria", passed, results.len());
}

pub fn print_recommendation(
    rec: &TradeRecommendation,
    validation: &TradeValidation,
    entry: &TradeLogEntry,
) {
    let spread = &rec.spread;
    println!(
        "{} {} {} ({} DTE)",
        spread.ticker,
        spread.strategy(),
        spread.expiry,
        rec.dte
    );
    println!(
        "  Short {} @ {:.2} (delta {:.2})",
        spread.short_leg.strike, spread.credit, spread.short_leg.delta
    );
    println!("  Long  {} @ {:.2}", spread.long_leg.strike, spread.debit);
    println!();
    println!("  Net credit:   {:.2} ({:.1}% of width)", spread.net_credit, spread.credit_percent);
    println!("  Max profit:   {:.2}", spread.max_profit);
    println!("  Max risk:     {:.2}", spread.max_risk);
    match spread.risk_reward_ratio {
        Some(ratio) => println!("  Reward/risk:  {:.3}", ratio),
        None => println!("  Reward/risk:  undefined (no risk)"),
    }
    println!("  Breakeven:    {:.2}", spread.breakeven);
    println!();
    println!(
        "  Fees:         entry {:.2}, exit {:.2}, round trip {:.2}",
        rec.fees.entry.total, rec.fees.exit.total, rec.fees.round_trip.total
    );
    println!(
        "  Exits:        take profit {:.2}, stop loss {:.2}, time stop {}",
        rec.oco.take_profit, rec.oco.stop_loss, rec.oco.time_stop
    );
    println!();
    println!("  Trade gate:   {} (score {})", verdict(validation.passes), validation.score);
    for reason in &validation.reasons {
        println!("    - {}", reason);
    }
    println!();
    println!("  Journal id:   {}", entry.id);
}

pub fn print_fees(side: OptionSide, quantity: u32, fees: &TradeFees) {
    println!("{} {} spread(s), {} contracts", quantity, side, u64::from(quantity) * 2);
    println!(
        "{:<11} {:>11} {:>10} {:>11} {:>10}",
        "", "COMMISSION", "CLEARING", "REGULATORY", "TOTAL"
    );
    for (label, breakdown) in [
        ("Entry", &fees.entry),
        ("Exit", &fees.exit),
        ("Round trip", &fees.round_trip),
    ] {
        println!(
            "{:<11} {:>11.4} {:>10.4} {:>11.6} {:>10.4}",
            label,
            breakdown.commission,
            breakdown.clearing_fee,
            breakdown.regulatory_fees,
            breakdown.total
        );
    }
}

pub fn print_oco(credit: f64, levels: &OcoLevels) {
    println!("Credit:      {:.2}", credit);
    println!("Take profit: {:.2}", levels.take_profit);
    println!("Stop loss:   {:.2}", levels.stop_loss);
    println!("Time stop:   {}", levels.time_stop);
}
