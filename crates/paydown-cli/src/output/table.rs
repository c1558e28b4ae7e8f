use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{decode, json};

/// Render the comparison as a scenario summary table plus the
/// recommendation, warnings, and methodology.
pub fn print_table(value: &Value) {
    let Some(output) = decode(value) else {
        json::print_json(value);
        return;
    };

    let mut builder = Builder::default();
    builder.push_record([
        "Scenario",
        "Final net worth",
        "Investment balance",
        "Loan balance",
        "Interest paid",
    ]);
    for scenario in &output.result.scenarios {
        builder.push_record([
            scenario.name.as_str(),
            &format!("{:.2}", scenario.final_net_worth),
            &format!("{:.2}", scenario.investment_balance),
            &format!("{:.2}", scenario.loans_remaining_balance),
            &format!("{:.2}", scenario.total_interest_paid),
        ]);
    }
    println!("{}", Table::from(builder));

    let rec = &output.result.recommendation;
    println!(
        "\nRecommended: {} ({}: {:.2})",
        rec.name, rec.metric, rec.final_net_worth
    );

    if let Some(mc_rows) = monte_carlo_table(&output) {
        println!("\n{}", mc_rows);
    }

    if !output.warnings.is_empty() {
        println!("\nWarnings:");
        for w in &output.warnings {
            println!("  - {}", w);
        }
    }

    println!("\nMethodology: {}", output.methodology);
}

fn monte_carlo_table(
    output: &paydown_core::types::ComputationOutput<paydown_core::compare::ComparisonOutput>,
) -> Option<Table> {
    if output
        .result
        .scenarios
        .iter()
        .all(|s| s.monte_carlo.is_none())
    {
        return None;
    }

    let mut builder = Builder::default();
    builder.push_record(["Scenario", "Trials", "Mean", "P10", "P50", "P90", "P(>=0)"]);
    for scenario in &output.result.scenarios {
        if let Some(mc) = &scenario.monte_carlo {
            builder.push_record([
                scenario.name.as_str(),
                &mc.trials.to_string(),
                &format!("{:.2}", mc.mean_net_worth),
                &format!("{:.2}", mc.percentile_10),
                &format!("{:.2}", mc.percentile_50),
                &format!("{:.2}", mc.percentile_90),
                &format!("{:.3}", mc.success_probability),
            ]);
        }
    }
    Some(Table::from(builder))
}
