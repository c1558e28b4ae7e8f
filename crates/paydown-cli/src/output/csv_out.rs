use serde_json::Value;
use std::io;

use super::{decode, json};

/// Write the yearly series for every scenario as CSV to stdout,
/// one row per scenario-year.
pub fn print_csv(value: &Value) {
    let Some(output) = decode(value) else {
        json::print_json(value);
        return;
    };

    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let _ = wtr.write_record([
        "scenario",
        "year",
        "interest_paid",
        "principal_paid",
        "loan_balance_end",
        "contributions",
        "investment_returns",
        "investment_balance_end",
    ]);
    for scenario in &output.result.scenarios {
        for year in &scenario.yearly {
            let _ = wtr.write_record([
                scenario.name.clone(),
                year.year.to_string(),
                format!("{:.2}", year.interest_paid),
                format!("{:.2}", year.principal_paid),
                format!("{:.2}", year.loan_balance_end),
                format!("{:.2}", year.contributions),
                format!("{:.2}", year.investment_returns),
                format!("{:.2}", year.investment_balance_end),
            ]);
        }
    }

    let _ = wtr.flush();
}
