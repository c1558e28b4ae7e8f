use serde_json::Value;

use super::{decode, json};

/// Print just the recommended scenario and its final net worth.
pub fn print_minimal(value: &Value) {
    let Some(output) = decode(value) else {
        json::print_json(value);
        return;
    };

    let rec = &output.result.recommendation;
    println!("{}: {:.2}", rec.name, rec.final_net_worth);
}
