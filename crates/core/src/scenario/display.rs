use alloc::string::String;
use core::fmt::Write;

use crate::scenario::Scenario;

/// Format a scenario in the comma-separated text format.
///
/// The first line is `n, m` followed by the `m` total unit counts. Then come
/// `n` allocation rows and `n` request rows of `m` values each. With `m = 0`
/// the rows are empty and no row lines are written. The output always ends
/// with a newline so it round-trips through `rag_parser::parse_scenario`.
#[must_use]
pub fn format_scenario(scenario: &Scenario) -> String {
    let mut output = String::new();
    let _ = write!(output, "{}, {}", scenario.processes(), scenario.resources());
    for units in &scenario.total_units {
        let _ = write!(output, ", {units}");
    }
    output.push('\n');

    if scenario.resources() > 0 {
        for row in scenario.allocation.iter().chain(&scenario.request) {
            write_row(&mut output, row);
        }
    }
    output
}

fn write_row(output: &mut String, row: &[u64]) {
    for (j, value) in row.iter().enumerate() {
        if j > 0 {
            output.push_str(", ");
        }
        let _ = write!(output, "{value}");
    }
    output.push('\n');
}
