pub mod json;
pub mod table;

use crate::config::Config;
use crate::store::History;

/// Renders the history summary in the configured output format.
pub fn render(history: &History, config: &Config) -> String {
    if config.json_output {
        json::render(history)
    } else {
        table::render(history)
    }
}

pub fn print(history: &History, config: &Config) {
    print!("{}", render(history, config));
}
