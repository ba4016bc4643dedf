//! SKU helper commands.

use variation_table_core::grid::suggest as suggest_sku;

/// The SKU the grid's "generate" helper would fill in.
#[must_use]
pub fn generated(base: &str, label: &str) -> String {
    suggest_sku(base, label).to_uppercase()
}

/// Print a suggested SKU.
pub fn suggest(base: &str, label: &str) {
    #[allow(clippy::print_stdout)]
    {
        println!("{}", generated(base, label));
    }
}
