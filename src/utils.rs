//! Utils

use clap::Parser;

/// Arguments for the storefront demo
#[derive(Debug, Parser)]
pub struct StorefrontArgs {
    /// Menu category to order from
    #[clap(short, long, default_value = "salgadas")]
    pub category: String,

    /// Number of entries to add from the category
    #[clap(short, long, default_value_t = 2)]
    pub n: usize,

    /// Coupon code to apply
    #[clap(long)]
    pub coupon: Option<String>,

    /// Pick the order up at the counter instead of delivering
    #[clap(long)]
    pub pickup: bool,

    /// Delivery address
    #[clap(long, default_value = "Rua das Flores, 100, Centro")]
    pub address: String,

    /// Cart file path; defaults to the cart entry in the temp directory
    #[clap(long)]
    pub cart_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn args_parse_with_defaults() {
        StorefrontArgs::command().debug_assert();
    }
}
