use modchain_core::Config;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct CostJsonResult {
    id: String,
    cheap: bool,
}

/// Report whether fetching metadata for `id` is expected to be cheap.
pub fn run(config: &Config, id: &str, json: bool) -> Result<()> {
    let ids = super::parse_ids_or_exit(&[id.to_string()]);
    let chain = super::load_chain_or_exit(config);
    let resolver = chain.build_resolver();

    let cheap = resolver.is_fetching_cheap(&ids[0]);

    if json {
        let result = CostJsonResult {
            id: ids[0].to_string(),
            cheap,
        };
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    } else {
        println!("{}: {}", ids[0], if cheap { "cheap" } else { "expensive" });
    }
    Ok(())
}
