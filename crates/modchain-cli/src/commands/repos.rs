use modchain_core::Config;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct RepoJson {
    name: String,
    cache: String,
    remote: Option<String>,
}

/// List the configured chain in priority order.
pub fn run(config: &Config, json: bool) -> Result<()> {
    let chain = super::load_chain_or_exit(config);

    let repos: Vec<RepoJson> = chain
        .repositories
        .iter()
        .map(|repo| RepoJson {
            name: repo.name.clone(),
            cache: repo.cache_dir().display().to_string(),
            remote: repo.remote.as_ref().map(|p| p.display().to_string()),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&repos).into_diagnostic()?);
        return Ok(());
    }

    if repos.is_empty() {
        println!("No repositories configured");
        return Ok(());
    }
    for (i, repo) in repos.iter().enumerate() {
        match &repo.remote {
            Some(remote) => println!("{}. {} (cache: {}, remote: {remote})", i + 1, repo.name, repo.cache),
            None => println!("{}. {} (cache: {}, local only)", i + 1, repo.name, repo.cache),
        }
    }
    Ok(())
}
