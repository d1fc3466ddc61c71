//! Hireboard filter CLI
//!
//! Usage:
//!   hireboard-cli compile --entity jobs --filter workMode=Remote --filter exp=2-5 --search rust
//!   hireboard-cli match --entity jobs --docs jobs.json --filter postingDate=today
//!   hireboard-cli profiles

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use clap::{Args, Parser, Subcommand};
use hireboard_filter::{
    Clock, CompiledQuery, Composition, FilterCompiler, FilterInput, FilterProfile, Matcher,
    PageRequest, PagingDefaults,
};
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "hireboard-cli")]
#[command(about = "Compile and test hireboard listing filters", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the compiled query document
    Compile(QueryArgs),

    /// Print the documents of a JSON array file that match the filters
    Match {
        #[command(flatten)]
        query: QueryArgs,

        /// JSON file holding an array of documents
        #[arg(long, value_name = "FILE")]
        docs: PathBuf,
    },

    /// Print the built-in entity profiles
    Profiles,
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Entity profile (jobs, users, departments, categories)
    #[arg(short, long, default_value = "jobs")]
    entity: String,

    /// Filter as key=value; repeat a key to pass a list
    #[arg(short, long = "filter", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    filters: Vec<(String, String)>,

    /// Free-text search term
    #[arg(short, long)]
    search: Option<String>,

    #[arg(long)]
    page: Option<String>,

    /// Page size, or "all"
    #[arg(long)]
    limit: Option<String>,

    #[arg(long)]
    sort_by: Option<String>,

    #[arg(long)]
    sort_order: Option<String>,

    /// How field filters combine: any or all
    #[arg(long, default_value = "any")]
    composition: Composition,

    /// Accept keys outside the profile's filterable fields
    #[arg(long)]
    all_fields: bool,

    /// Reference instant for relative date windows (RFC 3339, default now)
    #[arg(long)]
    now: Option<String>,

    /// Offset in minutes used for day boundaries
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    utc_offset_minutes: i32,
}

fn parse_key_val(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .with_context(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("empty filter key in '{raw}'");
    }
    Ok((key.to_string(), value.to_string()))
}

impl QueryArgs {
    fn profile(&self) -> Result<FilterProfile> {
        FilterProfile::builtin(&self.entity).with_context(|| {
            let known: Vec<String> = FilterProfile::builtins()
                .into_iter()
                .map(|p| p.name)
                .collect();
            format!(
                "unknown entity '{}', expected one of: {}",
                self.entity,
                known.join(", ")
            )
        })
    }

    fn clock(&self) -> Result<Clock> {
        let now = match &self.now {
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("invalid --now '{raw}'"))?
                .with_timezone(&Utc),
            None => Utc::now(),
        };
        let offset = self
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .with_context(|| format!("offset out of range: {}", self.utc_offset_minutes))?;
        Ok(Clock::at(now).with_offset(offset))
    }

    fn input(&self, profile: &FilterProfile) -> FilterInput {
        let mut input = FilterInput::new();
        for (key, value) in &self.filters {
            if self.all_fields || profile.is_filterable(key) {
                input.append(key.as_str(), value.as_str());
            } else {
                tracing::warn!(key = %key, entity = %profile.name, "skipping non-filterable key");
            }
        }
        input
    }

    fn compile(&self) -> Result<CompiledQuery> {
        let profile = self.profile()?;
        let mut paging = PageRequest {
            page: self.page.clone(),
            limit: self.limit.clone(),
            sort_by: self.sort_by.clone(),
            sort_order: self.sort_order.clone(),
        };
        if profile.unpaged {
            paging.limit = Some("all".to_string());
        }

        let query = FilterCompiler::from(&profile)
            .with_composition(self.composition)
            .compile_query(
                &self.input(&profile),
                self.search.as_deref(),
                &paging,
                &PagingDefaults::default(),
                &self.clock()?,
            )
            .context("failed to compile filters")?;
        Ok(query)
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Compile(args) => {
            let query = args.compile()?;
            println!("{}", serde_json::to_string_pretty(&query.to_document())?);
        }
        Commands::Match { query, docs } => {
            let compiled = query.compile()?;
            let raw = std::fs::read_to_string(&docs)
                .with_context(|| format!("failed to read {}", docs.display()))?;
            let Value::Array(items) = serde_json::from_str::<Value>(&raw)
                .with_context(|| format!("failed to parse {}", docs.display()))?
            else {
                bail!("{} must hold a JSON array", docs.display());
            };

            let matcher = Matcher::new(&compiled.filter)?;
            let hits: Vec<&Value> = items.iter().filter(|d| matcher.matches(d)).collect();
            tracing::info!(matched = hits.len(), scanned = items.len(), "match complete");
            println!("{}", serde_json::to_string_pretty(&hits)?);
        }
        Commands::Profiles => {
            println!(
                "{}",
                serde_json::to_string_pretty(&FilterProfile::builtins())?
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,hireboard_cli=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("hireboard-cli").chain(args.iter().copied()))
            .unwrap()
    }

    fn query_args(cli: Cli) -> QueryArgs {
        match cli.command {
            Commands::Compile(args) => args,
            other => panic!("expected compile, got {other:?}"),
        }
    }

    #[test]
    fn key_values_split_on_first_equals() {
        assert_eq!(
            parse_key_val("dateRange={\"a\"=1}").unwrap(),
            ("dateRange".to_string(), "{\"a\"=1}".to_string())
        );
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=x").is_err());
    }

    #[test]
    fn repeated_filters_become_lists() {
        let args = query_args(parse(&[
            "compile",
            "-f",
            "workMode=Remote",
            "-f",
            "workMode=Hybrid",
        ]));
        let input = args.input(&args.profile().unwrap());
        assert_eq!(
            input.get("workMode").map(|v| v.values()),
            Some(vec!["Remote", "Hybrid"])
        );
    }

    #[test]
    fn non_filterable_keys_need_all_fields() {
        let strict = query_args(parse(&["compile", "-f", "secret=1"]));
        assert!(strict.input(&strict.profile().unwrap()).is_empty());

        let loose = query_args(parse(&["compile", "-f", "secret=1", "--all-fields"]));
        assert_eq!(loose.input(&loose.profile().unwrap()).len(), 1);
    }

    #[test]
    fn compiles_with_fixed_clock() {
        let args = query_args(parse(&[
            "compile",
            "--filter",
            "postingDate=today",
            "--now",
            "2024-05-15T13:30:00Z",
            "--limit",
            "5",
        ]));
        let doc = args.compile().unwrap().to_document();
        assert_eq!(doc["limit"], 5);
        assert_eq!(
            doc["filter"]["$and"][0]["$or"][0]["createdAt"]["$gte"]["$date"],
            "2024-05-15T00:00:00.000Z"
        );
    }

    #[test]
    fn unknown_entity_is_an_error() {
        let args = query_args(parse(&["compile", "--entity", "invoices"]));
        assert!(args.compile().is_err());
    }

    #[test]
    fn composition_parses_from_flag() {
        let args = query_args(parse(&["compile", "--composition", "all"]));
        assert_eq!(args.composition, Composition::All);
    }
}
