//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use sift::{Constraint, Dir, Operand};
use sift_catalog::ListingKind;

/// Filter, search, sort and paginate a JSON collection the way a listing
/// screen does, and print the resulting page.
#[derive(Debug, Parser)]
#[command(name = "sift")]
#[command(version)]
pub struct Cli {
    /// Listing domain of the records. Without it, records are read as plain
    /// JSON objects and --config must declare their fields.
    #[arg(long, value_parser = parse_kind)]
    pub kind: Option<ListingKind>,

    /// JSON file holding an array of records
    #[arg(long)]
    pub records: PathBuf,

    /// YAML or JSON view config, replacing the domain's default config
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Filter as dim=value; value may be a..b (range), a|b|c (any of), or a literal
    #[arg(long = "filter", value_name = "DIM=VALUE", value_parser = parse_filter)]
    pub filters: Vec<FilterArg>,

    /// Free-text search over the view's searchable fields
    #[arg(long)]
    pub search: Option<String>,

    /// Sort as field[:asc|desc]
    #[arg(long, value_name = "FIELD[:DIR]", value_parser = parse_sort)]
    pub sort: Option<SortArg>,

    /// 0-based page index
    #[arg(long, default_value_t = 0)]
    pub page: usize,

    /// Records per page, overriding the config
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,
}

/// Structured output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// A `--filter` argument.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterArg {
    pub dimension: String,
    pub constraint: Constraint,
}

/// A `--sort` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortArg {
    pub field: String,
    pub dir: Dir,
}

fn parse_kind(s: &str) -> Result<ListingKind, String> {
    s.parse().map_err(|e: sift_catalog::CatalogError| e.to_string())
}

fn operand(s: &str) -> Option<Operand> {
    let s = s.trim();
    (!s.is_empty()).then(|| Operand::from(s))
}

/// Parses `dim=value`.
///
/// Values are kept as text; the engine normalizes them by the field's
/// type, so `price=$100..$250` and `listedOn=2024-01-01..` both work.
pub fn parse_filter(s: &str) -> Result<FilterArg, String> {
    let (dimension, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected DIM=VALUE, got '{}'", s))?;
    let dimension = dimension.trim();
    if dimension.is_empty() {
        return Err(format!("missing dimension in '{}'", s));
    }

    let constraint = if let Some((min, max)) = value.split_once("..") {
        Constraint::InRange {
            min: operand(min),
            max: operand(max),
        }
    } else if value.contains('|') {
        Constraint::any_of(value.split('|').filter_map(operand))
    } else {
        Constraint::equals(value.trim())
    };

    Ok(FilterArg {
        dimension: dimension.to_string(),
        constraint,
    })
}

/// Parses `field[:asc|desc]`. The direction defaults to ascending.
pub fn parse_sort(s: &str) -> Result<SortArg, String> {
    let (field, dir) = match s.split_once(':') {
        Some((field, dir)) => {
            let dir = Dir::parse(dir)
                .ok_or_else(|| format!("unknown sort direction '{}'. Expected asc or desc", dir))?;
            (field, dir)
        }
        None => (s, Dir::Asc),
    };
    let field = field.trim();
    if field.is_empty() {
        return Err("missing sort field".to_string());
    }
    Ok(SortArg {
        field: field.to_string(),
        dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_equals() {
        let arg = parse_filter("type=family").unwrap();
        assert_eq!(arg.dimension, "type");
        assert_eq!(arg.constraint, Constraint::equals("family"));

        // Only the first '=' separates.
        let arg = parse_filter("note=a=b").unwrap();
        assert_eq!(arg.constraint, Constraint::equals("a=b"));
    }

    #[test]
    fn filter_ranges() {
        assert_eq!(
            parse_filter("monthlyPremium=$100..$250").unwrap().constraint,
            Constraint::between("$100", "$250")
        );
        assert_eq!(
            parse_filter("listedOn=2024-01-01..").unwrap().constraint,
            Constraint::at_least("2024-01-01")
        );
        assert_eq!(
            parse_filter("rating=..4.5").unwrap().constraint,
            Constraint::at_most("4.5")
        );
        assert_eq!(
            parse_filter("bathrooms=1.5..2.5").unwrap().constraint,
            Constraint::between("1.5", "2.5")
        );
    }

    #[test]
    fn filter_any_of() {
        assert_eq!(
            parse_filter("status=shipped|pending").unwrap().constraint,
            Constraint::any_of(["shipped", "pending"])
        );
    }

    #[test]
    fn filter_errors() {
        assert!(parse_filter("type").is_err());
        assert!(parse_filter("=family").is_err());
    }

    #[test]
    fn sort_with_and_without_direction() {
        assert_eq!(
            parse_sort("monthlyPremium:desc").unwrap(),
            SortArg {
                field: "monthlyPremium".into(),
                dir: Dir::Desc
            }
        );
        assert_eq!(parse_sort("name").unwrap().dir, Dir::Asc);
        assert!(parse_sort("name:sideways").is_err());
        assert!(parse_sort(":asc").is_err());
    }

    #[test]
    fn cli_parses_repeated_filters() {
        let cli = Cli::try_parse_from([
            "sift",
            "--kind",
            "plan",
            "--records",
            "plans.json",
            "--filter",
            "type=family",
            "--filter",
            "metal=gold|silver",
            "--sort",
            "monthlyPremium:asc",
            "--page-size",
            "3",
            "--output",
            "yaml",
        ])
        .unwrap();

        assert_eq!(cli.kind, Some(ListingKind::Plan));
        assert_eq!(cli.filters.len(), 2);
        assert_eq!(cli.page_size, Some(3));
        assert_eq!(cli.output, OutputFormat::Yaml);
    }

    #[test]
    fn cli_rejects_unknown_kind() {
        let err = Cli::try_parse_from(["sift", "--kind", "invoice", "--records", "x.json"])
            .unwrap_err();
        assert!(err.to_string().contains("unknown listing kind"));
    }
}
