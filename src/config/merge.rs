//! Precedence merging of configuration sources

use crate::domain::{Args, ConfigLayer, Targets};

/// Merge two sources where `a` has priority over `b`.
///
/// When one side is entirely default the other is returned as-is; otherwise
/// every field `a` left unset is taken from `b`. Applying this pairwise in
/// priority order yields override > CLI > config file > built-in default.
pub fn merge(a: Args, b: Args) -> Args {
    if a.is_default() {
        return b;
    }
    if b.is_default() {
        return a;
    }

    Args { targets: merge_targets(a.targets, b.targets), config: merge_layers(a.config, b.config) }
}

fn merge_targets(a: Targets, b: Targets) -> Targets {
    Targets { values: a.values.or(b.values) }
}

fn merge_layers(a: ConfigLayer, b: ConfigLayer) -> ConfigLayer {
    ConfigLayer {
        sheet_name: a.sheet_name.or(b.sheet_name),
        csv_header_row: a.csv_header_row.or(b.csv_header_row),
        excel_header_row: a.excel_header_row.or(b.excel_header_row),
        save_as: a.save_as.or(b.save_as),
        verbose: a.verbose.or(b.verbose),
        recursive: a.recursive.or(b.recursive),
        ignore: a.ignore.or(b.ignore),
    }
}

/// Resolve the three sources into one [`Args`].
pub fn resolve_sources(overrides: Args, cli: Args, file: Args) -> Args {
    merge(overrides, merge(cli, file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SaveAs;

    fn cli_args() -> Args {
        Args::new(
            Targets::new(["*.csv"]),
            ConfigLayer { excel_header_row: Some(1), recursive: Some(true), ..Default::default() },
        )
    }

    fn file_args() -> Args {
        Args::new(
            Targets::default(),
            ConfigLayer {
                sheet_name: Some("Sheet1".to_string()),
                excel_header_row: Some(3),
                save_as: Some(SaveAs::Xlsx),
                ignore: Some(vec![".git".to_string()]),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_default_side_returns_other_side() {
        let a = cli_args();
        assert_eq!(merge(a.clone(), Args::default()), a);
        assert_eq!(merge(Args::default(), a.clone()), a);
        assert_eq!(merge(Args::default(), Args::default()), Args::default());
    }

    #[test]
    fn test_field_by_field_precedence() {
        let merged = merge(cli_args(), file_args());
        assert_eq!(merged.targets.values, Some(vec!["*.csv".to_string()]));
        assert_eq!(merged.config.excel_header_row, Some(1));
        assert_eq!(merged.config.recursive, Some(true));
        assert_eq!(merged.config.sheet_name.as_deref(), Some("Sheet1"));
        assert_eq!(merged.config.save_as, Some(SaveAs::Xlsx));
        assert_eq!(merged.config.ignore, Some(vec![".git".to_string()]));
        assert_eq!(merged.config.csv_header_row, None);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let once = merge(cli_args(), file_args());
        let twice = merge(once.clone(), file_args());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_explicit_default_value_is_not_overridden() {
        // An explicit `--csv-header-row 0` is distinguishable from "unset",
        // so it beats the file's value even though 0 is the built-in default.
        let cli = Args::new(
            Targets::default(),
            ConfigLayer { csv_header_row: Some(0), ..Default::default() },
        );
        let file = Args::new(
            Targets::default(),
            ConfigLayer { csv_header_row: Some(2), ..Default::default() },
        );
        let merged = merge(cli, file);
        assert_eq!(merged.config.resolve().csv_header_row, 0);
    }

    #[test]
    fn test_ignore_list_is_replaced_not_unioned() {
        let cli = Args::new(
            Targets::default(),
            ConfigLayer { ignore: Some(vec!["dist".to_string()]), ..Default::default() },
        );
        let merged = merge(cli, file_args());
        assert_eq!(merged.config.ignore, Some(vec!["dist".to_string()]));
    }

    #[test]
    fn test_three_tier_chain() {
        let overrides = Args::new(
            Targets::new(["f1.csv"]),
            ConfigLayer { excel_header_row: Some(5), ..Default::default() },
        );
        let resolved = resolve_sources(overrides, cli_args(), file_args());
        let config = resolved.config.resolve();

        assert_eq!(resolved.targets.resolve(), vec!["f1.csv"]);
        assert_eq!(config.excel_header_row, 5);
        assert!(config.recursive);
        assert_eq!(config.save_as, SaveAs::Xlsx);
        assert_eq!(config.csv_header_row, 0);
    }
}
