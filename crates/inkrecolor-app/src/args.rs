use clap::{Parser, ValueEnum};
use inkrecolor_core::{InkColor, RecolorOptions, RecolorScope, RewritePolicy};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "inkrecolor")]
#[command(about = "Recolor every ink stroke that shares the selected drawing's color", long_about = None)]
pub struct Cli {
    /// Page file (JSON)
    pub page: PathBuf,

    /// Replacement color as #RRGGBB or #AARRGGBB (prompts if omitted)
    #[arg(short, long)]
    pub color: Option<InkColor>,

    /// Which drawings to rewrite
    #[arg(short, long, value_enum)]
    pub scope: Option<ScopeArg>,

    /// Count strokes as recolored even when the new color equals the old one
    #[arg(long)]
    pub rewrite_identical: bool,

    /// Configuration file
    #[arg(long, default_value = "inkrecolor.json")]
    pub config: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeArg {
    Document,
    Selection,
}

impl From<ScopeArg> for RecolorScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::Document => RecolorScope::Document,
            ScopeArg::Selection => RecolorScope::Selection,
        }
    }
}

impl Cli {
    /// Apply command line flags on top of configured options.
    pub fn options(&self, configured: RecolorOptions) -> RecolorOptions {
        RecolorOptions {
            scope: self.scope.map(Into::into).unwrap_or(configured.scope),
            rewrite: if self.rewrite_identical {
                RewritePolicy::Matched
            } else {
                configured.rewrite
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("inkrecolor").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_override_config() {
        let cli = parse(&["page.json", "--scope", "selection", "--rewrite-identical"]);
        let options = cli.options(RecolorOptions::default());
        assert_eq!(options.scope, RecolorScope::Selection);
        assert_eq!(options.rewrite, RewritePolicy::Matched);
    }

    #[test]
    fn test_config_used_without_flags() {
        let cli = parse(&["page.json"]);
        let configured = RecolorOptions {
            scope: RecolorScope::Selection,
            rewrite: RewritePolicy::Matched,
        };
        assert_eq!(cli.options(configured), configured);
        assert_eq!(cli.config, PathBuf::from("inkrecolor.json"));
    }

    #[test]
    fn test_color_flag() {
        let cli = parse(&["page.json", "--color", "#00FF00"]);
        assert_eq!(cli.color, Some(InkColor::rgb(0, 255, 0)));
        assert!(Cli::try_parse_from(["inkrecolor", "page.json", "--color", "green"]).is_err());
    }
}
