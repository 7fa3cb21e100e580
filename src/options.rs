//! Configuration options for fzrank.
//!
//! This module provides the [`ScoringOptions`] consumed by the scorers and the
//! matcher, the [`WrapOptions`] used by the highlighter, the [`FilterOptions`]
//! used by [`crate::filter`] and, behind the `cli` feature, the argument set
//! of the `fzr` binary.

use derive_builder::Builder;
use regex::Regex;

use crate::Error;

/// Characters removed from a query to build its core when nothing else is set.
pub const DEFAULT_OPTIONAL_CHARACTERS: &str = r"[ _\-:/\\]";

/// Class substituted into `{tag_class}` in the opening tag by default.
pub const DEFAULT_TAG_CLASS: &str = "highlight";
/// Opening tag template used by [`WrapOptions`].
pub const DEFAULT_TAG_OPEN: &str = r#"<strong class="{tag_class}">"#;
/// Closing tag used by [`WrapOptions`].
pub const DEFAULT_TAG_CLOSE: &str = "</strong>";

#[cfg(feature = "cli")]
fn parse_optional_characters(s: &str) -> Result<Regex, String> {
    Regex::new(s).map_err(|e| format!("Invalid optional characters pattern: {}", e))
}

#[cfg(feature = "cli")]
fn parse_path_separator(s: &str) -> Result<char, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(sep), None) => check_path_separator(sep).map(|_| sep),
        _ => Err(format!("Path separator must be a single character, got {:?}", s)),
    }
}

fn check_path_separator(sep: char) -> Result<(), String> {
    if sep.is_alphanumeric() {
        Err(format!("Path separator cannot be alphanumeric, got {:?}", sep))
    } else {
        Ok(())
    }
}

/// Options shared by the scorers and the matcher.
#[derive(Builder, Debug, Clone)]
#[builder(build_fn(name = "final_build", validate = "Self::validate"))]
#[builder(default)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct ScoringOptions {
    /// Score candidates even when they do not contain every query char
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Scoring"))]
    pub allow_errors: bool,

    /// Score whole strings instead of treating them as paths
    ///
    /// Path scoring favors matches in the basename and penalizes deep paths.
    #[cfg_attr(
        feature = "cli",
        arg(long = "no-path-scoring", action = clap::ArgAction::SetFalse, help_heading = "Scoring")
    )]
    pub use_path_scoring: bool,

    /// Favor candidates sharing the query's file extension
    #[cfg_attr(feature = "cli", arg(long = "extension-bonus", help_heading = "Scoring"))]
    pub use_extension_bonus: bool,

    /// Upper-case query chars only match upper-case candidate chars
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Scoring"))]
    pub strict_upper_case: bool,

    /// Separator between path components
    #[cfg_attr(
        feature = "cli",
        arg(
            long,
            default_value_t = std::path::MAIN_SEPARATOR,
            value_parser = parse_path_separator,
            help_heading = "Scoring"
        )
    )]
    pub path_separator: char,

    /// Regex matching the query chars that may be skipped
    ///
    /// Matches are removed from the query before the exact and acronym checks.
    #[cfg_attr(
        feature = "cli",
        arg(
            long,
            default_value = DEFAULT_OPTIONAL_CHARACTERS,
            value_parser = parse_optional_characters,
            help_heading = "Scoring"
        )
    )]
    pub optional_characters: Regex,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            allow_errors: false,
            use_path_scoring: true,
            use_extension_bonus: false,
            strict_upper_case: false,
            path_separator: std::path::MAIN_SEPARATOR,
            optional_characters: Regex::new(DEFAULT_OPTIONAL_CHARACTERS).unwrap(),
        }
    }
}

impl ScoringOptionsBuilder {
    /// Builds the ScoringOptions from the builder
    pub fn build(&mut self) -> Result<ScoringOptions, ScoringOptionsBuilderError> {
        self.final_build()
    }

    /// Set the optional characters from a regex pattern
    pub fn optional_pattern(&mut self, pattern: &str) -> Result<&mut Self, Error> {
        let re = Regex::new(pattern).map_err(|source| Error::InvalidOptionalPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(self.optional_characters(re))
    }

    fn validate(&self) -> Result<(), String> {
        match self.path_separator {
            Some(sep) => check_path_separator(sep),
            None => Ok(()),
        }
    }
}

/// Options of the highlighter.
#[derive(Builder, Debug, Clone)]
#[builder(default, setter(into))]
pub struct WrapOptions {
    /// Opening tag, `{tag_class}` is replaced with [`WrapOptions::tag_class`]
    pub tag_open: String,
    /// Closing tag
    pub tag_close: String,
    /// Class substituted into the opening tag
    pub tag_class: String,
    /// Options used to compute the highlighted positions
    pub scoring: ScoringOptions,
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self {
            tag_open: DEFAULT_TAG_OPEN.to_string(),
            tag_close: DEFAULT_TAG_CLOSE.to_string(),
            tag_class: DEFAULT_TAG_CLASS.to_string(),
            scoring: ScoringOptions::default(),
        }
    }
}

impl WrapOptions {
    /// The opening tag with the class substituted
    pub fn open_tag(&self) -> String {
        self.tag_open.replace("{tag_class}", &self.tag_class)
    }
}

/// Options of [`crate::filter`].
#[derive(Builder, Debug, Clone, Default)]
#[builder(default)]
pub struct FilterOptions {
    /// Options used to score each candidate
    pub scoring: ScoringOptions,
    /// Keep at most this many results, after sorting
    #[builder(setter(strip_option))]
    pub max_results: Option<usize>,
    /// Stop collecting after this many positive matches, before sorting
    #[builder(setter(strip_option))]
    pub max_inners: Option<usize>,
}

/// fzr - structural fuzzy filter
///
/// Reads candidates from stdin and prints the ones matching the query,
/// best first.
#[cfg(feature = "cli")]
#[derive(clap::Parser, Debug, Clone)]
#[command(name = "fzr", args_override_self = true, verbatim_doc_comment, version, about)]
pub struct FzrOptions {
    /// Query to filter with
    #[arg(short, long, default_value = "", help_heading = "Search")]
    pub query: String,

    /// Keep at most this many results
    #[arg(short = 'n', long, help_heading = "Search")]
    pub max_results: Option<usize>,

    /// Stop after this many matches have been collected, before sorting
    #[arg(long, help_heading = "Search")]
    pub max_inners: Option<usize>,

    #[command(flatten)]
    pub scoring: ScoringOptions,

    /// Print the score before each match
    #[arg(long, help_heading = "Output")]
    pub print_score: bool,

    /// Wrap matched chars with --tag-open and --tag-close
    #[arg(long, help_heading = "Output")]
    pub highlight: bool,

    /// Opening tag used by --highlight
    #[arg(long, default_value = "\x1b[1m", help_heading = "Output")]
    pub tag_open: String,

    /// Closing tag used by --highlight
    #[arg(long, default_value = "\x1b[0m", help_heading = "Output")]
    pub tag_close: String,

    /// Read input delimited by ASCII NUL characters
    #[arg(long, help_heading = "Input")]
    pub read0: bool,

    /// Print output delimited by ASCII NUL characters
    #[arg(long, help_heading = "Output")]
    pub print0: bool,
}

#[cfg(feature = "cli")]
impl FzrOptions {
    /// Options for [`crate::filter`]
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            scoring: self.scoring.clone(),
            max_results: self.max_results,
            max_inners: self.max_inners,
        }
    }

    /// Options for [`crate::wrap`]
    pub fn wrap_options(&self) -> WrapOptions {
        WrapOptions {
            tag_open: self.tag_open.clone(),
            tag_close: self.tag_close.clone(),
            tag_class: DEFAULT_TAG_CLASS.to_string(),
            scoring: self.scoring.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoring_defaults() {
        let opts = ScoringOptionsBuilder::default().build().unwrap();
        assert!(!opts.allow_errors);
        assert!(opts.use_path_scoring);
        assert!(!opts.use_extension_bonus);
        assert!(!opts.strict_upper_case);
        assert_eq!(opts.path_separator, std::path::MAIN_SEPARATOR);
        assert_eq!(opts.optional_characters.as_str(), DEFAULT_OPTIONAL_CHARACTERS);
    }

    #[test]
    fn alphanumeric_separator_is_rejected() {
        let res = ScoringOptionsBuilder::default().path_separator('a').build();
        assert!(matches!(res, Err(ScoringOptionsBuilderError::ValidationError(_))));

        let opts = ScoringOptionsBuilder::default().path_separator(':').build().unwrap();
        assert_eq!(opts.path_separator, ':');
    }

    #[test]
    fn optional_pattern() {
        let opts = ScoringOptionsBuilder::default()
            .optional_pattern("[-_]")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(opts.optional_characters.as_str(), "[-_]");

        let err = ScoringOptionsBuilder::default().optional_pattern("[").err().unwrap();
        assert!(matches!(err, Error::InvalidOptionalPattern { ref pattern, .. } if pattern == "["));
    }

    #[test]
    fn open_tag_substitutes_class() {
        let opts = WrapOptionsBuilder::default().tag_class("hl").build().unwrap();
        assert_eq!(opts.open_tag(), r#"<strong class="hl">"#);
        assert_eq!(opts.tag_close, DEFAULT_TAG_CLOSE);

        let opts = WrapOptionsBuilder::default().tag_open("<b>").build().unwrap();
        assert_eq!(opts.open_tag(), "<b>");
    }

    #[test]
    fn filter_builder() {
        let opts = FilterOptionsBuilder::default().max_results(3).build().unwrap();
        assert_eq!(opts.max_results, Some(3));
        assert_eq!(opts.max_inners, None);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn cli_parsing() {
        use clap::Parser;

        let opts = FzrOptions::try_parse_from([
            "fzr",
            "-q",
            "file",
            "--no-path-scoring",
            "--path-separator",
            "/",
            "--strict-upper-case",
            "-n",
            "2",
        ])
        .unwrap();
        assert_eq!(opts.query, "file");
        assert!(!opts.scoring.use_path_scoring);
        assert!(opts.scoring.strict_upper_case);
        assert_eq!(opts.scoring.path_separator, '/');
        assert_eq!(opts.filter_options().max_results, Some(2));

        let opts = FzrOptions::try_parse_from(["fzr"]).unwrap();
        assert!(opts.scoring.use_path_scoring);
        assert_eq!(opts.scoring.optional_characters.as_str(), DEFAULT_OPTIONAL_CHARACTERS);

        assert!(FzrOptions::try_parse_from(["fzr", "--path-separator", "x"]).is_err());
        assert!(FzrOptions::try_parse_from(["fzr", "--path-separator", "//"]).is_err());
        assert!(FzrOptions::try_parse_from(["fzr", "--optional-characters", "["]).is_err());
    }
}
