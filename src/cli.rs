use std::ffi::OsString;

use camino::Utf8PathBuf;
use clap::Parser;

use crate::config::{DEFAULT_SOURCE_MATERIAL_URL, DEFAULT_STRING_REPLACE, FetchConfig};
use crate::domain::{DEFAULT_LANGUAGE, LODE_URL};

/// Single-dash spellings accepted for compatibility with the historical
/// command line, mapped to their long flags before parsing.
const LEGACY_FLAGS: &[(&str, &str)] = &[
    ("-pu", "--prefix-url"),
    ("-lang", "--language"),
    ("-repl", "--string-replace"),
];

#[derive(Debug, Parser)]
#[command(name = "static-lode")]
#[command(about = "Store LODE ontology documentation as static HTML pages")]
#[command(version)]
pub struct Cli {
    /// The prefix followed by a ':' plus the URL of the ontology to convert.
    #[arg(long = "prefix-url", value_name = "ACRONYM:URL")]
    pub prefix_url: Option<String>,

    /// A JSON file with an object mapping ontology acronyms to their URLs.
    #[arg(short = 'c', long = "conf-file")]
    pub conf_file: Option<Utf8PathBuf>,

    /// The directory where the documentation files are stored.
    #[arg(short = 'o', long = "output-dir")]
    pub output_dir: Utf8PathBuf,

    /// Base path of the LODE presentation files referenced by the pages.
    #[arg(short = 's', long = "source-material-url", default_value = DEFAULT_SOURCE_MATERIAL_URL)]
    pub source_material_url: String,

    /// The URL where LODE is available.
    #[arg(short = 'l', long = "lode-url", default_value = LODE_URL)]
    pub lode_url: String,

    /// ISO code of the documentation language.
    #[arg(long = "language", default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// A 'source->replace' regular expression applied to every page.
    #[arg(long = "string-replace", default_value = DEFAULT_STRING_REPLACE, allow_hyphen_values = true)]
    pub string_replace: String,

    /// The LODE function to call instead of 'owlapi'.
    #[arg(short = 'f', long = "lode-functions")]
    pub lode_functions: Option<String>,

    /// Print a JSON report of the written files on stdout.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn try_parse_normalized<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            output_dir: self.output_dir.clone(),
            language: self.language.clone(),
            lode_url: self.lode_url.clone(),
            imported_url: Some(self.source_material_url.clone()),
            string_replace: Some(self.string_replace.clone()),
            lode_function: self.lode_functions.clone(),
        }
    }
}

/// Rewrites `-pu`, `-lang` and `-repl` (also in `-flag=value` form) to their
/// long equivalents. Values following a flag are left untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut normalized = Vec::new();
    let mut expects_value = false;
    for arg in args.into_iter().map(Into::into) {
        if expects_value {
            normalized.push(arg);
            expects_value = false;
            continue;
        }
        let Some(text) = arg.to_str() else {
            normalized.push(arg);
            continue;
        };
        let (flag, value) = match text.split_once('=') {
            Some((flag, value)) => (flag, Some(value)),
            None => (text, None),
        };
        match LEGACY_FLAGS.iter().find(|(legacy, _)| *legacy == flag) {
            Some((_, long)) => match value {
                Some(value) => normalized.push(OsString::from(format!("{long}={value}"))),
                None => {
                    normalized.push(OsString::from(*long));
                    expects_value = true;
                }
            },
            None => {
                expects_value = takes_value(flag) && value.is_none();
                normalized.push(arg);
            }
        }
    }
    normalized
}

fn takes_value(flag: &str) -> bool {
    matches!(
        flag,
        "-c" | "-o"
            | "-s"
            | "-l"
            | "-f"
            | "--prefix-url"
            | "--conf-file"
            | "--output-dir"
            | "--source-material-url"
            | "--lode-url"
            | "--language"
            | "--string-replace"
            | "--lode-functions"
    )
}
