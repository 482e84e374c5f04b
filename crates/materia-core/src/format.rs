//! How command results are rendered: terminal text, pretty JSON, or
//! `H`/`F`/`R`/`I` record lines for shell pipelines.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MateriaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    /// One record per line, quoted titles escaped
    Records,
}

impl FromStr for OutputFormat {
    type Err = MateriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "records" => Ok(OutputFormat::Records),
            _ => Err(MateriaError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Human => "human",
            OutputFormat::Json => "json",
            OutputFormat::Records => "records",
        };
        f.write_str(name)
    }
}

/// Make a title safe inside a quoted record field
pub fn escape_quotes(s: &str) -> String {
    s.replace('\"', r#"\""#)
}

/// Format a percentage or score with one decimal
pub fn one_decimal(value: f64) -> String {
    format!("{:.1}", value)
}
