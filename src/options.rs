//! Pipeline options.
//!
//! Options are attached to a [`Pipeline`](crate::Pipeline) and read by the
//! transforms built on it. They can be constructed in code, deserialized from
//! JSON, or parsed from `--name=value` style arguments:
//!
//! ```
//! use ironbeam_join::{ChainedCoGroupCheck, PipelineOptions};
//!
//! let opts = PipelineOptions::from_args(["--chainedCogroups=ERROR"]).unwrap();
//! assert_eq!(opts.chained_cogroups, ChainedCoGroupCheck::Error);
//!
//! let opts = PipelineOptions::from_json(r#"{ "chained_cogroups": "off" }"#).unwrap();
//! assert_eq!(opts.chained_cogroups, ChainedCoGroupCheck::Off);
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FormatResult};
use std::str::FromStr;

/// What to do when a co-group consumes the output of another co-group.
///
/// Chaining two-way co-groups shuffles the intermediate result again; a single
/// multi-way co-group ([`cogroup3`](crate::join::cogroup3)) groups all inputs
/// in one shuffle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainedCoGroupCheck {
    /// Do nothing.
    Off,
    /// Log one warning per offending co-group.
    #[default]
    Warning,
    /// Refuse to build the offending co-group.
    Error,
}

impl Display for ChainedCoGroupCheck {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        let s = match self {
            ChainedCoGroupCheck::Off => "off",
            ChainedCoGroupCheck::Warning => "warning",
            ChainedCoGroupCheck::Error => "error",
        };
        f.write_str(s)
    }
}

impl FromStr for ChainedCoGroupCheck {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(ChainedCoGroupCheck::Off),
            "warning" | "warn" => Ok(ChainedCoGroupCheck::Warning),
            "error" => Ok(ChainedCoGroupCheck::Error),
            other => bail!("unknown chained co-group check {other:?} (expected off, warning or error)"),
        }
    }
}

/// Options shared by every transform on a pipeline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Diagnostic level for chained co-groups.
    pub chained_cogroups: ChainedCoGroupCheck,
}

impl PipelineOptions {
    /// Set the chained co-group diagnostic level.
    #[must_use]
    pub fn with_chained_cogroups(mut self, check: ChainedCoGroupCheck) -> Self {
        self.chained_cogroups = check;
        self
    }

    /// Deserialize options from a JSON object. Missing fields keep defaults.
    ///
    /// # Errors
    /// Fails on malformed JSON or unknown enum values.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parsing pipeline options")
    }

    /// Parse `--name=value` arguments. Arguments this struct does not know are
    /// ignored so the same argument list can be shared with other parsers.
    ///
    /// Recognized: `--chainedCogroups` (also `--chained-cogroups`).
    ///
    /// # Errors
    /// Fails when a recognized option has an invalid value.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut opts = Self::default();
        for arg in args {
            let arg = arg.as_ref();
            let Some((name, value)) = arg.strip_prefix("--").and_then(|a| a.split_once('=')) else {
                continue;
            };
            match name {
                "chainedCogroups" | "chained-cogroups" => {
                    opts.chained_cogroups = value
                        .parse()
                        .with_context(|| format!("invalid value for --{name}"))?;
                }
                _ => {}
            }
        }
        Ok(opts)
    }
}
