//! Sky temperatures from the external `tsky_sefd_LOFAR_ilt.py` helper.
//!
//! The helper is run once per pointing and prints a few header lines
//! followed by one tab-separated line per frequency, e.g.
//!
//! ```text
//! 100: MHz\t<label>\t812.5\t<label>\t900.1\t<label>\t700.2
//! ```
//!
//! where column 0 holds the frequency before a colon and columns 2, 4 and 6
//! hold the convolved, raw and diffuse sky temperatures \[K\].

use std::{
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use log::{debug, trace};
use marlu::RADec;
use thiserror::Error;

/// Lines of preamble before the temperature table.
pub const HEADER_LINES: usize = 4;

pub const DEFAULT_SCRIPT: &str = "./tsky_sefd_LOFAR_ilt.py";

#[derive(Error, Debug)]
pub enum TskyError {
    #[error("Couldn't run '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("'{command}' failed ({status}): {stderr}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Sky temperature output wasn't valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Sky temperature output line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Sky temperature output contained no temperatures")]
    NoRows,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyTempRow {
    pub freq_mhz: f64,
    pub conv_temp_k: f64,
    pub raw_temp_k: f64,
    pub diff_temp_k: f64,
}

/// Anything that can say how hot the sky is in a direction.
pub trait SkyTemperature {
    /// `freqs_mhz` of `None` leaves the choice of frequencies to the
    /// implementation.
    fn sky_temperatures(
        &self,
        pointing: RADec,
        freqs_mhz: Option<&[f64]>,
    ) -> Result<Vec<SkyTempRow>, TskyError>;
}

/// Runs the helper script as `<python> <script> --ra .. --dec .. [--freqs ..]`.
#[derive(Debug, Clone)]
pub struct TskyCommand {
    pub python: String,
    pub script: PathBuf,
}

impl Default for TskyCommand {
    fn default() -> Self {
        TskyCommand {
            python: "python".to_string(),
            script: PathBuf::from(DEFAULT_SCRIPT),
        }
    }
}

impl TskyCommand {
    pub fn new<P: AsRef<Path>>(python: &str, script: P) -> TskyCommand {
        TskyCommand {
            python: python.to_string(),
            script: script.as_ref().to_path_buf(),
        }
    }

    /// Everything after the interpreter on the command line.
    pub fn args(&self, pointing: RADec, freqs_mhz: Option<&[f64]>) -> Vec<String> {
        let mut args = vec![
            self.script.display().to_string(),
            "--ra".to_string(),
            pointing.ra.to_string(),
            "--dec".to_string(),
            pointing.dec.to_string(),
        ];
        if let Some(freqs) = freqs_mhz.filter(|f| !f.is_empty()) {
            args.push("--freqs".to_string());
            args.extend(freqs.iter().map(|f| f.to_string()));
        }
        args
    }
}

impl SkyTemperature for TskyCommand {
    fn sky_temperatures(
        &self,
        pointing: RADec,
        freqs_mhz: Option<&[f64]>,
    ) -> Result<Vec<SkyTempRow>, TskyError> {
        let args = self.args(pointing, freqs_mhz);
        let command = format!("{} {}", self.python, args.join(" "));
        debug!("Running {command}");

        let output = Command::new(&self.python)
            .args(&args)
            .output()
            .map_err(|source| TskyError::Spawn {
                command: command.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(TskyError::Failed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let stdout = String::from_utf8(output.stdout)?;
        trace!("{command} printed:\n{stdout}");
        parse_tsky_output(&stdout)
    }
}

pub fn parse_tsky_output(text: &str) -> Result<Vec<SkyTempRow>, TskyError> {
    let rows = text
        .trim()
        .lines()
        .enumerate()
        .skip(HEADER_LINES)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_line(i + 1, line))
        .collect::<Result<Vec<_>, _>>()?;
    if rows.is_empty() {
        return Err(TskyError::NoRows);
    }
    Ok(rows)
}

fn parse_line(line: usize, text: &str) -> Result<SkyTempRow, TskyError> {
    let columns: Vec<&str> = text.split('\t').collect();
    if columns.len() < 7 {
        return Err(TskyError::Parse {
            line,
            message: format!(
                "expected at least 7 tab-separated columns, got {}",
                columns.len()
            ),
        });
    }
    let number = |index: usize, field: &str| -> Result<f64, TskyError> {
        field.trim().parse().map_err(|e| TskyError::Parse {
            line,
            message: format!("column {index} ('{field}'): {e}"),
        })
    };

    let freq = columns[0].split(':').next().unwrap_or_default();
    Ok(SkyTempRow {
        freq_mhz: number(0, freq)?,
        conv_temp_k: number(2, columns[2])?,
        raw_temp_k: number(4, columns[4])?,
        diff_temp_k: number(6, columns[6])?,
    })
}
