//! Source catalogues.
//!
//! A catalogue is a CSV file with (at least) the columns `Name`, `RA` and
//! `DEC`; the coordinates are J2000 and in radians. Extra columns (e.g. a
//! pandas index) are ignored. Nothing about the contents is validated beyond
//! parsing; duplicate names are allowed and the first one wins on lookup.

use std::{
    io::Read,
    path::{Path, PathBuf},
};

use lazy_static::lazy_static;
use log::debug;
use marlu::RADec;
use serde::Deserialize;
use thiserror::Error;
use vec1::Vec1;

use crate::coords::{dms_to_deg, hms_to_deg};

#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("Couldn't read catalogue '{}': {source}", path.display())]
    Read { path: PathBuf, source: csv::Error },

    #[error("Catalogue '{}', line {line}: {source}", path.display())]
    Row {
        path: PathBuf,
        line: usize,
        source: csv::Error,
    },

    #[error("Catalogue '{}' contains no sources", .0.display())]
    Empty(PathBuf),

    #[error("No coordinates found for '{0}'")]
    NotFound(String),
}

#[derive(Debug, Clone)]
pub struct Source {
    pub name: String,
    pub radec: RADec,
}

impl Source {
    pub fn from_degrees(name: &str, ra_deg: f64, dec_deg: f64) -> Source {
        Source {
            name: name.to_string(),
            radec: RADec {
                ra: ra_deg.to_radians(),
                dec: dec_deg.to_radians(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogueRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "RA")]
    ra: f64,
    #[serde(rename = "DEC")]
    dec: f64,
}

/// A non-empty list of sources. Indices into the catalogue are stable for the
/// lifetime of the run and are used to identify sources in schedules.
#[derive(Debug, Clone)]
pub struct Catalogue {
    sources: Vec1<Source>,
}

impl Catalogue {
    pub fn new(sources: Vec1<Source>) -> Catalogue {
        Catalogue { sources }
    }

    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Catalogue, CatalogueError> {
        let path = path.as_ref();
        debug!("Reading catalogue {}", path.display());
        let reader = std::fs::File::open(path).map_err(|e| CatalogueError::Read {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        Catalogue::from_reader(reader, path)
    }

    /// `label` is only used in error messages.
    pub fn from_reader<R: Read>(reader: R, label: &Path) -> Result<Catalogue, CatalogueError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut sources = vec![];
        for (i, row) in csv_reader.deserialize::<CatalogueRow>().enumerate() {
            // The header is line 1.
            let row = row.map_err(|source| CatalogueError::Row {
                path: label.to_path_buf(),
                line: i + 2,
                source,
            })?;
            sources.push(Source {
                name: row.name,
                radec: RADec {
                    ra: row.ra,
                    dec: row.dec,
                },
            });
        }
        debug!("Read {} sources from {}", sources.len(), label.display());

        let sources =
            Vec1::try_from_vec(sources).map_err(|_| CatalogueError::Empty(label.to_path_buf()))?;
        Ok(Catalogue { sources })
    }

    pub fn sources(&self) -> &Vec1<Source> {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Always false; an empty catalogue is rejected when it's read.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, index: usize) -> Option<&Source> {
        self.sources.get(index)
    }

    /// The first source with exactly this name, and its index.
    pub fn find(&self, name: &str) -> Option<(usize, &Source)> {
        self.sources.iter().enumerate().find(|(_, s)| s.name == name)
    }

    pub fn lookup(&self, name: &str) -> Result<(usize, &Source), CatalogueError> {
        self.find(name)
            .ok_or_else(|| CatalogueError::NotFound(name.to_string()))
    }
}

lazy_static! {
    static ref BENCHMARKS: [Source; 3] = [
        Source::from_degrees(
            "Polaris",
            hms_to_deg(2.0, 31.0, 49.09),
            dms_to_deg(false, 89.0, 15.0, 50.8),
        ),
        Source::from_degrees(
            "Crab",
            hms_to_deg(5.0, 34.0, 31.93830),
            dms_to_deg(false, 22.0, 0.0, 52.1758),
        ),
        Source::from_degrees("Galactic Centre", 266.4051, -29.0078),
    ];
}

/// The fixed targets every sky plot is drawn against.
pub fn benchmarks() -> &'static [Source] {
    &BENCHMARKS[..]
}

/// A built-in target by name, ignoring case.
pub fn benchmark(name: &str) -> Result<&'static Source, CatalogueError> {
    BENCHMARKS
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| CatalogueError::NotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn read(text: &str) -> Result<Catalogue, CatalogueError> {
        Catalogue::from_reader(text.as_bytes(), Path::new("test.csv"))
    }

    #[test]
    fn read_rows_in_order() {
        let cat = read(
            ",Name,RA,DEC\n\
             0,B0329+54,0.9259,0.9525\n\
             1, B0809+74 , 2.1431 , 1.3016\n\
             2,B0329+54,1.0,1.0\n",
        )
        .unwrap();
        assert_eq!(cat.len(), 3);
        assert_eq!(cat.sources()[1].name, "B0809+74");
        assert_abs_diff_eq!(cat.sources()[1].radec.ra, 2.1431);
        assert_abs_diff_eq!(cat.sources()[1].radec.dec, 1.3016);

        // Duplicates are allowed; the first one is found.
        let (i, s) = cat.find("B0329+54").unwrap();
        assert_eq!(i, 0);
        assert_abs_diff_eq!(s.radec.ra, 0.9259);
    }

    #[test]
    fn missing_names_are_errors() {
        let cat = read("Name,RA,DEC\nCas A,6.1234,1.0268\n").unwrap();
        assert!(cat.lookup("Cas A").is_ok());
        assert!(matches!(
            cat.lookup("Cyg A"),
            Err(CatalogueError::NotFound(n)) if n == "Cyg A"
        ));
    }

    #[test]
    fn bad_rows_report_their_line() {
        let err = read("Name,RA,DEC\nA,1.0,0.5\nB,not-a-number,0.5\n").unwrap_err();
        match err {
            CatalogueError::Row { line, .. } => assert_eq!(line, 3),
            e => panic!("unexpected error {e}"),
        }
    }

    #[test]
    fn missing_column() {
        assert!(matches!(
            read("Name,RA\nA,1.0\n"),
            Err(CatalogueError::Row { line: 2, .. })
        ));
    }

    #[test]
    fn empty_catalogue() {
        assert!(matches!(read("Name,RA,DEC\n"), Err(CatalogueError::Empty(_))));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            Catalogue::from_csv("/definitely/not/here.csv"),
            Err(CatalogueError::Read { .. })
        ));
    }

    #[test]
    fn benchmark_targets() {
        let crab = benchmark("crab").unwrap();
        assert_abs_diff_eq!(crab.radec.ra.to_degrees(), 83.63307625, epsilon = 1e-8);
        assert_abs_diff_eq!(crab.radec.dec.to_degrees(), 22.01449328, epsilon = 1e-8);
        assert!(benchmark("Polaris").unwrap().radec.dec.to_degrees() > 89.0);
        assert!(benchmark("Vela").is_err());
        assert_eq!(benchmarks().len(), 3);
    }
}
