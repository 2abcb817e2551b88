//! Read climate base station declarations from the header of a RHESSys
//! worldfile.
//!
//! The header ends at the first `<int> world_ID` line. Within it,
//! `<int> num_base_stations` declares how many base station files the world
//! uses (the last declaration wins) and `<path> base_station_filename` names
//! one of them. Nothing past the header is interpreted.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

static NUM_BASE_STATIONS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s+num_base_stations$").unwrap());
static BASE_STATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\S+)\s+base_station_filename$").unwrap());
static WORLD_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\s+world_ID$").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum WorldfileError {
    #[error("unable to read worldfile {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Strict mode only: the header's declared count disagrees with the
    /// number of `base_station_filename` lines collected.
    #[error("expected {declared} base stations, but found {found}")]
    CountMismatch { declared: usize, found: usize },
    /// Strict mode only: filenames cannot be checked against a declaration
    /// that never appeared. An absent count never equals a real one.
    #[error("no num_base_stations declaration in header, but found {found} base station filenames")]
    MissingCount { found: usize },
}

/// Collect climate base station file paths from `worldfile`'s header, in
/// file order, duplicates included.
///
/// With `strict` set, the header must declare `num_base_stations` and the
/// declaration must equal the number of filenames collected; otherwise the
/// mismatch is ignored and the collected list is returned as-is.
pub fn climate_base_station_filenames(
    worldfile: &Path,
    strict: bool,
) -> Result<Vec<String>, WorldfileError> {
    let file = File::open(worldfile).map_err(|source| WorldfileError::Io {
        path: worldfile.to_path_buf(),
        source,
    })?;

    let mut declared: Option<usize> = None;
    let mut stations = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|source| WorldfileError::Io {
            path: worldfile.to_path_buf(),
            source,
        })?;
        let line = line.trim();
        if WORLD_ID_RE.is_match(line) {
            break;
        }
        if let Some(caps) = NUM_BASE_STATIONS_RE.captures(line) {
            declared = caps[1].parse().ok();
            continue;
        }
        if let Some(caps) = BASE_STATION_RE.captures(line) {
            stations.push(caps[1].to_string());
        }
    }

    if strict {
        match declared {
            None => {
                return Err(WorldfileError::MissingCount {
                    found: stations.len(),
                })
            }
            Some(declared) if declared != stations.len() => {
                return Err(WorldfileError::CountMismatch {
                    declared,
                    found: stations.len(),
                })
            }
            Some(_) => {}
        }
    }
    Ok(stations)
}
