use crate::{error::TableError, vars::*};
use itertools::Itertools;
use log::{trace, warn};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
    sync::{Arc, OnceLock},
};

/// Table 1 of ITU-R P.530-15, bundled with the crate
const ITU_TABLE: &str = include_str!("../../static/rain_height_prob.txt");

/// a single 100 m interval of rain height variability
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RainHeightBin {
    pub offset: f64,
    pub probability: f64,
}

/// probabilities of the rain height lying in each of the 49 intervals around its mean
#[derive(Debug, Clone, PartialEq)]
pub struct RainHeightTable {
    bins: [RainHeightBin; BIN_COUNT],
}

impl RainHeightTable {
    /// the bundled ITU-R table, parsed once per process
    pub fn itu() -> Result<Arc<Self>, TableError> {
        static TABLE: OnceLock<Arc<RainHeightTable>> = OnceLock::new();
        if let Some(table) = TABLE.get() {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(ITU_TABLE.parse::<Self>()?);
        Ok(Arc::clone(TABLE.get_or_init(|| table)))
    }

    /// build a table from probabilities alone, offsets run from -2400 m to 2400 m
    pub fn from_probabilities(probabilities: [f64; BIN_COUNT]) -> Result<Self, TableError> {
        let mut bins = [RainHeightBin {
            offset: 0.0,
            probability: 0.0,
        }; BIN_COUNT];
        for (j, (bin, probability)) in bins.iter_mut().zip(probabilities).enumerate() {
            if !probability.is_finite() {
                return Err(TableError::InvalidNumber {
                    line: j + 1,
                    field: probability.to_string(),
                });
            }
            if probability < 0.0 {
                return Err(TableError::NegativeProbability { line: j + 1 });
            }
            *bin = RainHeightBin {
                offset: BIN_LOWEST + BIN_STEP * j as f64,
                probability,
            };
        }
        Ok(Self::seal(bins))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TableError> {
        trace!("loading rain height table from {}", path.as_ref().display());
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// read exactly 49 `<offset> <probability>` rows from -2400 m up in 100 m steps, blank lines are skipped
    pub fn from_reader(reader: impl BufRead) -> Result<Self, TableError> {
        let mut bins: Vec<RainHeightBin> = Vec::with_capacity(BIN_COUNT);
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let number = index + 1;
            if line.trim().is_empty() {
                continue;
            }
            if bins.len() == BIN_COUNT {
                return Err(TableError::RowCount {
                    found: BIN_COUNT + 1,
                });
            }
            let bin = parse_row(&line, number)?;
            match bins.last() {
                Some(previous) => {
                    if (bin.offset - previous.offset - BIN_STEP).abs() > 1e-6 {
                        return Err(TableError::OffsetStep { line: number });
                    }
                },
                None => {
                    if (bin.offset - BIN_LOWEST).abs() > 1e-6 {
                        return Err(TableError::FirstOffset {
                            line: number,
                            found: bin.offset,
                        });
                    }
                },
            }
            bins.push(bin);
        }
        let found = bins.len();
        let bins: [RainHeightBin; BIN_COUNT] = bins
            .try_into()
            .map_err(|_| TableError::RowCount { found })?;
        Ok(Self::seal(bins))
    }

    fn seal(bins: [RainHeightBin; BIN_COUNT]) -> Self {
        let table = Self { bins };
        let sum = table.probability_sum();
        if (sum - 1.0).abs() > PROB_TOLERANCE {
            warn!("rain height probabilities sum up to {}", sum);
        }
        table
    }

    /// intervals in increasing offset order
    pub fn bins(&self) -> &[RainHeightBin; BIN_COUNT] {
        &self.bins
    }

    pub fn probability_sum(&self) -> f64 {
        self.bins.iter().map(|bin| bin.probability).sum::<f64>()
    }
}

impl FromStr for RainHeightTable {
    type Err = TableError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Self::from_reader(content.as_bytes())
    }
}

fn parse_field(field: &str, line: usize) -> Result<f64, TableError> {
    field
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| TableError::InvalidNumber {
            line,
            field: field.to_string(),
        })
}

fn parse_row(content: &str, line: usize) -> Result<RainHeightBin, TableError> {
    let (offset, probability) = content
        .split_whitespace()
        .collect_tuple()
        .ok_or(TableError::MalformedRow { line })?;
    let offset = parse_field(offset, line)?;
    let probability = parse_field(probability, line)?;
    if probability < 0.0 {
        return Err(TableError::NegativeProbability { line });
    }
    Ok(RainHeightBin {
        offset,
        probability,
    })
}
