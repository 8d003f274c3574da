//! Drive cycles: the time series of speed, grade, key-on state and auxiliary
//! load that the simulator follows.

mod aess;

#[cfg(test)]
mod tests;

pub use aess::AESS_WINDOW_S;

use crate::imports::*;
use std::io::{Read, Write};

/// Number of columns in a drive cycle CSV record
const CSV_COLUMNS: usize = 5;

/// One drive cycle time step
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriveCycleSample {
    pub time: si::Time,
    /// forward velocity
    pub velocity: si::Velocity,
    /// track grade in radians
    pub grade: si::Ratio,
    pub key_on: bool,
    pub aux_power_load: si::Power,
    /// cumulative distance, derived from time and velocity
    #[serde(default)]
    pub distance: si::Length,
}

impl DriveCycleSample {
    pub fn new(
        time_s: f64,
        velocity_mps: f64,
        grade_rad: f64,
        key_on: bool,
        aux_power_load_kw: f64,
    ) -> Self {
        Self {
            time: time_s * uc::S,
            velocity: velocity_mps * uc::MPS,
            grade: grade_rad * uc::R,
            key_on,
            aux_power_load: aux_power_load_kw * uc::KW,
            distance: si::Length::ZERO,
        }
    }

    /// Parses a `time, velocity, grade, key_on, aux_load` record.  Returns
    /// `None` if any column is missing or not numeric.
    fn from_record(record: &csv::ByteRecord) -> Option<Self> {
        if record.len() < CSV_COLUMNS {
            return None;
        }
        let mut cols = [0.0; CSV_COLUMNS];
        for (col, field) in cols.iter_mut().zip(record.iter()) {
            *col = std::str::from_utf8(field).ok()?.trim().parse().ok()?;
        }
        let [time, velocity, grade, key_on, aux_load] = cols;
        Some(Self::new(time, velocity, grade, key_on == 1.0, aux_load))
    }
}

/// Summary statistics of a drive cycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriveCycleInsights {
    pub top_speed: si::Velocity,
    /// mean velocity over every sample, stops included
    pub average_speed: si::Velocity,
    /// mean velocity over samples with nonzero velocity
    pub average_moving_speed: si::Velocity,
    pub peak_grade: si::Ratio,
    pub total_time: si::Time,
}

/// Ordered drive cycle with strictly increasing time
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveCycle {
    #[serde(default)]
    pub name: String,
    pub samples: Vec<DriveCycleSample>,
}

impl SerdeAPI for DriveCycle {
    fn init(&mut self) -> RemResult<()> {
        if self.samples.is_empty() {
            return Err(RemError::InvalidConfiguration(format!(
                "drive cycle `{}` is empty",
                self.name
            )));
        }
        if let Some(i) = self
            .samples
            .windows(2)
            .position(|w| w[1].time <= w[0].time)
        {
            return Err(RemError::InvalidConfiguration(format!(
                "drive cycle `{}` time does not increase at sample {}",
                self.name,
                i + 1
            )));
        }
        self.update_distance();
        Ok(())
    }
}

impl DriveCycle {
    /// Builds a validated cycle from `samples`, deriving cumulative distance
    pub fn new<S: Into<String>>(name: S, samples: Vec<DriveCycleSample>) -> RemResult<Self> {
        let mut cycle = Self {
            name: name.into(),
            samples,
        };
        cycle.init()?;
        Ok(cycle)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Recomputes cumulative distance with the rectangle rule,
    /// `velocity[i] * (time[i] - time[i - 1])`
    fn update_distance(&mut self) {
        let mut total = si::Length::ZERO;
        let mut prev_time = None;
        for sample in self.samples.iter_mut() {
            if let Some(prev) = prev_time {
                total += sample.velocity * (sample.time - prev);
            }
            sample.distance = total;
            prev_time = Some(sample.time);
        }
    }

    /// Time of the last sample, zero for an empty cycle
    pub fn max_time(&self) -> si::Time {
        self.samples.last().map_or(si::Time::ZERO, |s| s.time)
    }

    /// Reads a header-less, five column CSV.  Lines that fail to parse,
    /// including ones that are not valid UTF-8, are skipped.  Only I/O errors
    /// abort the read.
    pub fn from_csv_reader<R: Read, S: Into<String>>(rdr: R, name: S) -> RemResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(rdr);
        let mut samples = vec![];
        let mut skipped = 0;
        for (line, record) in rdr.byte_records().enumerate() {
            let sample = match record {
                Ok(record) => DriveCycleSample::from_record(&record).ok_or_else(|| {
                    format!("{:?}", String::from_utf8_lossy(record.as_slice()))
                }),
                Err(err) if err.is_io_error() => return Err(err.into()),
                Err(err) => Err(err.to_string()),
            };
            match sample {
                Ok(sample) => samples.push(sample),
                Err(reason) => {
                    log::debug!("skipping drive cycle line {}: {reason}", line + 1);
                    skipped += 1;
                }
            }
        }
        if skipped > 0 {
            log::warn!("skipped {skipped} unparseable drive cycle lines");
        }
        Self::new(name, samples)
    }

    /// Loads a drive cycle CSV, naming the cycle after the file stem
    pub fn from_csv_file<P: AsRef<Path>>(filepath: P) -> anyhow::Result<Self> {
        let filepath = filepath.as_ref();
        let name = filepath
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or_default()
            .to_string();
        let file = File::open(filepath)
            .with_context(|| format!("could not open drive cycle {filepath:?}"))?;
        Self::from_csv_reader(file, name)
            .with_context(|| format!("invalid drive cycle {filepath:?}"))
    }

    /// Loads a cycle from CSV or any [SerdeAPI] format, by extension
    pub fn from_path<P: AsRef<Path>>(filepath: P) -> anyhow::Result<Self> {
        let filepath = filepath.as_ref();
        match filepath.extension().and_then(OsStr::to_str) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::from_csv_file(filepath),
            _ => Self::from_file(filepath, false),
        }
    }

    /// Writes the cycle back out in the five column CSV layout
    pub fn to_csv_writer<W: Write>(&self, wtr: W) -> RemResult<()> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(wtr);
        for s in &self.samples {
            wtr.write_record(&[
                s.time.get::<si::second>().to_string(),
                s.velocity.get::<si::meter_per_second>().to_string(),
                s.grade.get::<si::ratio>().to_string(),
                if s.key_on { "1" } else { "0" }.to_string(),
                s.aux_power_load.get::<si::kilowatt>().to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn to_csv_file<P: AsRef<Path>>(&self, filepath: P) -> anyhow::Result<()> {
        let filepath = filepath.as_ref();
        let file = File::create(filepath)
            .with_context(|| format!("could not create {filepath:?}"))?;
        Ok(self.to_csv_writer(file)?)
    }

    pub fn insights(&self) -> DriveCycleInsights {
        if self.samples.is_empty() {
            return DriveCycleInsights::default();
        }
        let n = self.samples.len() as f64;
        let moving: Vec<si::Velocity> = self
            .samples
            .iter()
            .map(|s| s.velocity)
            .filter(|v| *v != si::Velocity::ZERO)
            .collect();
        let average_moving_speed = if moving.is_empty() {
            si::Velocity::ZERO
        } else {
            moving.iter().fold(si::Velocity::ZERO, |acc, v| acc + *v) / moving.len() as f64
        };
        DriveCycleInsights {
            top_speed: self
                .samples
                .iter()
                .map(|s| s.velocity)
                .fold(self.samples[0].velocity, |a, b| if b > a { b } else { a }),
            average_speed: self
                .samples
                .iter()
                .fold(si::Velocity::ZERO, |acc, s| acc + s.velocity)
                / n,
            average_moving_speed,
            peak_grade: self
                .samples
                .iter()
                .map(|s| s.grade)
                .fold(self.samples[0].grade, |a, b| if b > a { b } else { a }),
            total_time: self
                .samples
                .iter()
                .map(|s| s.time)
                .fold(self.samples[0].time, |a, b| if b > a { b } else { a }),
        }
    }
}
