use crate::drive_cycle::{DriveCycle, DriveCycleSample};
use crate::imports::*;
use std::io::{Read, Write};

/// Column names of the simulator input file
pub mod input_names {
    pub const TIME: &str = "TIME";
    pub const KEYON: &str = "KEYON";
    pub const GRADE: &str = "GRADE";
    pub const FORWARDVELOCITY: &str = "FORWARDVELOCITY";
    pub const AUXPOWERLOAD: &str = "AUXPOWERLOAD";

    pub const ALL: [&str; 5] = [TIME, KEYON, GRADE, FORWARDVELOCITY, AUXPOWERLOAD];
}

fn column<F: Fn(&DriveCycleSample) -> f64>(cycle: &DriveCycle, f: F) -> Vec<f64> {
    cycle.samples.iter().map(f).collect()
}

/// Equal-length input columns in SI base units, in file order
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorInputs {
    columns: Vec<(String, Vec<f64>)>,
}

impl SimulatorInputs {
    /// Input columns for `cycle`; key-on becomes 1/0 and auxiliary load is
    /// given in W
    pub fn from_drive_cycle(cycle: &DriveCycle) -> Self {
        let columns = vec![
            (
                input_names::TIME.to_string(),
                column(cycle, |s| s.time.get::<si::second>()),
            ),
            (
                input_names::KEYON.to_string(),
                column(cycle, |s| if s.key_on { 1.0 } else { 0.0 }),
            ),
            (
                input_names::GRADE.to_string(),
                column(cycle, |s| s.grade.get::<si::ratio>()),
            ),
            (
                input_names::FORWARDVELOCITY.to_string(),
                column(cycle, |s| s.velocity.get::<si::meter_per_second>()),
            ),
            (
                input_names::AUXPOWERLOAD.to_string(),
                column(cycle, |s| s.aux_power_load.get::<si::watt>()),
            ),
        ];
        Self { columns }
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    /// Number of time steps
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |(_, v)| v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Final time in s, the simulator's stop time
    pub fn max_time(&self) -> f64 {
        self.column(input_names::TIME)
            .and_then(|t| t.last().copied())
            .unwrap_or_default()
    }

    /// Writes a header row of input names followed by one row per time step
    pub fn write_csv<W: Write>(&self, wtr: W) -> RemResult<()> {
        let mut wtr = csv::Writer::from_writer(wtr);
        wtr.write_record(self.names())?;
        for i in 0..self.len() {
            wtr.write_record(self.columns.iter().map(|(_, v)| v[i].to_string()))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Named output columns returned by the simulator
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorOutputs {
    pub columns: BTreeMap<String, Vec<f64>>,
}

impl SerdeAPI for SimulatorOutputs {}

impl SimulatorOutputs {
    pub fn insert<S: Into<String>>(&mut self, name: S, values: Vec<f64>) {
        self.columns.insert(name.into(), values);
    }

    /// Output column `name`
    ///
    /// # Errors
    /// [RemError::Simulation] if the simulator did not produce it
    pub fn get(&self, name: &str) -> RemResult<&[f64]> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| RemError::Simulation(format!("missing output variable `{name}`")))
    }

    /// Reads a CSV whose header row names the output columns
    pub fn read_csv<R: Read>(rdr: R) -> RemResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(rdr);
        let names: Vec<String> = rdr.headers()?.iter().map(String::from).collect();
        let mut values: Vec<Vec<f64>> = vec![vec![]; names.len()];
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            for ((name, col), field) in names.iter().zip(values.iter_mut()).zip(record.iter()) {
                col.push(field.parse().map_err(|_| {
                    RemError::Simulation(format!(
                        "output `{name}` row {} is not numeric: `{field}`",
                        row + 1
                    ))
                })?);
            }
        }
        Ok(Self {
            columns: names.into_iter().zip(values).collect(),
        })
    }

    pub fn write_csv<W: Write>(&self, wtr: W) -> RemResult<()> {
        let mut wtr = csv::Writer::from_writer(wtr);
        wtr.write_record(self.columns.keys())?;
        let rows = self.columns.values().map(Vec::len).max().unwrap_or_default();
        for i in 0..rows {
            wtr.write_record(
                self.columns
                    .values()
                    .map(|v| v.get(i).map(f64::to_string).unwrap_or_default()),
            )?;
        }
        wtr.flush()?;
        Ok(())
    }
}
