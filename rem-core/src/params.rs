//! Named parameter values handed to the simulator, and their CSV wire format:
//! one record per parameter, `name,v1,v2,...`.

use crate::imports::*;
use std::io::{Read, Write};

/// Replacement for a named simulator curve or constant, or a derived side
/// value kept for traceability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterOverride {
    pub name: String,
    pub values: Vec<f64>,
}

impl ParameterOverride {
    pub fn new<S: AsRef<str>>(name: S, values: Vec<f64>) -> Self {
        Self {
            name: name.as_ref().to_string(),
            values,
        }
    }

    pub fn scalar<S: AsRef<str>>(name: S, value: f64) -> Self {
        Self::new(name, vec![value])
    }

    /// The single value of a scalar override
    pub fn as_scalar(&self) -> Option<f64> {
        match self.values.as_slice() {
            [v] => Some(*v),
            _ => None,
        }
    }
}

impl SerdeAPI for ParameterOverride {}

/// Finds the last override named `name`, which is the one the simulator ends
/// up applying
pub fn find<'a>(overrides: &'a [ParameterOverride], name: &str) -> Option<&'a ParameterOverride> {
    overrides.iter().rev().find(|o| o.name == name)
}

pub fn write_csv<W: Write>(overrides: &[ParameterOverride], wtr: W) -> RemResult<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(wtr);
    for ovr in overrides {
        let mut record = Vec::with_capacity(ovr.values.len() + 1);
        record.push(ovr.name.clone());
        record.extend(ovr.values.iter().map(|v| v.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_csv<R: Read>(rdr: R) -> RemResult<Vec<ParameterOverride>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(rdr);
    let mut overrides = vec![];
    for record in rdr.records() {
        let record = record?;
        let mut fields = record.iter();
        let name = match fields.next() {
            Some(name) if !name.trim().is_empty() => name.trim(),
            _ => continue,
        };
        let values = fields
            .map(|f| {
                f.trim().parse::<f64>().map_err(|_| {
                    RemError::InvalidConfiguration(format!("`{name}` has non-numeric value `{f}`"))
                })
            })
            .collect::<RemResult<Vec<f64>>>()?;
        overrides.push(ParameterOverride::new(name, values));
    }
    Ok(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_records() {
        let overrides = vec![
            ParameterOverride::scalar("max_motor_spd", 263.08),
            ParameterOverride::new("ess_calc_pwr_dis", vec![0.0, 0.0, 1e6]),
            ParameterOverride::scalar("max_motor_spd", 1.5),
        ];
        let mut buf = vec![];
        write_csv(&overrides, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("max_motor_spd,263.08"));
        assert_eq!(lines.next(), Some("ess_calc_pwr_dis,0,0,1000000"));
        assert_eq!(read_csv(text.as_bytes()).unwrap(), overrides);
        assert_eq!(find(&overrides, "max_motor_spd").unwrap().as_scalar(), Some(1.5));
    }

    #[test]
    fn test_non_numeric_value() {
        assert!(read_csv("a,1,x\n".as_bytes()).is_err());
    }
}
