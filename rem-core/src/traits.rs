use crate::imports::*;

/// Serialization of configuration, reference and result records.  Readers run
/// [SerdeAPI::init] after deserializing unless `skip_init` is set.
pub trait SerdeAPI: Serialize + for<'a> Deserialize<'a> {
    /// File extensions understood by [SerdeAPI::to_file] and [SerdeAPI::from_file]
    const ACCEPTED_FORMATS: &'static [&'static str] = &["yaml", "yml", "json", "bin"];

    /// Validation hook run after every read
    fn init(&mut self) -> RemResult<()> {
        Ok(())
    }

    /// Writes `self` to `filepath` in the format named by its extension,
    /// truncating any existing file
    fn to_file<P: AsRef<Path>>(&self, filepath: P) -> anyhow::Result<()> {
        let filepath = filepath.as_ref();
        let format = format_of(filepath)?;
        let file = File::create(filepath)
            .with_context(|| format!("could not create {filepath:?}"))?;
        match format.as_str() {
            "yaml" | "yml" => serde_yaml::to_writer(&file, self)?,
            "json" => serde_json::to_writer_pretty(&file, self)?,
            "bin" => bincode::serialize_into(&file, self)?,
            _ => bail!(
                "unsupported format {format:?} for {filepath:?}, expected one of {:?}",
                Self::ACCEPTED_FORMATS
            ),
        }
        Ok(())
    }

    /// Reads an instance from `filepath` in the format named by its extension
    fn from_file<P: AsRef<Path>>(filepath: P, skip_init: bool) -> anyhow::Result<Self> {
        let filepath = filepath.as_ref();
        let format = format_of(filepath)?;
        let mut file = File::open(filepath).with_context(|| {
            if filepath.exists() {
                format!("could not open {filepath:?}")
            } else {
                format!("file not found: {filepath:?}")
            }
        })?;
        Self::from_reader(&mut file, &format, skip_init)
            .with_context(|| format!("could not read {filepath:?}"))
    }

    /// Reads an instance in `format`, one of [SerdeAPI::ACCEPTED_FORMATS]
    fn from_reader<R: std::io::Read>(
        rdr: &mut R,
        format: &str,
        skip_init: bool,
    ) -> anyhow::Result<Self> {
        let mut deserialized: Self = match format {
            "yaml" | "yml" => serde_yaml::from_reader(rdr)?,
            "json" => serde_json::from_reader(rdr)?,
            "bin" => bincode::deserialize_from(rdr)?,
            _ => bail!(
                "unsupported format {format:?}, expected one of {:?}",
                Self::ACCEPTED_FORMATS
            ),
        };
        if !skip_init {
            deserialized.init()?;
        }
        Ok(deserialized)
    }

    fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(&self)?)
    }

    fn from_yaml<S: AsRef<str>>(yaml_str: S, skip_init: bool) -> anyhow::Result<Self> {
        let mut deserialized: Self = serde_yaml::from_str(yaml_str.as_ref())?;
        if !skip_init {
            deserialized.init()?;
        }
        Ok(deserialized)
    }
}

/// Lowercased extension of `filepath`
fn format_of(filepath: &Path) -> anyhow::Result<String> {
    filepath
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_lowercase)
        .with_context(|| format!("no file extension on {filepath:?}"))
}

/// Configuration records that contribute named values to the simulator's
/// parameter file ahead of the scaled overrides.
pub trait InputParameters {
    fn input_parameters(
        &self,
        ctx: &crate::config::SimulationContext,
    ) -> Vec<crate::params::ParameterOverride>;
}
