use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use serde::{de::DeserializeOwned, Serialize};

use crate::ConfigError;

pub use crate::spider::UniformSpiderBuilder;
pub use crate::wavefront::WavefrontBuilder;

/// TOML persistence of builders
///
/// The files start with a `# ::optiwave::<NAME>` header line
pub trait TomlConfig: Serialize + DeserializeOwned {
    const NAME: &'static str;
    /// Loads the builder from a toml file
    fn load<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|source| ConfigError::Open {
            source,
            name: Self::NAME,
            path: path.to_path_buf(),
        })?;
        let mut toml = String::new();
        file.read_to_string(&mut toml)
            .map_err(|source| ConfigError::Read {
                source,
                name: Self::NAME,
                path: path.to_path_buf(),
            })?;
        let builder: Self = toml::from_str(&toml)?;
        log::info!("loaded `::optiwave::{}` from {:?}", Self::NAME, path);
        Ok(builder)
    }
    /// Saves the builder into a toml file
    fn save<P: AsRef<Path>>(&self, path: P) -> std::result::Result<(), ConfigError> {
        let path = path.as_ref();
        let toml = toml::to_string_pretty(self)?;
        let mut file = File::create(path).map_err(|source| ConfigError::Create {
            source,
            name: Self::NAME,
            path: path.to_path_buf(),
        })?;
        write!(file, "# ::optiwave::{}\n\n{}", Self::NAME, toml).map_err(|source| {
            ConfigError::Write {
                source,
                name: Self::NAME,
                path: path.to_path_buf(),
            }
        })?;
        log::info!("saved `::optiwave::{}` to {:?}", Self::NAME, path);
        Ok(())
    }
}
