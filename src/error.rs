use std::path::PathBuf;

/// Builder configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot open `{name}` toml file: {path}")]
    Open {
        #[source]
        source: std::io::Error,
        name: &'static str,
        path: PathBuf,
    },
    #[error("cannot create `{name}` toml file: {path}")]
    Create {
        #[source]
        source: std::io::Error,
        name: &'static str,
        path: PathBuf,
    },
    #[error("cannot read `{name}` toml file: {path}")]
    Read {
        #[source]
        source: std::io::Error,
        name: &'static str,
        path: PathBuf,
    },
    #[error("cannot write `{name}` toml file: {path}")]
    Write {
        #[source]
        source: std::io::Error,
        name: &'static str,
        path: PathBuf,
    },
    #[error("cannot deserialize builder from toml")]
    Load(#[from] toml::de::Error),
    #[error("cannot serialize builder into toml")]
    Save(#[from] toml::ser::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum OptiwaveError {
    #[error("`{field}` has not been set yet")]
    UninitializedState { field: &'static str },
    #[error("shape mismatch, expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("only even -> even or odd -> odd resizing is supported, found {from} -> {to}")]
    ParityMismatch { from: usize, to: usize },
    #[error("cannot {operation} a {from}x{from} array to {to}x{to}")]
    InvalidSize {
        operation: &'static str,
        from: usize,
        to: usize,
    },
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("expected a {expected} wavefront, found a {found} wavefront")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("missing parameter: {0}")]
    MissingParameter(String),
    #[error("builder configuration failed")]
    Config(#[from] ConfigError),
}
