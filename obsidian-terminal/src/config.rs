/// Command-line configuration for the terminal viewer
use obsidian_core::camera::DEFAULT_CAMERA_Z;
use std::fmt;
use std::path::PathBuf;

pub const USAGE: &str = "Usage: obsidian-terminal [--filled] [--fps-cap N] [--scale S] [--camera-z Z] [MODEL.stl]";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Fill faces instead of outlining them
    pub filled: bool,
    /// Frame rate cap, uncapped when `None`
    pub fps_cap: Option<u32>,
    /// Base projection scale
    pub scale: f64,
    /// Starting camera z
    pub camera_z: f64,
    /// STL model to load instead of the demo cube
    pub model: Option<PathBuf>,
    pub show_help: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filled: false,
            fps_cap: None,
            scale: 0.1,
            camera_z: DEFAULT_CAMERA_Z,
            model: None,
            show_help: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    MissingValue(String),
    InvalidValue { flag: String, value: String },
    UnknownFlag(String),
}

impl std::error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingValue(flag) => write!(f, "{} needs a value", flag),
            ConfigError::InvalidValue { flag, value } => {
                write!(f, "invalid value '{}' for {}", value, flag)
            }
            ConfigError::UnknownFlag(flag) => write!(f, "unknown option {}", flag),
        }
    }
}

fn value<I, T>(flag: &str, args: &mut I) -> Result<T, ConfigError>
where
    I: Iterator<Item = String>,
    T: std::str::FromStr,
{
    let raw = args
        .next()
        .ok_or_else(|| ConfigError::MissingValue(flag.to_string()))?;
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        flag: flag.to_string(),
        value: raw,
    })
}

impl Config {
    /// Parse arguments, program name excluded.
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--filled" => config.filled = true,
                "--fps-cap" => config.fps_cap = Some(value(&arg, &mut args)?),
                "--scale" => config.scale = value(&arg, &mut args)?,
                "--camera-z" => config.camera_z = value(&arg, &mut args)?,
                "-h" | "--help" => config.show_help = true,
                flag if flag.starts_with('-') => {
                    return Err(ConfigError::UnknownFlag(flag.to_string()))
                }
                _ => config.model = Some(PathBuf::from(&arg)),
            }
        }

        Ok(config)
    }
}
