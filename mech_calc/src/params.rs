//! Generic parameters functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::fs::read_to_string;
use std::path::Path;
use thiserror::Error;
use toml;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot load the parameter file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    DeserialiseError(toml::de::Error),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load a parameter file.
///
/// The path is resolved relative to the current working directory, so
/// executables are expected to be run from the repository root where the
/// `params` directory lives.
pub fn load<P, Q>(param_file_path: Q) -> Result<P, LoadError>
where
    P: DeserializeOwned,
    Q: AsRef<Path>,
{
    // Load the file into a string
    let params_str = match read_to_string(param_file_path) {
        Ok(s) => s,
        Err(e) => return Err(LoadError::FileLoadError(e)),
    };

    // Parse the string into the parameter struct
    match toml::from_str(params_str.as_str()) {
        Ok(p) => Ok(p),
        Err(e) => Err(LoadError::DeserialiseError(e)),
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use crate::weight::WeightParams;

    #[test]
    fn test_params_from_toml() {
        let params: WeightParams = toml::from_str(
            r#"
            arm_radius_m = 0.0226
            cord_len_m = 0.10
            mass_kg = 4.774
            external_offset_n = 0.0
            tau_max_kgfcm = 20.0
            "#,
        )
        .unwrap();

        assert_eq!(params.arm_radius_m, 0.0226);
        assert_eq!(params.mass_kg, 4.774);
    }
}
