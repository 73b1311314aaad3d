use std::{fs, path::Path};

use crate::{CompiledPomdp, PomdpError, PomdpSpec};

/// Load a POMDP spec from YAML on disk.
pub fn load_yaml(path: impl AsRef<Path>) -> Result<PomdpSpec, PomdpError> {
    let yaml = fs::read_to_string(path)?;
    let spec: PomdpSpec = serde_yaml::from_str(&yaml)?;
    Ok(spec)
}

/// Load and compile a POMDP from a YAML file.
pub fn compile_yaml(path: impl AsRef<Path>) -> Result<CompiledPomdp, PomdpError> {
    load_yaml(path)?.compile()
}

/// Serialize and write a POMDP spec to YAML.
pub fn save_yaml(path: impl AsRef<Path>, spec: &PomdpSpec) -> Result<(), PomdpError> {
    let yaml = serde_yaml::to_string(spec)?;
    fs::write(path, yaml)?;
    Ok(())
}
