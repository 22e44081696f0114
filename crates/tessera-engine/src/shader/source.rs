use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{RenderError, Result};

/// Named WGSL source text.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub name: String,
    pub text: String,
}

impl ShaderSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Resolves a logical shader name to its source text.
///
/// Names are lookup keys only; the loader never interprets them as paths.
pub trait ShaderProvider {
    fn source(&self, name: &str) -> Result<ShaderSource>;
}

/// Compile-time embedded sources, typically filled with `include_str!`.
#[derive(Debug, Default, Clone)]
pub struct EmbeddedShaders {
    sources: HashMap<&'static str, &'static str>,
}

impl EmbeddedShaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, text: &'static str) -> Self {
        self.sources.insert(name, text);
        self
    }
}

impl ShaderProvider for EmbeddedShaders {
    fn source(&self, name: &str) -> Result<ShaderSource> {
        self.sources
            .get(name)
            .map(|text| ShaderSource::new(name, *text))
            .ok_or_else(|| RenderError::ShaderNotFound(name.to_string()))
    }
}

/// Reads `<root>/<name>` from disk on every lookup.
#[derive(Debug, Clone)]
pub struct DirShaders {
    root: PathBuf,
}

impl DirShaders {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ShaderProvider for DirShaders {
    fn source(&self, name: &str) -> Result<ShaderSource> {
        let path = self.root.join(name);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(ShaderSource::new(name, text)),
            Err(e) => {
                log::warn!("could not read shader {}: {e}", path.display());
                Err(RenderError::ShaderNotFound(name.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_lookup_by_name() {
        let shaders = EmbeddedShaders::new().with("tri.wgsl", "// body");
        let src = shaders.source("tri.wgsl").unwrap();
        assert_eq!(src.name, "tri.wgsl");
        assert_eq!(src.text, "// body");
    }

    #[test]
    fn unknown_name_is_not_found() {
        let shaders = EmbeddedShaders::new();
        assert!(matches!(
            shaders.source("missing.wgsl"),
            Err(RenderError::ShaderNotFound(n)) if n == "missing.wgsl"
        ));
    }

    #[test]
    fn dir_provider_reads_files() {
        let dir = std::env::temp_dir().join(format!("tessera-shaders-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("a.wgsl"), "// from disk").unwrap();

        let shaders = DirShaders::new(&dir);
        assert_eq!(shaders.source("a.wgsl").unwrap().text, "// from disk");
        assert!(shaders.source("b.wgsl").is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
