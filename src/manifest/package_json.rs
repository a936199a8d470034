//! package.json dependency patching
//!
//! The manifest is handled as an open, ordered JSON object so that fields
//! this step knows nothing about are written back exactly as they were read.

use crate::core::{Result, StepError};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Manifest file name inside the project directory
pub const MANIFEST_FILE: &str = "package.json";

/// Dependency pinned by the forced version input
pub const REACT_NATIVE_PACKAGE: &str = "react-native";

const DEPENDENCIES_KEY: &str = "dependencies";

/// A loaded package.json
#[derive(Debug, Clone)]
pub struct PackageManifest {
    path: PathBuf,
    document: Map<String, Value>,
}

impl PackageManifest {
    /// `<workdir>/package.json`, or `package.json` for an empty workdir
    pub fn path_in(workdir: &Path) -> PathBuf {
        workdir.join(MANIFEST_FILE)
    }

    /// Reads and parses the manifest at `path`
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = fs::read_to_string(&path).map_err(|e| StepError::Parse {
            path: path.clone(),
            message: format!("failed to read file: {}", e),
        })?;

        let value: Value = serde_json::from_str(&content).map_err(|e| StepError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        match value {
            Value::Object(document) => Ok(Self { path, document }),
            other => Err(StepError::Parse {
                path,
                message: format!("expected a JSON object, found {}", json_type(&other)),
            }),
        }
    }

    /// Version string of a dependency, if declared
    pub fn dependency(&self, name: &str) -> Option<&str> {
        self.document
            .get(DEPENDENCIES_KEY)?
            .as_object()?
            .get(name)?
            .as_str()
    }

    /// Sets `dependencies[name] = version`, adding the entry if needed
    pub fn set_dependency(&mut self, name: &str, version: &str) -> Result<()> {
        let dependencies = match self.document.get_mut(DEPENDENCIES_KEY) {
            Some(Value::Object(dependencies)) => dependencies,
            Some(other) => {
                return Err(StepError::Parse {
                    path: self.path.clone(),
                    message: format!(
                        "\"{}\" must be an object, found {}",
                        DEPENDENCIES_KEY,
                        json_type(other)
                    ),
                });
            }
            None => {
                return Err(StepError::Parse {
                    path: self.path.clone(),
                    message: format!("missing \"{}\" object", DEPENDENCIES_KEY),
                });
            }
        };

        dependencies.insert(name.to_string(), Value::String(version.to_string()));
        Ok(())
    }

    /// Pretty-printed with two-space indentation and a trailing newline
    pub fn to_pretty_string(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(&self.document).map_err(|e| StepError::Parse {
            path: self.path.clone(),
            message: format!("failed to serialize: {}", e),
        })?;
        json.push('\n');
        Ok(json)
    }

    /// Overwrites the manifest file (atomic: temp file, then rename)
    pub fn save(&self) -> Result<()> {
        let json = self.to_pretty_string()?;
        let io_error = |source: std::io::Error| StepError::Io {
            path: self.path.clone(),
            source,
        };

        let temp_file = self.path.with_extension("json.tmp");
        fs::write(&temp_file, json).map_err(io_error)?;
        if let Err(e) = fs::rename(&temp_file, &self.path) {
            let _ = fs::remove_file(&temp_file);
            return Err(io_error(e));
        }
        Ok(())
    }
}

/// Pins `react-native` in `<workdir>/package.json` to `version`
///
/// Returns the path of the rewritten manifest.
pub fn force_react_native_version(workdir: &Path, version: &str) -> Result<PathBuf> {
    let path = PackageManifest::path_in(workdir);
    log::debug!("Patching {}", path.display());

    let mut manifest = PackageManifest::load(&path)?;
    if let Some(previous) = manifest.dependency(REACT_NATIVE_PACKAGE) {
        log::info!("Replacing {} {} with {}", REACT_NATIVE_PACKAGE, previous, version);
    }
    manifest.set_dependency(REACT_NATIVE_PACKAGE, version)?;
    manifest.save()?;

    Ok(path)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_manifest(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(MANIFEST_FILE);
        fs::write(&path, content).unwrap();
        path
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_path_in_empty_workdir() {
        assert_eq!(PackageManifest::path_in(Path::new("")), PathBuf::from("package.json"));
        assert_eq!(
            PackageManifest::path_in(Path::new("app")),
            PathBuf::from("app/package.json")
        );
    }

    #[test]
    fn test_force_version_keeps_other_dependencies() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(
            &dir,
            r#"{"dependencies":{"react-native":"0.64.0","lodash":"4.0.0"}}"#,
        );

        let patched = force_react_native_version(dir.path(), "0.66.0").unwrap();
        assert_eq!(patched, path);

        let json = read_json(&path);
        assert_eq!(json["dependencies"]["react-native"], "0.66.0");
        assert_eq!(json["dependencies"]["lodash"], "4.0.0");
    }

    #[test]
    fn test_untouched_fields_round_trip() {
        let dir = TempDir::new().unwrap();
        let original = r#"{
            "name": "my-app",
            "private": true,
            "scripts": {"start": "expo start", "android": "expo start --android"},
            "dependencies": {"expo": "^40.0.0", "react": "16.13.1"},
            "devDependencies": {"@babel/core": "~7.9.0"},
            "expo": {"sdkVersion": "40.0.0", "platforms": ["ios", "android"], "version": 3}
        }"#;
        let path = write_manifest(&dir, original);
        let before = read_json(&path);

        force_react_native_version(dir.path(), "0.63.2").unwrap();
        let after = read_json(&path);

        let before = before.as_object().unwrap();
        let after = after.as_object().unwrap();
        for (key, value) in before {
            if key != "dependencies" {
                assert_eq!(after.get(key), Some(value), "field {key} changed");
            }
        }
        for (name, version) in before["dependencies"].as_object().unwrap() {
            assert_eq!(after["dependencies"].get(name), Some(version));
        }
        assert_eq!(after["dependencies"]["react-native"], "0.63.2");
    }

    #[test]
    fn test_key_order_and_indentation() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(
            &dir,
            r#"{"name":"app","dependencies":{"zeta":"1.0.0","alpha":"2.0.0"},"version":"1.0.0"}"#,
        );

        force_react_native_version(dir.path(), "0.66.0").unwrap();
        let content = fs::read_to_string(&path).unwrap();

        assert_eq!(
            content,
            "{\n  \"name\": \"app\",\n  \"dependencies\": {\n    \"zeta\": \"1.0.0\",\n    \"alpha\": \"2.0.0\",\n    \"react-native\": \"0.66.0\"\n  },\n  \"version\": \"1.0.0\"\n}\n"
        );
        assert!(!dir.path().join("package.json.tmp").exists());
    }

    #[test]
    fn test_write_failure_is_io_error() {
        let dir = TempDir::new().unwrap();
        let original = r#"{"dependencies":{"react-native":"0.64.0"}}"#;
        let path = write_manifest(&dir, original);
        // The temp file cannot be created where a directory already sits.
        fs::create_dir(dir.path().join("package.json.tmp")).unwrap();

        let error = force_react_native_version(dir.path(), "0.66.0").unwrap_err();

        assert_eq!(error.code(), "IO_ERROR");
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_missing_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let error = force_react_native_version(dir.path(), "0.66.0").unwrap_err();
        assert_eq!(error.code(), "PARSE_ERROR");
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, "{ not json");

        let error = force_react_native_version(dir.path(), "0.66.0").unwrap_err();
        assert_eq!(error.code(), "PARSE_ERROR");
        assert_eq!(fs::read_to_string(path).unwrap(), "{ not json");
    }

    #[test]
    fn test_top_level_array_is_parse_error() {
        let dir = TempDir::new().unwrap();
        write_manifest(&dir, r#"["react-native"]"#);

        let error = PackageManifest::load(PackageManifest::path_in(dir.path())).unwrap_err();
        assert!(error.to_string().contains("expected a JSON object, found an array"));
    }

    #[test]
    fn test_dependencies_must_be_object() {
        let dir = TempDir::new().unwrap();
        write_manifest(&dir, r#"{"dependencies":["react-native"]}"#);

        let error = force_react_native_version(dir.path(), "0.66.0").unwrap_err();
        assert_eq!(error.code(), "PARSE_ERROR");
        assert!(error.to_string().contains("found an array"));
    }

    #[test]
    fn test_missing_dependencies_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, r#"{"name":"app"}"#);

        let error = force_react_native_version(dir.path(), "0.66.0").unwrap_err();
        assert!(error.to_string().contains("missing \"dependencies\""));
        assert_eq!(fs::read_to_string(path).unwrap(), r#"{"name":"app"}"#);
    }

    #[test]
    fn test_dependency_lookup() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, r#"{"dependencies":{"react-native":"0.64.0"}}"#);

        let mut manifest = PackageManifest::load(&path).unwrap();
        assert_eq!(manifest.dependency(REACT_NATIVE_PACKAGE), Some("0.64.0"));
        assert_eq!(manifest.dependency("lodash"), None);

        manifest.set_dependency("lodash", "4.0.0").unwrap();
        assert_eq!(manifest.dependency("lodash"), Some("4.0.0"));
    }
}
