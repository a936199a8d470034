pub mod package_json;

pub use package_json::{
    MANIFEST_FILE, PackageManifest, REACT_NATIVE_PACKAGE, force_react_native_version,
};
