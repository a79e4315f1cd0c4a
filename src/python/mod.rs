//! Python tooling: interpreters, virtual environments, pip, manifests.
//!
//! Everything here builds commands or reads files owned by the Python
//! toolchain. Running the commands is left to [`crate::shell`].

pub mod activation;
pub mod interpreter;
pub mod manifest;
pub mod pip;
pub mod venv;

pub use activation::Activation;
pub use interpreter::{
    default_candidates, Interpreter, InterpreterLocator, InterpreterSource, PythonVersion,
};
pub use manifest::{EntryKind, Manifest, ManifestEntry};
pub use pip::{parse_package_list, InstalledPackage};
pub use venv::{PyvenvCfg, VirtualEnv};
