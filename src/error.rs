//! Error types for granite
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Workspace discovery and configuration errors
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// Config parse error
    #[error("Failed to parse '{path}': {error}")]
    ParseError { path: PathBuf, error: String },

    /// Config serialize error
    #[error("Failed to serialize workspace config: {error}")]
    SerializeError { error: String },

    /// IO error while reading configs
    #[error("IO error for '{path}': {error}")]
    IoError { path: PathBuf, error: String },
}

/// Build execution errors
#[derive(Error, Debug)]
pub enum BuildError {
    /// No build command defined for package or its type
    #[error("No '{target}' command defined for package '{package}' or type '{package_type}'")]
    NoBuildCommand {
        package: String,
        package_type: String,
        target: String,
    },

    /// Could not determine the package type from its directory
    #[error("Could not determine package type for '{package}'")]
    UnknownType { package: String },

    /// Subprocess exited with a nonzero status
    #[error("Build command failed for '{package}': {detail}")]
    CommandFailed { package: String, detail: String },

    /// Subprocess exceeded the deadline
    #[error("Build command for '{package}' timed out after {seconds} seconds")]
    Timeout { package: String, seconds: u64 },

    /// Subprocess could not be spawned
    #[error("Failed to spawn build command for '{package}': {error}")]
    SpawnFailed { package: String, error: String },
}

/// Fingerprint cache errors
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to create the cache directory
    #[error("Failed to create cache directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to persist a cache entry
    #[error("Failed to write cache entry for '{package}': {error}")]
    WriteEntry { package: String, error: String },

    /// Failed to walk a package directory while fingerprinting
    #[error("Failed to fingerprint '{path}': {error}")]
    Fingerprint { path: PathBuf, error: String },
}

/// Package scaffolding errors
#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// Package type not registered in the workspace config
    #[error("Package type '{name}' does not exist. Run 'granite new type {name}' first.")]
    UnknownType { name: String },

    /// Package type already registered
    #[error("Package type '{name}' already exists")]
    TypeExists { name: String },

    /// Package directory already present
    #[error("Package '{name}' already exists at '{path}'")]
    PackageExists { name: String, path: PathBuf },

    /// IO error during scaffolding
    #[error("IO error for '{path}': {error}")]
    IoError { path: PathBuf, error: String },
}

/// Git subprocess errors
#[derive(Error, Debug)]
pub enum GitError {
    /// git binary could not be executed
    #[error("Failed to run git: {error}")]
    Spawn { error: String },

    /// git exited with a nonzero status
    #[error("git {operation} failed: {detail}")]
    Failed { operation: String, detail: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Failed to copy a directory tree
    #[error("Failed to copy '{from}' to '{to}': {error}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },
}

/// Top-level granite error type
#[derive(Error, Debug)]
pub enum GraniteError {
    /// Workspace error
    #[error("Workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    /// Build error
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Cache error
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Scaffold error
    #[error("Scaffold error: {0}")]
    Scaffold(#[from] ScaffoldError),

    /// Git error
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// IO error
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Generic error
    #[error("{0}")]
    Generic(String),
}
