use std::path::{Path, PathBuf};

/// Convenience result type used across the crate.
pub type CaptionResult<T> = Result<T, CaptionError>;

/// Error taxonomy for manifest loading, scene assembly and host interaction.
///
/// Transcript and text-object errors abort a run. Visual-element and effect errors, host
/// rejections included, are turned into diagnostics by the assembler and never escape it.
#[derive(thiserror::Error, Debug)]
pub enum CaptionError {
    /// A manifest file does not exist or cannot be opened.
    #[error("manifest not found: {}", path.display())]
    ManifestNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// A manifest is not well-formed JSON.
    #[error("manifest parse error in '{}': {message}", path.display())]
    ManifestParse {
        /// Offending manifest.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// A manifest violates its schema (missing key, bad enum value, malformed interval).
    #[error("manifest validation error: {0}")]
    ManifestValidation(String),

    /// The transcript parsed but holds no chunks.
    #[error("transcript contains no chunks")]
    NoTranscriptData,

    /// A referenced media file does not exist.
    #[error("asset not found: {}", path.display())]
    AssetNotFound {
        /// Resolved media path.
        path: PathBuf,
    },

    /// A media file exists but cannot be decoded or probed.
    #[error("asset load error for '{}': {message}", path.display())]
    AssetLoad {
        /// Resolved media path.
        path: PathBuf,
        /// Decoder or probe message.
        message: String,
    },

    /// An effect name outside the supported set.
    #[error("unknown effect name '{0}'")]
    UnknownEffect(String),

    /// A material graph lacks a node an effect needs to animate.
    #[error("material '{material}' has no '{node}' node")]
    MissingShaderNode {
        /// Material name.
        material: String,
        /// Required node name.
        node: String,
    },

    /// Invalid assembly configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The scene host rejected an instruction.
    #[error("scene host error: {0}")]
    Host(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaptionError {
    pub fn manifest_not_found(path: impl AsRef<Path>) -> Self {
        Self::ManifestNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn manifest_parse(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::ManifestParse {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ManifestValidation(msg.into())
    }

    pub fn asset_not_found(path: impl AsRef<Path>) -> Self {
        Self::AssetNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn asset_load(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::AssetLoad {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    pub fn missing_node(material: impl Into<String>, node: impl Into<String>) -> Self {
        Self::MissingShaderNode {
            material: material.into(),
            node: node.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
