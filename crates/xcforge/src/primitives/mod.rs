//! xcforge primitives - manifest vocabulary shared by every layer
//!
//! Closed enumerations for the wire-level constants a `project.pbxproj`
//! manifest traffics in: product types, source-tree anchors, build phase
//! kinds, and the tagged build setting value. Keeping these closed means
//! unknown wire input fails at the decode boundary instead of leaking
//! stringly-typed state into mutation code.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when mapping wire constants into the closed vocabulary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VocabularyError {
    #[error("unknown product type identifier: {identifier}")]
    UnknownProductType { identifier: String },

    #[error("unknown source tree anchor: {anchor}")]
    UnknownSourceTree { anchor: String },

    #[error("unknown build phase isa: {isa}")]
    UnknownPhaseIsa { isa: String },
}

/// Product flavor a native target produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductType {
    /// Installable application bundle
    Application,
    /// Dynamic framework bundle
    Framework,
    /// Static archive library
    StaticLibrary,
    /// Command line executable
    CommandLineTool,
    /// Unit test bundle
    UnitTestBundle,
    /// UI automation test bundle
    UiTestBundle,
}

impl ProductType {
    /// Reverse-DNS identifier used on the wire
    pub fn identifier(&self) -> &'static str {
        match self {
            ProductType::Application => "com.apple.product-type.application",
            ProductType::Framework => "com.apple.product-type.framework",
            ProductType::StaticLibrary => "com.apple.product-type.library.static",
            ProductType::CommandLineTool => "com.apple.product-type.tool",
            ProductType::UnitTestBundle => "com.apple.product-type.bundle.unit-test",
            ProductType::UiTestBundle => "com.apple.product-type.bundle.ui-testing",
        }
    }

    pub fn from_identifier(identifier: &str) -> Result<Self, VocabularyError> {
        match identifier {
            "com.apple.product-type.application" => Ok(ProductType::Application),
            "com.apple.product-type.framework" => Ok(ProductType::Framework),
            "com.apple.product-type.library.static" => Ok(ProductType::StaticLibrary),
            "com.apple.product-type.tool" => Ok(ProductType::CommandLineTool),
            "com.apple.product-type.bundle.unit-test" => Ok(ProductType::UnitTestBundle),
            "com.apple.product-type.bundle.ui-testing" => Ok(ProductType::UiTestBundle),
            other => Err(VocabularyError::UnknownProductType {
                identifier: other.to_string(),
            }),
        }
    }

    /// File extension of the produced artifact, used for product references
    pub fn artifact_extension(&self) -> &'static str {
        match self {
            ProductType::Application => "app",
            ProductType::Framework => "framework",
            ProductType::StaticLibrary => "a",
            ProductType::CommandLineTool => "",
            ProductType::UnitTestBundle => "xctest",
            ProductType::UiTestBundle => "xctest",
        }
    }

    /// Wire file type of the produced artifact
    pub fn artifact_file_type(&self) -> &'static str {
        match self {
            ProductType::Application => "wrapper.application",
            ProductType::Framework => "wrapper.framework",
            ProductType::StaticLibrary => "archive.ar",
            ProductType::CommandLineTool => "compiled.mach-o.executable",
            ProductType::UnitTestBundle => "wrapper.cfbundle",
            ProductType::UiTestBundle => "wrapper.cfbundle",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl FromStr for ProductType {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductType::from_identifier(s)
    }
}

/// Base location a file reference path is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceTree {
    /// Relative to the enclosing group
    Group,
    /// Absolute filesystem path
    Absolute,
    /// Relative to the directory holding the manifest bundle
    SourceRoot,
    /// Relative to the active SDK root
    SdkRoot,
    /// Relative to the build products directory
    BuiltProductsDir,
    /// Relative to the developer tools directory
    DeveloperDir,
}

impl SourceTree {
    pub fn anchor(&self) -> &'static str {
        match self {
            SourceTree::Group => "<group>",
            SourceTree::Absolute => "<absolute>",
            SourceTree::SourceRoot => "SOURCE_ROOT",
            SourceTree::SdkRoot => "SDKROOT",
            SourceTree::BuiltProductsDir => "BUILT_PRODUCTS_DIR",
            SourceTree::DeveloperDir => "DEVELOPER_DIR",
        }
    }

    pub fn from_anchor(anchor: &str) -> Result<Self, VocabularyError> {
        match anchor {
            "<group>" => Ok(SourceTree::Group),
            "<absolute>" => Ok(SourceTree::Absolute),
            "SOURCE_ROOT" => Ok(SourceTree::SourceRoot),
            "SDKROOT" => Ok(SourceTree::SdkRoot),
            "BUILT_PRODUCTS_DIR" => Ok(SourceTree::BuiltProductsDir),
            "DEVELOPER_DIR" => Ok(SourceTree::DeveloperDir),
            other => Err(VocabularyError::UnknownSourceTree {
                anchor: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SourceTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.anchor())
    }
}

/// Role of a build phase within a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseKind {
    /// Compile sources
    Sources,
    /// Link frameworks and libraries
    Frameworks,
    /// Copy bundle resources
    Resources,
    /// Copy files to a named destination
    CopyFiles,
    /// Run a shell script
    RunScript,
}

impl PhaseKind {
    pub fn isa(&self) -> &'static str {
        match self {
            PhaseKind::Sources => "PBXSourcesBuildPhase",
            PhaseKind::Frameworks => "PBXFrameworksBuildPhase",
            PhaseKind::Resources => "PBXResourcesBuildPhase",
            PhaseKind::CopyFiles => "PBXCopyFilesBuildPhase",
            PhaseKind::RunScript => "PBXShellScriptBuildPhase",
        }
    }

    pub fn from_isa(isa: &str) -> Result<Self, VocabularyError> {
        match isa {
            "PBXSourcesBuildPhase" => Ok(PhaseKind::Sources),
            "PBXFrameworksBuildPhase" => Ok(PhaseKind::Frameworks),
            "PBXResourcesBuildPhase" => Ok(PhaseKind::Resources),
            "PBXCopyFilesBuildPhase" => Ok(PhaseKind::CopyFiles),
            "PBXShellScriptBuildPhase" => Ok(PhaseKind::RunScript),
            other => Err(VocabularyError::UnknownPhaseIsa {
                isa: other.to_string(),
            }),
        }
    }

    /// Label shown in annotations when the phase carries no explicit name
    pub fn default_label(&self) -> &'static str {
        match self {
            PhaseKind::Sources => "Sources",
            PhaseKind::Frameworks => "Frameworks",
            PhaseKind::Resources => "Resources",
            PhaseKind::CopyFiles => "CopyFiles",
            PhaseKind::RunScript => "ShellScript",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.default_label())
    }
}

/// A build setting value, either a single scalar or an ordered list
///
/// The manifest stores both forms and tools must preserve which one a key
/// uses. Merging replaces whole values per key; appending concatenates and
/// promotes a scalar to a one-element list first so nothing is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Scalar(String),
    List(Vec<String>),
}

impl SettingValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        SettingValue::Scalar(value.into())
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SettingValue::List(items.into_iter().map(Into::into).collect())
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            SettingValue::Scalar(value) => Some(value),
            SettingValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            SettingValue::Scalar(_) => None,
            SettingValue::List(items) => Some(items),
        }
    }

    /// Append items, promoting a scalar to a one-element list
    pub fn append<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut merged = match std::mem::replace(self, SettingValue::List(Vec::new())) {
            SettingValue::Scalar(value) => vec![value],
            SettingValue::List(existing) => existing,
        };
        merged.extend(items.into_iter().map(Into::into));
        *self = SettingValue::List(merged);
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Scalar(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Scalar(value)
    }
}

impl From<Vec<String>> for SettingValue {
    fn from(items: Vec<String>) -> Self {
        SettingValue::List(items)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Scalar(value) => write!(f, "{value}"),
            SettingValue::List(items) => write!(f, "({})", items.join(", ")),
        }
    }
}

/// Build settings for one configuration, ordered by key
pub type BuildSettings = std::collections::BTreeMap<String, SettingValue>;

/// Merge `updates` into `settings`, later writes replacing prior values per key
pub fn merge_settings(settings: &mut BuildSettings, updates: &BuildSettings) {
    for (key, value) in updates {
        settings.insert(key.clone(), value.clone());
    }
}

/// Wire file type inferred from a path's extension, when one is known
pub fn file_type_for_path(path: &str) -> Option<&'static str> {
    let extension = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())?;
    match extension {
        "swift" => Some("sourcecode.swift"),
        "m" => Some("sourcecode.c.objc"),
        "c" => Some("sourcecode.c.c"),
        "h" => Some("sourcecode.c.h"),
        "metal" => Some("sourcecode.metal"),
        "storyboard" => Some("file.storyboard"),
        "xib" => Some("file.xib"),
        "xcassets" => Some("folder.assetcatalog"),
        "plist" => Some("text.plist.xml"),
        "strings" => Some("text.plist.strings"),
        "json" => Some("text.json"),
        "md" => Some("net.daringfireball.markdown"),
        "png" => Some("image.png"),
        "framework" => Some("wrapper.framework"),
        "app" => Some("wrapper.application"),
        "xctest" => Some("wrapper.cfbundle"),
        "a" => Some("archive.ar"),
        "txt" => Some("text"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
