//! New-project scaffolding from on-disk templates
//!
//! A template is a directory holding a `template.toml` manifest next to a
//! `tree/` with the files to stamp out. Templates live under a registry
//! root (`~/.xcforge/templates` by default); the iOS app template ships
//! embedded in the binary and installs itself on first use. Scaffolding
//! copies the tree, renames the template's placeholders to the new
//! project's name, and hands back a loaded [`XcodeProject`] session.

use std::fmt;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::application::session::{
    FileSystemProvider, ProcessProvider, fetch_last_selected_team_id,
};
use crate::pbx::project::{ProjectError, XcodeProject};

pub const IOS_APP_TEMPLATE_MANIFEST: &str = include_str!("../../templates/ios-app/template.toml");
pub const IOS_APP_TEMPLATE_PBXPROJ: &str =
    include_str!("../../templates/ios-app/tree/IOSAppTemplate.xcodeproj/project.pbxproj");
pub const IOS_APP_TEMPLATE_APP_SWIFT: &str =
    include_str!("../../templates/ios-app/tree/IOSAppTemplate/Sources/IOSAppTemplateApp.swift");

/// Template flavor a new project is stamped from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectKind {
    IosApp,
    IosFramework,
    IosStaticLibrary,
    MacApp,
    MacCli,
}

impl ProjectKind {
    /// Directory name under the registry root
    pub fn dir_name(&self) -> &'static str {
        match self {
            ProjectKind::IosApp => "ios-app",
            ProjectKind::IosFramework => "ios-framework",
            ProjectKind::IosStaticLibrary => "ios-static-library",
            ProjectKind::MacApp => "mac-app",
            ProjectKind::MacCli => "mac-cli",
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

/// Parsed `template.toml` describing one installed template
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateManifest {
    /// Placeholder name the tree's files and content carry
    pub name: String,
    pub kind: ProjectKind,
    /// Deployment target the tree is pinned to, rewritten at stamp time
    pub deployment_target: String,
    /// Source files under `tree/`, placeholder-named paths renamed and
    /// rewritten when the template is stamped
    #[serde(default)]
    pub sources: Vec<String>,
}

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("no template installed for {kind}")]
    TemplateNotFound { kind: ProjectKind },

    #[error("template manifest does not parse: {source}")]
    Manifest {
        #[from]
        source: toml::de::Error,
    },

    #[error("destination {path} already exists")]
    DestinationExists { path: String },

    #[error("external collaborator failed: {message}")]
    Collaborator { message: String },

    #[error(transparent)]
    Project {
        #[from]
        source: ProjectError,
    },
}

fn collaborator(err: anyhow::Error) -> ScaffoldError {
    ScaffoldError::Collaborator {
        message: format!("{err:#}"),
    }
}

/// Template located on disk, manifest plus the tree to copy
#[derive(Debug, Clone)]
pub struct ResolvedTemplate {
    pub manifest: TemplateManifest,
    pub tree: PathBuf,
}

/// Directory of installed templates, one subdirectory per [`ProjectKind`]
pub struct TemplateRegistry {
    root: PathBuf,
}

impl TemplateRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        TemplateRegistry { root: root.into() }
    }

    /// Registry under the user's home directory, if one exists
    pub fn default_root() -> Option<Self> {
        let base_dirs = BaseDirs::new()?;
        Some(TemplateRegistry::new(
            base_dirs.home_dir().join(".xcforge/templates"),
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn template_dir(&self, kind: ProjectKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    /// Locate the template for `kind`, installing the embedded iOS app
    /// template on first use
    pub fn resolve(
        &self,
        fs: &dyn FileSystemProvider,
        kind: ProjectKind,
    ) -> Result<ResolvedTemplate, ScaffoldError> {
        let dir = self.template_dir(kind);
        let manifest_path = dir.join("template.toml");
        if !fs.file_exists(&manifest_path) {
            if kind != ProjectKind::IosApp {
                return Err(ScaffoldError::TemplateNotFound { kind });
            }
            self.install_ios_app(fs)?;
        }
        let manifest_text = fs.read_text_file(&manifest_path).map_err(collaborator)?;
        let manifest: TemplateManifest = toml::from_str(&manifest_text)?;
        debug!(kind = %kind, name = manifest.name, "resolved template");
        Ok(ResolvedTemplate {
            manifest,
            tree: dir.join("tree"),
        })
    }

    fn install_ios_app(&self, fs: &dyn FileSystemProvider) -> Result<(), ScaffoldError> {
        let dir = self.template_dir(ProjectKind::IosApp);
        let writes = [
            (dir.join("template.toml"), IOS_APP_TEMPLATE_MANIFEST),
            (
                dir.join("tree/IOSAppTemplate.xcodeproj/project.pbxproj"),
                IOS_APP_TEMPLATE_PBXPROJ,
            ),
            (
                dir.join("tree/IOSAppTemplate/Sources/IOSAppTemplateApp.swift"),
                IOS_APP_TEMPLATE_APP_SWIFT,
            ),
        ];
        for (path, content) in writes {
            fs.write_text_file(&path, content).map_err(collaborator)?;
        }
        info!(root = %self.root.display(), "installed embedded ios-app template");
        Ok(())
    }
}

/// What to stamp out and where
#[derive(Debug, Clone)]
pub struct NewProjectSpec {
    pub name: String,
    /// Parent directory the project directory is created under
    pub path: PathBuf,
    pub kind: ProjectKind,
    pub bundle_identifier: String,
    pub deployment_target: String,
    /// Bundle display name, the project name when absent
    pub display_name: Option<String>,
}

/// Stamp a new project from a template and load it
///
/// Copies the template tree, renames the placeholder project and the
/// source files its manifest lists, rewrites the project name and
/// deployment target inside the files, then configures signing
/// (from the host's last selected team, when one exists), the bundle
/// identifier, and the display name through the loaded session.
pub fn create_new_project<'fs>(
    fs: &'fs dyn FileSystemProvider,
    process: &dyn ProcessProvider,
    registry: &TemplateRegistry,
    spec: &NewProjectSpec,
) -> Result<XcodeProject<'fs>, ScaffoldError> {
    let template = registry.resolve(fs, spec.kind)?;
    let placeholder = template.manifest.name.as_str();
    let project_dir = spec.path.join(&spec.name);
    if fs.file_exists(&project_dir) {
        return Err(ScaffoldError::DestinationExists {
            path: project_dir.display().to_string(),
        });
    }

    fs.copy_tree(&template.tree, &project_dir).map_err(collaborator)?;
    fs.move_item(
        &project_dir.join(format!("{placeholder}.xcodeproj")),
        &project_dir.join(format!("{}.xcodeproj", spec.name)),
    )
    .map_err(collaborator)?;
    fs.move_item(&project_dir.join(placeholder), &project_dir.join(&spec.name))
        .map_err(collaborator)?;

    // Manifest source paths still name the placeholder; the top directory
    // was just renamed, file names and contents are rewritten here.
    for source in &template.manifest.sources {
        let (dir, file) = match source.rsplit_once('/') {
            Some((dir, file)) => (dir.replace(placeholder, &spec.name), file),
            None => (String::new(), source.as_str()),
        };
        let dir = project_dir.join(dir);
        let stamped = dir.join(file.replace(placeholder, &spec.name));
        if file.contains(placeholder) {
            fs.move_item(&dir.join(file), &stamped).map_err(collaborator)?;
        }
        fs.replace_occurrences(&stamped, placeholder, &spec.name)
            .map_err(collaborator)?;
    }

    let manifest_file = project_dir
        .join(format!("{}.xcodeproj", spec.name))
        .join("project.pbxproj");
    fs.replace_occurrences(&manifest_file, placeholder, &spec.name)
        .map_err(collaborator)?;
    fs.replace_occurrences(
        &manifest_file,
        &template.manifest.deployment_target,
        &spec.deployment_target,
    )
    .map_err(collaborator)?;

    let mut project = XcodeProject::load(fs, &project_dir)?;
    if let Some(team) = fetch_last_selected_team_id(process) {
        project.set_signing_account(&spec.name, &team, None)?;
    }
    project.update_bundle_identifier(&spec.name, &spec.bundle_identifier)?;
    let display_name = spec.display_name.as_deref().unwrap_or(&spec.name);
    project.update_display_name(&spec.name, display_name)?;
    info!(name = spec.name, dir = %project_dir.display(), "created project");
    Ok(project)
}

#[cfg(test)]
mod tests {
    include!("scaffold.test.rs");
}
