use std::io::BufRead;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use tera::Value;

use crate::probe::GoModule;
use crate::prompt::Prompter;

/// Every name template authors may reference. Placeholders outside this
/// registry are rejected at first use instead of failing silently.
pub const PLACEHOLDERS: [&str; 9] = [
    "RootPackageName",
    "BinaryName",
    "IsLibrary",
    "IsApp",
    "MainPath",
    "ArtifactName",
    "ModulePath",
    "ProjectDir",
    "BaseURL",
];

/// Single source of truth for all user-facing and derived project facts.
///
/// Prompted values resolve at most once per run: each lives in an
/// `Option` that is filled on first access and read back afterwards, so
/// repeated accessor calls never touch the input stream again.
pub struct Resolver<R> {
    module: GoModule,
    project_dir: PathBuf,
    base_url: String,
    prompter: Prompter<R>,
    binary_name: Option<String>,
    is_library: Option<bool>,
    main_path: Option<String>,
}

impl<R: BufRead> Resolver<R> {
    pub fn new(
        module: GoModule,
        project_dir: PathBuf,
        base_url: String,
        prompter: Prompter<R>,
    ) -> Self {
        Self {
            module,
            project_dir,
            base_url,
            prompter,
            binary_name: None,
            is_library: None,
            main_path: None,
        }
    }

    pub fn root_package_name(&self) -> &str {
        &self.module.package_name
    }

    pub fn module_path(&self) -> &str {
        &self.module.import_path
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The shared input stream, for the one question that is not a
    /// configuration fact (whether to generate the Makefile).
    pub fn prompter_mut(&mut self) -> &mut Prompter<R> {
        &mut self.prompter
    }

    pub fn binary_name(&mut self) -> Result<String> {
        if let Some(name) = &self.binary_name {
            return Ok(name.clone());
        }
        let default = self.module.base_name().to_string();
        let name = self
            .prompter
            .input("enter the name of the executable binary", &default)?;
        self.binary_name = Some(name.clone());
        Ok(name)
    }

    pub fn is_library(&mut self) -> Result<bool> {
        if let Some(answer) = self.is_library {
            return Ok(answer);
        }
        let answer = self.prompter.confirm("project is a library only")?;
        self.is_library = Some(answer);
        Ok(answer)
    }

    pub fn is_app(&mut self) -> Result<bool> {
        Ok(!self.is_library()?)
    }

    /// Import path of the package holding `func main`. Libraries reuse the
    /// module path without prompting; applications are asked, with the
    /// module path as default only when the root package is itself `main`.
    pub fn main_path(&mut self) -> Result<String> {
        if let Some(path) = &self.main_path {
            return Ok(path.clone());
        }
        let path = if self.is_library()? {
            self.module_path().to_string()
        } else if self.root_package_name() == "main" {
            let default = self.module_path().to_string();
            self.prompter
                .input("enter the import path of the main package", &default)?
        } else {
            let prompt = format!(
                "enter the import path of the main package (e.g. {}/cmd)",
                self.module_path()
            );
            self.prompter.input(&prompt, "")?
        };
        self.main_path = Some(path.clone());
        Ok(path)
    }

    /// Never cached: recomputed from its memoized dependencies so it can
    /// never diverge from them.
    pub fn artifact_name(&mut self) -> Result<String> {
        let name = self.binary_name()?;
        if !self.is_library()? {
            return Ok(name);
        }
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => Ok(format!("lib{}{}", first.to_uppercase(), chars.as_str())),
            None => bail!("cannot derive artifact name: binary name is empty"),
        }
    }

    /// Registry lookup for the template engine. Lazy accessors fire here,
    /// so only placeholders that actually appear in a template cost a
    /// prompt.
    pub fn resolve_placeholder(&mut self, name: &str) -> Result<Value> {
        let value = match name {
            "RootPackageName" => Value::from(self.root_package_name()),
            "BinaryName" => Value::from(self.binary_name()?),
            "IsLibrary" => Value::from(self.is_library()?),
            "IsApp" => Value::from(self.is_app()?),
            "MainPath" => Value::from(self.main_path()?),
            "ArtifactName" => Value::from(self.artifact_name()?),
            "ModulePath" => Value::from(self.module_path()),
            "ProjectDir" => Value::from(self.project_dir.display().to_string()),
            "BaseURL" => Value::from(self.base_url.as_str()),
            other => bail!("unknown template placeholder '{other}'"),
        };
        Ok(value)
    }
}
