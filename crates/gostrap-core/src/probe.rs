use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("no go.mod in {0}")]
    MissingGoMod(PathBuf),
    #[error("cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("go.mod in {0} has no module directive")]
    NoModuleDirective(PathBuf),
    #[error("no Go source files in {0}")]
    NoGoFiles(PathBuf),
}

/// Identity of the Go module the tool runs inside: the declared import
/// path and the name of the package at the module root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    pub import_path: String,
    pub package_name: String,
}

impl GoModule {
    /// Inspect `dir` as a Go module. Requires a parsable `go.mod` and at
    /// least one root `.go` file carrying a package clause.
    pub fn probe(dir: &Path) -> Result<Self, ProbeError> {
        let gomod = dir.join("go.mod");
        if !gomod.is_file() {
            return Err(ProbeError::MissingGoMod(dir.to_path_buf()));
        }
        let text = fs::read_to_string(&gomod).map_err(|source| ProbeError::Unreadable {
            path: gomod,
            source,
        })?;
        let import_path = parse_module_directive(&text)
            .ok_or_else(|| ProbeError::NoModuleDirective(dir.to_path_buf()))?;
        let package_name = root_package_name(dir)?;
        Ok(Self {
            import_path,
            package_name,
        })
    }

    /// Last segment of the import path, e.g. `github.com/acme/netkit` -> `netkit`.
    pub fn base_name(&self) -> &str {
        self.import_path.rsplit('/').next().unwrap_or_default()
    }
}

fn parse_module_directive(text: &str) -> Option<String> {
    for line in text.lines() {
        let line = line.trim();
        let Some(rest) = line.strip_prefix("module") else {
            continue;
        };
        if !rest.starts_with([' ', '\t']) {
            continue;
        }
        let path = rest.trim().trim_matches('"');
        if !path.is_empty() {
            return Some(path.to_string());
        }
    }
    None
}

/// Package clause of the first (alphabetically) non-test `.go` file at the
/// module root.
fn root_package_name(dir: &Path) -> Result<String, ProbeError> {
    let entries = fs::read_dir(dir).map_err(|source| ProbeError::Unreadable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut sources: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension().is_some_and(|ext| ext == "go")
                && !path
                    .file_name()
                    .is_some_and(|name| name.to_string_lossy().ends_with("_test.go"))
        })
        .collect();
    sources.sort();

    for path in sources {
        let text = fs::read_to_string(&path).map_err(|source| ProbeError::Unreadable {
            path: path.clone(),
            source,
        })?;
        if let Some(name) = parse_package_clause(&text) {
            return Ok(name);
        }
    }
    Err(ProbeError::NoGoFiles(dir.to_path_buf()))
}

fn parse_package_clause(text: &str) -> Option<String> {
    let mut in_block_comment = false;
    for line in text.lines() {
        let mut line = line.trim();
        if in_block_comment {
            match line.find("*/") {
                Some(end) => {
                    in_block_comment = false;
                    line = line[end + 2..].trim();
                }
                None => continue,
            }
        }
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        if let Some(rest) = line.strip_prefix("/*") {
            match rest.find("*/") {
                Some(end) => line = rest[end + 2..].trim(),
                None => {
                    in_block_comment = true;
                    continue;
                }
            }
            if line.is_empty() {
                continue;
            }
        }
        let rest = line.strip_prefix("package")?;
        if !rest.starts_with([' ', '\t']) {
            return None;
        }
        return rest
            .split_whitespace()
            .next()
            .map(|name| name.to_string());
    }
    None
}
