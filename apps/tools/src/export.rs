//! Assembles a static bundle from a build output and a public asset directory.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ExportLayout {
    pub build_dir: PathBuf,
    pub public_dir: PathBuf,
    pub out_dir: PathBuf,
}

impl ExportLayout {
    fn standalone_dir(&self) -> PathBuf {
        self.build_dir.join("standalone")
    }

    fn static_dir(&self) -> PathBuf {
        self.build_dir.join("static")
    }

    fn static_target(&self) -> PathBuf {
        self.out_dir.join("_next").join("static")
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportReport {
    pub files_copied: usize,
}

/// Empties `out_dir`, then copies `standalone`, `static` (under
/// `_next/static`) and the public directory into it, in that order. Later
/// copies overwrite earlier files with the same path.
pub fn export_site(layout: &ExportLayout) -> Result<ExportReport> {
    let standalone = layout.standalone_dir();
    let static_assets = layout.static_dir();
    let sources = [&standalone, &static_assets, &layout.public_dir];

    for source in sources {
        if !source.is_dir() {
            bail!(
                "export source '{}' is missing or not a directory",
                source.display()
            );
        }
    }
    ensure_disjoint(&layout.out_dir, &sources)?;

    empty_dir(&layout.out_dir)?;

    let mut report = ExportReport::default();
    report.files_copied += copy_tree(&standalone, &layout.out_dir)?;
    report.files_copied += copy_tree(&static_assets, &layout.static_target())?;
    report.files_copied += copy_tree(&layout.public_dir, &layout.out_dir)?;

    info!(
        out_dir = %layout.out_dir.display(),
        files = report.files_copied,
        "export: bundle written"
    );
    Ok(report)
}

fn ensure_disjoint(out_dir: &Path, sources: &[&PathBuf]) -> Result<()> {
    let out_dir = resolve_target(out_dir)?;
    for source in sources {
        let source = source
            .canonicalize()
            .with_context(|| format!("failed to resolve '{}'", source.display()))?;
        if out_dir.starts_with(&source) || source.starts_with(&out_dir) {
            bail!(
                "output directory '{}' overlaps export source '{}'",
                out_dir.display(),
                source.display()
            );
        }
    }
    Ok(())
}

/// Canonical form of a path that may not exist yet: the nearest existing
/// ancestor is canonicalized and the missing tail re-appended.
fn resolve_target(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .context("failed to read the current directory")?
            .join(path)
    };

    let mut missing = Vec::new();
    let mut existing = absolute.as_path();
    loop {
        if let Ok(resolved) = existing.canonicalize() {
            return Ok(missing
                .iter()
                .rev()
                .fold(resolved, |resolved, part| resolved.join(part)));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return Ok(absolute),
        }
    }
}

fn empty_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)
            .with_context(|| format!("failed to clear output directory '{}'", dir.display()))?;
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
    Ok(())
}

fn copy_tree(source: &Path, target: &Path) -> Result<usize> {
    fs::create_dir_all(target)
        .with_context(|| format!("failed to create directory '{}'", target.display()))?;

    let mut copied = 0;
    let entries = fs::read_dir(source)
        .with_context(|| format!("failed to read directory '{}'", source.display()))?;
    for entry in entries {
        let entry = entry?;
        let from = entry.path();
        let to = target.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copied += copy_tree(&from, &to)?;
        } else {
            fs::copy(&from, &to).with_context(|| {
                format!("failed to copy '{}' to '{}'", from.display(), to.display())
            })?;
            debug!(from = %from.display(), to = %to.display(), "export: copied");
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
#[path = "tests/export_tests.rs"]
mod tests;
