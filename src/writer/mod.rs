//! Canonical rendering and change-gated rewriting of module config files.
//!
//! A [`ConfWriter`] renders an ordered parameter list into the line-oriented
//! `path[:JSON] value` format, decides via [`ConfWriter::is_modified`]
//! whether the previous on-disk content differs once comment and blank
//! lines are ignored, and on [`ConfWriter::close`] replaces the file whole
//! with a provenance-stamped rendition.
//!
//! The comment-stripping diff exists so a scheduler can run the pipeline on
//! every tick: an unchanged parameter set never touches the filesystem
//! (the header timestamp alone never forces a rewrite), while every real
//! change stays observable through the file mtime.

mod error;

pub use error::WriteError;

use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::LazyLock;

use chrono::Local;
use regex::bytes::Regex;

/// Blank lines and comment lines (first non-whitespace byte is `#`),
/// including their terminator. Everything else is canonical content.
static SKIP_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(?:#.*)?(?:\n|$)").unwrap());

// ============================================================================
// ModuleParam
// ============================================================================

/// One renderable parameter: resolved path, resolved value, and whether the
/// rendered line carries the `:JSON` type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleParam {
    pub path: String,
    pub value: String,
    pub json: bool,
}

impl ModuleParam {
    pub fn new(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
            json: false,
        }
    }

    /// Tag the rendered line as JSON-typed.
    pub fn with_json(mut self) -> Self {
        self.json = true;
        self
    }
}

// ============================================================================
// ConfWriter
// ============================================================================

/// Writes one module's config file.
///
/// One instance per target file per update pass; nothing persists between
/// instances. Concurrent writers on the same path race at the filesystem
/// level and the last [`close`](Self::close) wins.
#[derive(Debug)]
pub struct ConfWriter {
    file: PathBuf,
    module: String,
    mtime: String,
    content: String,
}

impl ConfWriter {
    pub fn new(
        file: impl Into<PathBuf>,
        module: impl Into<String>,
        mtime: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            module: module.into(),
            mtime: mtime.into(),
            content: String::new(),
        }
    }

    /// Render `params` into the canonical content buffer, one
    /// `path[:JSON] value` line per parameter, preserving input order
    /// verbatim. No sorting, no deduplication, no escaping: keeping
    /// newlines and header-look-alike text out of paths and values is the
    /// caller's responsibility.
    pub fn render(&mut self, params: &[ModuleParam]) {
        let mut content = String::new();
        for param in params {
            content.push_str(&param.path);
            if param.json {
                content.push_str(":JSON");
            }
            content.push(' ');
            content.push_str(&param.value);
            content.push('\n');
        }
        self.content = content;
    }

    /// Whether `old_content` differs from the rendered buffer once blank
    /// and comment lines are removed.
    ///
    /// This is the idempotence gate: the writer's own prior output, whose
    /// header is comment-only, compares as unmodified as long as the
    /// parameter lines are byte-identical.
    pub fn is_modified(&self, old_content: &[u8]) -> bool {
        SKIP_LINE.replace_all(old_content, &b""[..]).as_ref() != self.content.as_bytes()
    }

    /// Replace the target file with the provenance header, the rendered
    /// content, and the `#EOF` terminator.
    ///
    /// Not atomic: a failure mid-way surfaces the error but can leave a
    /// truncated file behind. The handle itself is released on every path.
    pub fn close(self) -> Result<(), WriteError> {
        let Self {
            file,
            module,
            mtime,
            content,
        } = self;
        let out = File::create(&file).map_err(|e| WriteError::Create(file.clone(), e))?;
        write_conf(out, &module, &mtime, &content).map_err(|e| WriteError::Write(file, e))
    }
}

/// Header, blank separator, content, `#EOF` (no trailing newline).
fn write_conf(mut out: impl Write, module: &str, mtime: &str, content: &str) -> io::Result<()> {
    writeln!(
        out,
        "# This file is autogenerated by {} at {}",
        generator(),
        Local::now().format("%Y-%m-%d %H:%M:%S"),
    )?;
    writeln!(out, "#! Name {module}")?;
    writeln!(out, "#! Version {mtime}")?;
    writeln!(out)?;
    out.write_all(content.as_bytes())?;
    write!(out, "#EOF")
}

/// Generator identity for the provenance header: the invoking binary's
/// argv[0], falling back to the crate name.
fn generator() -> String {
    env::args()
        .next()
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn params() -> Vec<ModuleParam> {
        vec![
            ModuleParam::new("db/hosts", "10.0.0.1,10.0.0.2"),
            ModuleParam::new("features/flags", r#"{"beta":true}"#).with_json(),
        ]
    }

    /// Writer with `params` rendered but nothing written to disk.
    fn rendered(params: &[ModuleParam]) -> ConfWriter {
        let mut writer = ConfWriter::new("/unused", "core", "42");
        writer.render(params);
        writer
    }

    fn write_to(path: &std::path::Path, params: &[ModuleParam]) -> Vec<u8> {
        let mut writer = ConfWriter::new(path, "core", "42");
        writer.render(params);
        writer.close().unwrap();
        fs::read(path).unwrap()
    }

    #[test]
    fn test_render_preserves_order_and_tags() {
        let mut writer = ConfWriter::new("/unused", "core", "42");
        writer.render(&[
            ModuleParam::new("a", "1"),
            ModuleParam::new("b", "2").with_json(),
        ]);
        assert_eq!(writer.content, "a 1\nb:JSON 2\n");
    }

    #[test]
    fn test_rerender_replaces_buffer() {
        let mut writer = ConfWriter::new("/unused", "core", "42");
        writer.render(&[ModuleParam::new("a", "1")]);
        writer.render(&[ModuleParam::new("b", "2")]);
        assert_eq!(writer.content, "b 2\n");
    }

    #[test]
    fn test_written_file_shape_with_empty_params() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("core.conf");
        let bytes = write_to(&path, &[]);

        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("# This file is autogenerated by "));
        assert_eq!(lines[1], "#! Name core");
        assert_eq!(lines[2], "#! Version 42");
        assert_eq!(lines[3], "");
        assert!(text.ends_with("#EOF"));
        assert!(!text.ends_with('\n'));

        // Stripped of its header block the file is empty.
        assert!(!rendered(&[]).is_modified(text.as_bytes()));
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let on_disk = write_to(&dir.path().join("core.conf"), &params());

        assert!(!rendered(&params()).is_modified(&on_disk));
    }

    #[test]
    fn test_content_changes_are_detected() {
        let dir = TempDir::new().unwrap();
        let on_disk = write_to(&dir.path().join("core.conf"), &params());

        let mut value_edit = params();
        value_edit[0].value = "10.0.0.3".into();
        assert!(rendered(&value_edit).is_modified(&on_disk));

        let mut path_edit = params();
        path_edit[1].path = "features/toggles".into();
        assert!(rendered(&path_edit).is_modified(&on_disk));

        let mut added = params();
        added.push(ModuleParam::new("extra", "1"));
        assert!(rendered(&added).is_modified(&on_disk));

        let mut removed = params();
        removed.pop();
        assert!(rendered(&removed).is_modified(&on_disk));
    }

    #[test]
    fn test_comment_and_blank_reformatting_is_ignored() {
        let old = "# rewritten header\n\n\n  # indented note\n\
                   db/hosts 10.0.0.1,10.0.0.2\n\
                   features/flags:JSON {\"beta\":true}\n\n#EOF";
        assert!(!rendered(&params()).is_modified(old.as_bytes()));
    }

    #[test]
    fn test_hash_inside_a_value_is_not_a_comment() {
        let writer = rendered(&[ModuleParam::new("motd", "free # as in beer")]);
        assert!(!writer.is_modified(b"motd free # as in beer\n"));
        assert!(writer.is_modified(b"motd free\n"));
    }

    #[test]
    fn test_empty_render_against_populated_file_is_modified() {
        assert!(rendered(&[]).is_modified(b"a 1\n"));
        assert!(!rendered(&[]).is_modified(b""));
    }

    #[test]
    fn test_close_on_unwritable_path_fails() {
        let dir = TempDir::new().unwrap();
        let mut writer = ConfWriter::new(dir.path(), "core", "42");
        writer.render(&[]);

        let err = writer.close().unwrap_err();
        assert!(matches!(err, WriteError::Create(..)));
    }
}
