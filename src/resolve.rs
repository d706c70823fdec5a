//! The cascade resolver (spec §4.4) and section matcher (spec §4.3).

use crate::error::Error;
use crate::glob;
use crate::ini::{self, ConfigFile};
use crate::property::{keys, PropertyMap};
use crate::version::{Version, MAX_VERSION};
use std::path::{Path, PathBuf};

/// The minimum version at which `indent_style = tab` implies
/// `indent_size = tab` when `indent_size` is otherwise unset.
const INDENT_SIZE_TAB_INJECTION_VERSION: Version = Version::new(0, 10, 0);

/// Options controlling a single [`resolve`] call.
#[derive(Debug, Clone)]
pub struct Options<'a> {
    /// Configuration file name to look for in each ancestor directory.
    pub conf_filename: &'a str,
    /// The EditorConfig version to emulate for version-gated behaviors.
    pub version: Version,
}

impl Default for Options<'_> {
    fn default() -> Self {
        Self { conf_filename: ".editorconfig", version: MAX_VERSION }
    }
}

/// Resolves the effective properties for `path` using default options.
pub fn resolve(path: &Path) -> Result<PropertyMap, Error> {
    resolve_with_options(path, &Options::default())
}

/// Resolves the effective properties for `path`, per spec §4.4.
pub fn resolve_with_options(path: &Path, options: &Options<'_>) -> Result<PropertyMap, Error> {
    if !path.is_absolute() {
        return Err(Error::Path { message: format!("{} is not an absolute path", path.display()) });
    }
    if options.version > MAX_VERSION {
        return Err(Error::Version {
            message: format!(
                "requested version {} is newer than the supported maximum {MAX_VERSION}",
                options.version
            ),
        });
    }

    let target = normalize(path);
    let ancestors = ancestor_conf_paths(&target, options.conf_filename);

    let mut props = PropertyMap::new();
    let mut provenance: Vec<(String, PathBuf)> = Vec::new();

    for conf_path in ancestors.into_iter().rev() {
        log::trace!("reading {}", conf_path.display());
        let file = ini::read(&conf_path)?;
        apply_file(&file, &conf_path, &target, &mut props, &mut provenance);
        if file.root {
            log::debug!("{} is a root file; stopping ancestor walk", conf_path.display());
            break;
        }
    }

    canonicalize(&mut props, options.version);
    validate(&props, &provenance)?;

    Ok(props)
}

/// Builds the list of `<dir>/<conf_filename>` candidates, directory of
/// `path` first, filesystem root last.
fn ancestor_conf_paths(path: &Path, conf_filename: &str) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    let mut dir = path.parent().map(Path::to_path_buf);
    while let Some(d) = dir {
        let parent = d.parent().map(Path::to_path_buf);
        let stop = parent.as_deref() == Some(d.as_path());
        dirs.push(d.clone());
        if stop || parent.is_none() {
            break;
        }
        dir = parent;
    }
    dirs.into_iter().map(|d| d.join(conf_filename)).collect()
}

fn apply_file(
    file: &ConfigFile,
    conf_path: &Path,
    target: &str,
    props: &mut PropertyMap,
    provenance: &mut Vec<(String, PathBuf)>,
) {
    let Some(anchor_dir) = conf_path.parent() else { return };
    let anchor_dir = normalize(anchor_dir);

    for section in &file.sections {
        if !section_matches(&section.header, &anchor_dir, target) {
            continue;
        }
        for (key, value) in &section.declarations {
            props.set(key, value);
            if let Some(slot) = provenance.iter_mut().find(|(k, _)| k == key) {
                slot.1 = conf_path.to_path_buf();
            } else {
                provenance.push((key.clone(), conf_path.to_path_buf()));
            }
        }
    }
}

/// Section matcher, spec §4.3.
fn section_matches(header: &str, anchor_dir: &str, target: &str) -> bool {
    let re = glob::compile(anchor_dir, header);
    re.is_match(target)
}

/// Lower-cases the path separators to `/` and strips a trailing slash,
/// so compiled patterns only ever see `/`-separated absolute paths.
fn normalize(path: &Path) -> String {
    let s = path.to_string_lossy().replace('\\', "/");
    if s.len() > 1 { s.trim_end_matches('/').to_owned() } else { s }
}

/// Canonicalization rules, spec §4.4.
fn canonicalize(props: &mut PropertyMap, version: Version) {
    for key in keys::LOWERCASED {
        if let Some(value) = props.get(key) {
            let lowered = value.to_ascii_lowercase();
            if lowered != value {
                props.set(key, &lowered);
            }
        }
    }

    let indent_style_is_tab = props.get(keys::INDENT_STYLE) == Some("tab");
    if indent_style_is_tab
        && !props.contains_key(keys::INDENT_SIZE)
        && version >= INDENT_SIZE_TAB_INJECTION_VERSION
    {
        props.set(keys::INDENT_SIZE, "tab");
    }

    if let Some(indent_size) = props.get(keys::INDENT_SIZE) {
        if indent_size != "tab" && !props.contains_key(keys::TAB_WIDTH) {
            let indent_size = indent_size.to_owned();
            props.set(keys::TAB_WIDTH, &indent_size);
        }
    }

    if props.get(keys::INDENT_SIZE) == Some("tab") {
        if let Some(tab_width) = props.get(keys::TAB_WIDTH) {
            let tab_width = tab_width.to_owned();
            props.set(keys::INDENT_SIZE, &tab_width);
        }
    }
}

/// Validation, spec §4.4's domain table. Messages are reused verbatim from
/// `handler.py::check_options`'s diagnostics (typos included) so `Display`
/// output matches the reference tool's.
fn validate(props: &PropertyMap, provenance: &[(String, PathBuf)]) -> Result<(), Error> {
    for (key, domain) in VALIDATED {
        let Some(value) = props.get(key) else { continue };
        if !domain.accepts(value) {
            let path = provenance
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, p)| p.clone())
                .unwrap_or_default();
            return Err(Error::InvalidValue {
                path,
                option: (*key).to_owned(),
                value: value.to_owned(),
                message: (domain.message)(value),
            });
        }
    }
    Ok(())
}

struct Domain {
    accepts: fn(&str) -> bool,
    message: fn(&str) -> String,
}

const VALIDATED: &[(&str, Domain)] = &[
    (
        keys::INDENT_STYLE,
        Domain {
            accepts: |v| matches!(v, "tab" | "space"),
            message: |v| format!(r#"ident_style must be "tab" or "space", not "{v}""#),
        },
    ),
    (
        keys::INDENT_SIZE,
        Domain {
            accepts: is_whole_number,
            message: |v| format!(r#"ident_size must be a whole number, not "{v}""#),
        },
    ),
    (
        keys::TAB_WIDTH,
        Domain {
            accepts: is_whole_number,
            message: |v| format!(r#"tab_width must be a whole number, not "{v}""#),
        },
    ),
    (
        keys::END_OF_LINE,
        Domain {
            accepts: |v| matches!(v, "lf" | "cr" | "crlf"),
            message: |v| format!(r#"end_of_line must be "lf", "cr", or "crlf" , not "{v}""#),
        },
    ),
    (
        keys::CHARSET,
        Domain {
            accepts: |v| matches!(v, "latin1" | "utf-8" | "utf-8-bom" | "utf-16be" | "utf-16le"),
            message: |v| {
                format!(
                    r#"charset must be "latin1", "utf-8", "utf-8-bom", "utf-16be" or "utf-16le", not "{v}""#
                )
            },
        },
    ),
    (
        keys::TRIM_TRAILING_WHITESPACE,
        Domain {
            accepts: |v| matches!(v, "true" | "false"),
            message: |v| format!(r#"trim_trailing_whitespace be "true" or "false", not "{v}""#),
        },
    ),
    (
        keys::INSERT_FINAL_NEWLINE,
        Domain {
            accepts: |v| matches!(v, "true" | "false"),
            message: |v| format!(r#"insert_final_newline be "true" or "false", not "{v}""#),
        },
    ),
];

fn is_whole_number(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) && value.parse::<u64>().is_ok_and(|n| n > 0)
}
