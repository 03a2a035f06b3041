use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// `dir/truck.actions.ts` + `generated` → `dir/truck.actions.generated.ts`.
pub fn generated_path(input: &Path, infix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match input.extension() {
        Some(ext) => format!("{stem}.{infix}.{}", ext.to_string_lossy()),
        None => format!("{stem}.{infix}"),
    };
    input.with_file_name(file_name)
}

/// Where the reducer goes: beside the actions output, named after the input.
pub fn reducer_path(input: &Path, actions_output: &Path, suffix: &str) -> PathBuf {
    let name = generated_path(input, &format!("reducer.{suffix}"));
    match (actions_output.parent(), name.file_name()) {
        (Some(dir), Some(file_name)) => dir.join(file_name),
        _ => name,
    }
}

/// The specifier a file written at `output` uses to import `input`:
/// relative to the output's directory, `/`-separated, without the input's
/// extension, and always starting with `./` or `../`.
pub fn import_specifier(output: &Path, input: &Path) -> String {
    let output = normalize(output);
    let input = normalize(input).with_extension("");

    let from: Vec<Component> = output
        .parent()
        .map(|dir| dir.components().collect())
        .unwrap_or_default();
    let to: Vec<Component> = input.components().collect();
    let common = from
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts = vec!["..".to_string(); from.len() - common];
    parts.extend(
        to[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    let joined = parts.join("/");
    if joined.starts_with("../") {
        joined
    } else {
        format!("./{joined}")
    }
}

/// Absolute form of `path` with `.` and `..` resolved lexically.
fn normalize(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Replace `path` with `contents` through a temporary sibling and a rename,
/// so readers never observe a partially written file.
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name"))?;
    let tmp = path.with_file_name(format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        std::process::id()
    ));

    fs::write(&tmp, contents)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}
