use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

use super::header::EntryHeader;

/// Output location of an entry: `root/<prefix>/<name>`.
///
/// `prefix` and `name` are resolved component by component. `.` is dropped
/// and `..` removes the previous component. Rejected: absolute paths, a
/// `..` that would climb above `root` (or, inside `name`, above the
/// prefix), and a `name` that resolves to nothing.
pub fn entry_output_path(root: &Path, header: &EntryHeader, offset: u64) -> Result<PathBuf> {
    let unsafe_path = || Error::UnsafePath {
        name: header.name.clone(),
        prefix: header.prefix.clone(),
        offset,
    };

    let mut relative = PathBuf::new();
    let mut depth = 0usize;

    push_components(&mut relative, &mut depth, 0, &header.prefix).ok_or_else(unsafe_path)?;
    let floor = depth;
    push_components(&mut relative, &mut depth, floor, &header.name).ok_or_else(unsafe_path)?;

    if depth == floor {
        return Err(unsafe_path());
    }

    Ok(root.join(relative))
}

fn push_components(relative: &mut PathBuf, depth: &mut usize, floor: usize, part: &str) -> Option<()> {
    for component in Path::new(part).components() {
        match component {
            Component::Normal(segment) => {
                relative.push(segment);
                *depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if *depth == floor {
                    return None;
                }
                relative.pop();
                *depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(name: &str, prefix: &str) -> EntryHeader {
        EntryHeader {
            name: name.into(),
            size: 0,
            mtime: String::new(),
            prefix: prefix.into(),
        }
    }

    fn resolve(name: &str, prefix: &str) -> Result<PathBuf> {
        entry_output_path(Path::new("/out"), &header(name, prefix), 0)
    }

    #[test]
    fn joins_prefix_and_name() {
        assert_eq!(
            resolve("a.txt", "dir1/dir2").unwrap(),
            Path::new("/out/dir1/dir2/a.txt")
        );
        assert_eq!(resolve("b.txt", "").unwrap(), Path::new("/out/b.txt"));
        assert_eq!(resolve("c.txt", ".").unwrap(), Path::new("/out/c.txt"));
    }

    #[test]
    fn parent_components_inside_root_are_normalized() {
        assert_eq!(
            resolve("x", "a/../b/./c").unwrap(),
            Path::new("/out/b/c/x")
        );
    }

    #[test]
    fn escaping_paths_are_rejected() {
        for (name, prefix) in [
            ("passwd", "../etc"),
            ("x", "a/../../b"),
            ("..", ""),
            ("shadow", "/etc"),
            ("", ""),
            ("", "dir"),
        ] {
            let err = resolve(name, prefix).unwrap_err();
            assert!(
                matches!(err, Error::UnsafePath { .. }),
                "({name:?}, {prefix:?}) gave {err:?}"
            );
        }
    }
}
