//! Image directory scan.

use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::BONUS_DIR;
use crate::error::BuildError;

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> BuildError + '_ {
    move |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    }
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// True when any directory segment of `relative` is the reserved bonus folder.
pub fn in_bonus_dir(relative: &Path) -> bool {
    relative
        .parent()
        .map(|dir| dir.iter().any(|segment| segment == BONUS_DIR))
        .unwrap_or(false)
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), BuildError> {
    for item in fs::read_dir(dir).map_err(io_err(dir))? {
        let item = item.map_err(io_err(dir))?;
        let path = item.path();
        if path.is_dir() {
            walk(root, &path, out)?;
        } else if let Ok(relative) = path.strip_prefix(root) {
            out.push(relative.to_path_buf());
        }
    }
    Ok(())
}

/// Every image under `root` outside the bonus folder, as root-relative paths
/// joined with `/`, sorted.
pub fn scan_images(root: &Path) -> Result<Vec<String>, BuildError> {
    if !root.is_dir() {
        return Err(BuildError::ImageRootMissing(root.to_path_buf()));
    }
    let mut files = Vec::new();
    walk(root, root, &mut files)?;

    let mut images: Vec<String> = files
        .into_iter()
        .filter(|rel| is_image_file(rel) && !in_bonus_dir(rel))
        .map(|rel| {
            rel.iter()
                .map(|segment| segment.to_string_lossy())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    images.sort();
    log::debug!("found {} images under {}", images.len(), root.display());
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"img").unwrap();
    }

    #[test]
    fn extension_match_ignores_case() {
        assert!(is_image_file(Path::new("Tower.JPG")));
        assert!(is_image_file(Path::new("a/b.Jpeg")));
        assert!(!is_image_file(Path::new("towers.json")));
        assert!(!is_image_file(Path::new("README")));
    }

    #[test]
    fn bonus_segment_detection() {
        assert!(in_bonus_dir(Path::new("PoM/X.jpg")));
        assert!(in_bonus_dir(Path::new("zone1/PoM/X.jpg")));
        assert!(!in_bonus_dir(Path::new("PoM.jpg")));
        assert!(!in_bonus_dir(Path::new("PoMish/X.jpg")));
    }

    #[test]
    fn scan_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "Tower.JPG");
        touch(root, "ToM.png");
        touch(root, "zone2/ToAST.gif");
        touch(root, "PoM/X.jpg");
        touch(root, "towers.json");
        touch(root, "notes.txt");

        let images = scan_images(root).unwrap();
        assert_eq!(images, vec!["ToM.png", "Tower.JPG", "zone2/ToAST.gif"]);
    }

    #[test]
    fn missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan_images(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, BuildError::ImageRootMissing(_)));
    }
}
