use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use layout_eval_core::shared::rect::Rect;

#[derive(Error, Debug)]
pub enum BoxFileError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

/// Reads a box file: one `x y width height [label]` rectangle per line.
///
/// Blank lines and `#` comments are skipped. With a `region_type`, only
/// lines carrying that label (or no label at all) are kept. Order is
/// preserved, since it is the order regions claim shared pixels in.
pub fn read_box_file(path: &Path, region_type: Option<&str>) -> Result<Vec<Rect>, BoxFileError> {
    let text = fs::read_to_string(path).map_err(|source| BoxFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_boxes(&text, path, region_type)
}

pub fn parse_boxes(
    text: &str,
    path: &Path,
    region_type: Option<&str>,
) -> Result<Vec<Rect>, BoxFileError> {
    let mut rects = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let parse_error = |message: String| BoxFileError::Parse {
            path: path.to_path_buf(),
            line: i + 1,
            message,
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 || fields.len() > 5 {
            return Err(parse_error(format!(
                "expected `x y width height [label]`, got {} fields",
                fields.len()
            )));
        }
        let mut coords = [0i32; 4];
        for (slot, field) in coords.iter_mut().zip(&fields) {
            *slot = field
                .parse()
                .map_err(|_| parse_error(format!("`{field}` is not an integer")))?;
        }
        let label = fields.get(4).copied();

        if let (Some(wanted), Some(label)) = (region_type, label) {
            if label != wanted {
                continue;
            }
        }
        let [x, y, width, height] = coords;
        rects.push(Rect::new(x, y, width, height));
    }
    Ok(rects)
}
