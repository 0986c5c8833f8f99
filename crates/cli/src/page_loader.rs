use std::path::{Path, PathBuf};

use thiserror::Error;

use layout_eval_core::accounting::domain::pixel_accountant::PixelAccountant;
use layout_eval_core::metrics::domain::page_totals::PageTotals;
use layout_eval_core::pipeline::evaluate_page_use_case::PageInput;
use layout_eval_core::shared::classified_image::ClassifiedImage;
use layout_eval_core::shared::pixel_class::{Palette, PixelClass, PixelSelector};

use crate::box_file::{read_box_file, BoxFileError};

pub const GT_BOXES: &str = "gt.boxes";
pub const HYP_BOXES: &str = "hyp.boxes";
pub const GT_IMAGE: &str = "gt.png";
pub const HYP_IMAGE: &str = "hyp.png";

#[derive(Error, Debug)]
pub enum PageLoadError {
    #[error("{dir} is missing {file}")]
    Missing { dir: PathBuf, file: &'static str },
    #[error("failed to decode {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Boxes(#[from] BoxFileError),
}

/// Loads one page directory into an evaluation input.
///
/// Page totals are measured on the hypothesis image: every non-background
/// pixel is foreground, and the true-negative colour gives the pixels the
/// hypothesis correctly left unsegmented.
pub fn load_page(
    dir: &Path,
    region_type: Option<&str>,
    palette: Palette,
) -> Result<PageInput, PageLoadError> {
    let ground_truth = read_box_file(&require(dir, GT_BOXES)?, region_type)?;
    let hypothesis = read_box_file(&require(dir, HYP_BOXES)?, region_type)?;
    let gt_image = load_image(&require(dir, GT_IMAGE)?)?;
    let hyp_image = load_image(&require(dir, HYP_IMAGE)?)?;
    for (file, image) in [(GT_IMAGE, &gt_image), (HYP_IMAGE, &hyp_image)] {
        let unknown = unclassified_pixels(image, palette);
        if unknown > 0 {
            log::warn!(
                "{}: {unknown} pixels match no palette colour and count as foreground",
                dir.join(file).display()
            );
        }
    }

    let totals = measure_totals(&hyp_image, palette);
    log::info!(
        "Loaded {}: {}x{}, {} ground truth / {} hypothesis regions, {} foreground pixels",
        dir.display(),
        hyp_image.width(),
        hyp_image.height(),
        ground_truth.len(),
        hypothesis.len(),
        totals.total_fg_pixels
    );

    Ok(PageInput {
        name: page_name(dir),
        ground_truth,
        hypothesis,
        gt_image,
        hyp_image,
        totals,
        region_type: region_type.map(str::to_string),
    })
}

pub fn measure_totals(image: &ClassifiedImage, palette: Palette) -> PageTotals {
    let accountant = PixelAccountant::new(palette);
    let area = image.width() as u64 * image.height() as u64;
    let foreground = accountant.count_image(image, PixelSelector::AnyForeground);
    let true_negatives =
        accountant.count_image(image, PixelSelector::Class(PixelClass::TrueNegative));
    PageTotals::new(area, foreground).with_true_negatives(true_negatives)
}

/// Pixels whose colour is not in the palette.
pub fn unclassified_pixels(image: &ClassifiedImage, palette: Palette) -> u64 {
    image
        .data()
        .chunks_exact(3)
        .filter(|px| palette.classify([px[0], px[1], px[2]]).is_none())
        .count() as u64
}

fn require(dir: &Path, file: &'static str) -> Result<PathBuf, PageLoadError> {
    let path = dir.join(file);
    if !path.is_file() {
        return Err(PageLoadError::Missing {
            dir: dir.to_path_buf(),
            file,
        });
    }
    Ok(path)
}

fn load_image(path: &Path) -> Result<ClassifiedImage, PageLoadError> {
    let img = image::open(path)
        .map_err(|source| PageLoadError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();
    Ok(ClassifiedImage::from(img))
}

fn page_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use layout_eval_core::shared::rect::Rect;
    use std::fs;

    /// Writes a 20x10 page: one 10x10 region, detected on its left half.
    pub(crate) fn write_page(dir: &Path) {
        let palette = Palette::default();
        let mut img = image::RgbImage::from_pixel(20, 10, image::Rgb(palette.background));
        for y in 0..10 {
            for x in 0..10 {
                let class = if x < 5 {
                    PixelClass::TruePositive
                } else {
                    PixelClass::FalseNegative
                };
                img.put_pixel(x, y, image::Rgb(palette.color(class)));
            }
            img.put_pixel(19, y, image::Rgb(palette.true_negative));
        }
        img.save(dir.join(GT_IMAGE)).unwrap();
        img.save(dir.join(HYP_IMAGE)).unwrap();
        fs::write(dir.join(GT_BOXES), "0 0 10 10 paragraph\n").unwrap();
        fs::write(dir.join(HYP_BOXES), "0 0 5 10 paragraph\n").unwrap();
    }

    #[test]
    fn test_load_page() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path());

        let page = load_page(dir.path(), Some("paragraph"), Palette::default()).unwrap();
        assert_eq!(page.ground_truth.len(), 1);
        assert_eq!(page.hypothesis.len(), 1);
        assert_eq!(page.gt_image.dimensions(), (20, 10));
        assert_eq!(page.totals.total_area, 200);
        assert_eq!(page.totals.total_fg_pixels, 110);
        assert_eq!(page.totals.true_negative_pixels, Some(10));
        assert_eq!(page.region_type.as_deref(), Some("paragraph"));
    }

    #[test]
    fn test_unclassified_pixels() {
        let palette = Palette::default();
        let mut image = ClassifiedImage::filled(4, 4, palette.background);
        image.paint(Rect::new(0, 0, 2, 1), [1, 2, 3]);
        image.paint(Rect::new(0, 1, 4, 1), palette.true_positive);
        assert_eq!(unclassified_pixels(&image, palette), 2);
    }

    #[test]
    fn test_region_type_filters_boxes() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path());
        let page = load_page(dir.path(), Some("figure"), Palette::default()).unwrap();
        assert!(page.ground_truth.is_empty());
        assert!(page.hypothesis.is_empty());
    }

    #[test]
    fn test_missing_file_reported() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path());
        fs::remove_file(dir.path().join(HYP_IMAGE)).unwrap();

        let err = load_page(dir.path(), None, Palette::default()).unwrap_err();
        assert!(matches!(err, PageLoadError::Missing { file: HYP_IMAGE, .. }));
    }

    #[test]
    fn test_undecodable_image_reported() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path());
        fs::write(dir.path().join(GT_IMAGE), b"not a png").unwrap();

        let err = load_page(dir.path(), None, Palette::default()).unwrap_err();
        assert!(matches!(err, PageLoadError::Image { .. }));
    }
}
