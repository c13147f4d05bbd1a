//! Image samples and feature flattening
//!
//! Images are kept two-dimensional until the classifier needs them; then
//! each image becomes a single feature vector in row-major pixel order.

use crate::core::{ClassLabel, Result, SVMError, SparseVector};
use crate::data::LabeledDataset;

/// Grayscale image with row-major pixel intensities
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    rows: usize,
    cols: usize,
    pixels: Vec<f64>,
}

impl Image {
    /// Create an image, checking that `pixels` holds `rows * cols` values
    pub fn new(rows: usize, cols: usize, pixels: Vec<f64>) -> Result<Self> {
        if pixels.len() != rows * cols {
            return Err(SVMError::DimensionMismatch {
                expected: rows * cols,
                actual: pixels.len(),
            });
        }
        Ok(Self { rows, cols, pixels })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Intensity at (row, col)
    ///
    /// # Panics
    /// Panics if the position is outside the image
    pub fn pixel(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols, "Pixel out of bounds");
        self.pixels[row * self.cols + col]
    }

    /// Row-major feature vector of length rows * cols
    pub fn flatten(&self) -> SparseVector {
        SparseVector::from_dense(&self.pixels)
    }
}

/// Labeled set of equally sized images
#[derive(Debug, Clone)]
pub struct ImageDataset {
    images: Vec<Image>,
    targets: Vec<ClassLabel>,
    class_names: Vec<String>,
}

impl ImageDataset {
    /// Create an image dataset; all images must share one shape
    pub fn new(images: Vec<Image>, targets: Vec<ClassLabel>) -> Result<Self> {
        if images.len() != targets.len() {
            return Err(SVMError::DimensionMismatch {
                expected: images.len(),
                actual: targets.len(),
            });
        }

        if let Some(first) = images.first() {
            let shape = (first.rows, first.cols);
            if images.iter().any(|img| (img.rows, img.cols) != shape) {
                return Err(SVMError::InvalidDataset(
                    "Images must all have the same shape".to_string(),
                ));
            }
        }

        Ok(Self {
            images,
            targets,
            class_names: Vec::new(),
        })
    }

    /// Build images by cutting a flat row-major buffer into `rows x cols` blocks
    pub fn from_flat(
        data: &[f64],
        (rows, cols): (usize, usize),
        targets: Vec<ClassLabel>,
    ) -> Result<Self> {
        let image_len = rows * cols;
        if image_len == 0 || data.len() != image_len * targets.len() {
            return Err(SVMError::DimensionMismatch {
                expected: image_len * targets.len(),
                actual: data.len(),
            });
        }

        let images = data
            .chunks(image_len)
            .map(|chunk| Image::new(rows, cols, chunk.to_vec()))
            .collect::<Result<Vec<_>>>()?;

        Self::new(images, targets)
    }

    /// Attach class names, indexed by class label
    pub fn with_class_names(mut self, names: Vec<String>) -> Self {
        self.class_names = names;
        self
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn targets(&self) -> &[ClassLabel] {
        &self.targets
    }

    /// Shared (rows, cols), or `None` for an empty dataset
    pub fn shape(&self) -> Option<(usize, usize)> {
        self.images.first().map(|img| (img.rows, img.cols))
    }

    /// Turn every image into a row-major feature vector
    ///
    /// Features are named `pixel_<row>_<col>`.
    pub fn flatten(&self) -> Result<LabeledDataset> {
        let (rows, cols) = self.shape().ok_or(SVMError::EmptyDataset)?;

        let feature_names = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| format!("pixel_{r}_{c}")))
            .collect();

        let dataset = LabeledDataset::new(
            self.images.iter().map(Image::flatten).collect(),
            self.targets.clone(),
            rows * cols,
        )?;

        Ok(dataset
            .with_feature_names(feature_names)
            .with_class_names(self.class_names.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Dataset;

    #[test]
    fn test_image_pixels() {
        let pixels = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let image = Image::new(2, 3, pixels.clone()).expect("valid image");
        assert_eq!(image.pixel(0, 2), 2.0);
        assert_eq!(image.pixel(1, 0), 3.0);
        assert_eq!(image.flatten().to_dense(6), pixels);
    }

    #[test]
    fn test_image_wrong_pixel_count() {
        assert!(matches!(
            Image::new(8, 8, vec![0.0; 63]),
            Err(SVMError::DimensionMismatch {
                expected: 64,
                actual: 63
            })
        ));
    }

    #[test]
    fn test_from_flat_and_flatten() {
        let data: Vec<f64> = (0..8).map(f64::from).collect();
        let images = ImageDataset::from_flat(&data, (2, 2), vec![3, 1]).expect("valid images");

        assert_eq!(images.len(), 2);
        assert_eq!(images.shape(), Some((2, 2)));
        assert_eq!(images.images()[1].pixel(0, 1), 5.0);

        let flat = images.flatten().expect("flatten");
        assert_eq!(flat.dim(), 4);
        assert_eq!(flat.targets(), vec![3, 1]);
        assert_eq!(flat.features(1).to_dense(4), vec![4.0, 5.0, 6.0, 7.0]);
        assert_eq!(
            flat.feature_names(),
            &["pixel_0_0", "pixel_0_1", "pixel_1_0", "pixel_1_1"]
        );
    }

    #[test]
    fn test_flatten_empty_dataset() {
        let images = ImageDataset::new(Vec::new(), Vec::new()).expect("empty");
        assert!(images.is_empty());
        assert_eq!(images.shape(), None);
        assert!(matches!(images.flatten(), Err(SVMError::EmptyDataset)));
    }

    #[test]
    fn test_mixed_shapes_rejected() {
        let images = vec![
            Image::new(2, 2, vec![0.0; 4]).expect("valid image"),
            Image::new(1, 4, vec![0.0; 4]).expect("valid image"),
        ];
        assert!(matches!(
            ImageDataset::new(images, vec![0, 1]),
            Err(SVMError::InvalidDataset(_))
        ));
    }

    #[test]
    #[should_panic(expected = "Pixel out of bounds")]
    fn test_pixel_out_of_bounds() {
        let image = Image::new(1, 1, vec![1.0]).expect("valid image");
        image.pixel(1, 0);
    }
}
