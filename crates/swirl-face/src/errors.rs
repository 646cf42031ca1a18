/// Errors raised while loading a Haar cascade.
#[derive(Debug, thiserror::Error)]
pub enum CascadeError {
    /// The cascade file could not be read.
    #[error("Failed to read the cascade file. {0}")]
    FileError(#[from] std::io::Error),

    /// The cascade document is not well formed XML.
    #[error("Failed to parse the cascade xml. {0}")]
    XmlError(#[from] roxmltree::Error),

    /// A mandatory element is missing.
    #[error("Missing element <{0}> in the cascade")]
    MissingElement(&'static str),

    /// An element holds a value that cannot be parsed.
    #[error("Invalid value {1:?} in <{0}>")]
    InvalidValue(&'static str, String),

    /// Only boosted cascades are supported.
    #[error("Unsupported stage type: {0}")]
    UnsupportedStageType(String),

    /// Only Haar features are supported.
    #[error("Unsupported feature type: {0}")]
    UnsupportedFeatureType(String),

    /// A weak classifier refers to a feature that does not exist.
    #[error("Feature index {0} out of range, the cascade has {1} features")]
    InvalidFeatureIndex(usize, usize),

    /// A weak classifier refers to a leaf that does not exist.
    #[error("Leaf index {0} out of range, the classifier has {1} leaves")]
    InvalidLeafIndex(usize, usize),

    /// A feature rectangle does not fit the detection window.
    #[error("Feature {0} has a rectangle outside the {1}x{2} window")]
    InvalidRect(usize, usize, usize),
}

/// Errors raised by face location and comparison.
#[derive(Debug, thiserror::Error)]
pub enum FaceError {
    /// Error related to image.
    #[error(transparent)]
    ImageError(#[from] swirl_image::ImageError),

    /// Error related to the cascade.
    #[error(transparent)]
    CascadeError(#[from] CascadeError),

    /// The pyramid scale factor must be finite and greater than one.
    #[error("Invalid scale factor {0}, expected a finite value greater than 1")]
    InvalidScaleFactor(f64),

    /// The face region target size must not be empty.
    #[error("Invalid face region size {0}x{1}")]
    InvalidRegionSize(usize, usize),

    /// The face rectangle does not intersect the image.
    #[error("Face rectangle at ({0}, {1}) lies outside the {2}x{3} image")]
    RectOutOfBounds(usize, usize, usize, usize),
}
