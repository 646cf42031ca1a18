use std::{path::Path, str::FromStr};

use roxmltree::{Document, Node};
use swirl_image::ImageSize;

use crate::{errors::CascadeError, integral::IntegralImage};

/// A weighted rectangle of a Haar feature, relative to the detection window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedRect {
    /// Left coordinate (top corner for tilted rectangles).
    pub x: usize,
    /// Top coordinate.
    pub y: usize,
    /// Width (down-right extent for tilted rectangles).
    pub width: usize,
    /// Height (down-left extent for tilted rectangles).
    pub height: usize,
    /// Weight applied to the rectangle sum.
    pub weight: f32,
}

/// A Haar-like feature: a weighted sum of two or three rectangle sums.
#[derive(Debug, Clone, PartialEq)]
pub struct HaarFeature {
    /// The rectangles of the feature.
    pub rects: Vec<WeightedRect>,
    /// Whether the rectangles are rotated by 45 degrees.
    pub tilted: bool,
}

/// A split node of a weak classifier tree.
///
/// Child indices greater than zero point to another node, indices lower or
/// equal to zero point to the leaf `-index`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeNode {
    /// Child taken when the feature value is below the threshold.
    pub left: i32,
    /// Child taken otherwise.
    pub right: i32,
    /// Index of the evaluated feature.
    pub feature: usize,
    /// Split threshold on the normalized feature value.
    pub threshold: f32,
}

/// A boosted weak classifier, a stump or a small decision tree.
#[derive(Debug, Clone, PartialEq)]
pub struct WeakClassifier {
    /// The split nodes, the root first.
    pub nodes: Vec<TreeNode>,
    /// The leaf values.
    pub leaves: Vec<f32>,
}

impl WeakClassifier {
    fn predict(&self, feature_value: impl Fn(usize) -> f64) -> f32 {
        let mut idx = 0i32;
        loop {
            let node = &self.nodes[idx as usize];
            idx = if feature_value(node.feature) < node.threshold as f64 {
                node.left
            } else {
                node.right
            };
            if idx <= 0 {
                return self.leaves[(-idx) as usize];
            }
        }
    }
}

/// A stage of the cascade, rejects the window when the vote is below the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    /// Minimum accumulated leaf value to pass the stage.
    pub threshold: f32,
    /// The weak classifiers voting in this stage.
    pub classifiers: Vec<WeakClassifier>,
}

/// Outcome of running the cascade on a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// All the stages passed.
    Object,
    /// The window was rejected by the given stage.
    Rejected {
        /// Index of the rejecting stage.
        stage: usize,
    },
}

/// A boosted cascade of Haar-feature classifiers.
///
/// Loaded from the XML files written by OpenCV's `opencv_traincascade`, such as
/// `haarcascade_frontalface_default.xml`.
#[derive(Debug, Clone, PartialEq)]
pub struct HaarCascade {
    window: ImageSize,
    stages: Vec<Stage>,
    features: Vec<HaarFeature>,
}

impl HaarCascade {
    /// Create a cascade, checking that every index and rectangle is consistent.
    ///
    /// # Arguments
    ///
    /// * `window` - The detection window size, at least 3x3.
    /// * `stages` - The stages, evaluated in order.
    /// * `features` - The features referenced by the tree nodes.
    pub fn new(
        window: ImageSize,
        stages: Vec<Stage>,
        features: Vec<HaarFeature>,
    ) -> Result<Self, CascadeError> {
        if window.width < 3 || window.height < 3 {
            return Err(CascadeError::InvalidValue(
                "width",
                format!("{}x{}", window.width, window.height),
            ));
        }

        for (fi, feature) in features.iter().enumerate() {
            let fits = feature.rects.iter().all(|r| {
                if feature.tilted {
                    r.x >= r.height
                        && r.x + r.width <= window.width
                        && r.y + r.width + r.height <= window.height
                } else {
                    r.x + r.width <= window.width && r.y + r.height <= window.height
                }
            });
            if !fits || feature.rects.is_empty() {
                return Err(CascadeError::InvalidRect(fi, window.width, window.height));
            }
        }

        for classifier in stages.iter().flat_map(|s| s.classifiers.iter()) {
            if classifier.nodes.is_empty() {
                return Err(CascadeError::MissingElement("internalNodes"));
            }
            for (ni, node) in classifier.nodes.iter().enumerate() {
                if node.feature >= features.len() {
                    return Err(CascadeError::InvalidFeatureIndex(
                        node.feature,
                        features.len(),
                    ));
                }
                for child in [node.left, node.right] {
                    if child > 0 {
                        // children always come after their parent
                        if child as usize <= ni || child as usize >= classifier.nodes.len() {
                            return Err(CascadeError::InvalidValue(
                                "internalNodes",
                                child.to_string(),
                            ));
                        }
                    } else if (-child) as usize >= classifier.leaves.len() {
                        return Err(CascadeError::InvalidLeafIndex(
                            (-child) as usize,
                            classifier.leaves.len(),
                        ));
                    }
                }
            }
        }

        Ok(Self {
            window,
            stages,
            features,
        })
    }

    /// Load a cascade from an OpenCV XML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CascadeError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_xml(&text)
    }

    /// Parse a cascade from the content of an OpenCV XML file.
    ///
    /// Only the `opencv_storage/cascade` layout with `BOOST` stages and `HAAR`
    /// features is supported.
    pub fn from_xml(text: &str) -> Result<Self, CascadeError> {
        let doc = Document::parse(text)?;
        let cascade = child(doc.root_element(), "cascade")?;

        let stage_type = value::<String>(cascade, "stageType")?;
        if stage_type != "BOOST" {
            return Err(CascadeError::UnsupportedStageType(stage_type));
        }

        let feature_type = value::<String>(cascade, "featureType")?;
        if feature_type != "HAAR" {
            return Err(CascadeError::UnsupportedFeatureType(feature_type));
        }

        let window = ImageSize {
            width: value(cascade, "width")?,
            height: value(cascade, "height")?,
        };

        let stages = items(child(cascade, "stages")?)
            .map(parse_stage)
            .collect::<Result<Vec<_>, _>>()?;

        let features = items(child(cascade, "features")?)
            .map(parse_feature)
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "loaded cascade: window {}, {} stages, {} features",
            window,
            stages.len(),
            features.len()
        );

        Self::new(window, stages, features)
    }

    /// The detection window size.
    pub fn window_size(&self) -> ImageSize {
        self.window
    }

    /// The stages of the cascade.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The features of the cascade.
    pub fn features(&self) -> &[HaarFeature] {
        &self.features
    }

    /// Whether any feature needs the rotated integral image.
    pub fn has_tilted_features(&self) -> bool {
        self.features.iter().any(|f| f.tilted)
    }

    /// Normalization factor and standard deviation of the window at `(x, y)`.
    ///
    /// Both are measured over the window shrunk by one pixel on every side.
    /// The factor is `area * stddev`, or one for a flat window.
    pub fn window_statistics(&self, ii: &IntegralImage, x: usize, y: usize) -> (f64, f64) {
        let (w, h) = (self.window.width - 2, self.window.height - 2);
        let area = (w * h) as f64;
        let sum = ii.rect_sum(x + 1, y + 1, w, h) as f64;
        let sqsum = ii.rect_sqsum(x + 1, y + 1, w, h) as f64;

        let variance = area * sqsum - sum * sum;
        if variance > 0.0 {
            let norm = variance.sqrt();
            (norm, norm / area)
        } else {
            (1.0, 0.0)
        }
    }

    fn feature_value(&self, ii: &IntegralImage, feature: usize, x: usize, y: usize) -> f64 {
        let feature = &self.features[feature];
        feature
            .rects
            .iter()
            .map(|r| {
                let sum = if feature.tilted {
                    ii.tilted_sum(x + r.x, y + r.y, r.width, r.height)
                } else {
                    ii.rect_sum(x + r.x, y + r.y, r.width, r.height)
                };
                r.weight as f64 * sum as f64
            })
            .sum()
    }

    /// Run the cascade on the window whose top-left corner is `(x, y)`.
    ///
    /// `norm` is the normalization factor from [`HaarCascade::window_statistics`].
    /// The window must lie inside the integral image.
    pub fn classify(&self, ii: &IntegralImage, x: usize, y: usize, norm: f64) -> Classification {
        let inv_norm = 1.0 / norm;

        for (stage_idx, stage) in self.stages.iter().enumerate() {
            let vote: f64 = stage
                .classifiers
                .iter()
                .map(|c| c.predict(|f| self.feature_value(ii, f, x, y) * inv_norm) as f64)
                .sum();

            if vote < stage.threshold as f64 {
                return Classification::Rejected { stage: stage_idx };
            }
        }

        Classification::Object
    }
}

fn child<'a, 'i>(node: Node<'a, 'i>, name: &'static str) -> Result<Node<'a, 'i>, CascadeError> {
    node.children()
        .find(|n| n.has_tag_name(name))
        .ok_or(CascadeError::MissingElement(name))
}

fn items<'a, 'i>(node: Node<'a, 'i>) -> impl Iterator<Item = Node<'a, 'i>> {
    node.children().filter(|n| n.is_element())
}

fn value<T: FromStr>(node: Node, name: &'static str) -> Result<T, CascadeError> {
    let text = child(node, name)?.text().unwrap_or_default().trim();
    text.parse()
        .map_err(|_| CascadeError::InvalidValue(name, text.to_string()))
}

fn list<T: FromStr>(node: Node, name: &'static str) -> Result<Vec<T>, CascadeError> {
    child(node, name)?
        .text()
        .unwrap_or_default()
        .split_whitespace()
        .map(|tok| {
            tok.parse()
                .map_err(|_| CascadeError::InvalidValue(name, tok.to_string()))
        })
        .collect()
}

fn parse_stage(node: Node) -> Result<Stage, CascadeError> {
    let threshold = value(node, "stageThreshold")?;
    let classifiers = items(child(node, "weakClassifiers")?)
        .map(parse_weak_classifier)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Stage {
        threshold,
        classifiers,
    })
}

fn parse_weak_classifier(node: Node) -> Result<WeakClassifier, CascadeError> {
    let raw = list::<f32>(node, "internalNodes")?;
    if raw.len() % 4 != 0 {
        return Err(CascadeError::InvalidValue(
            "internalNodes",
            format!("{} values", raw.len()),
        ));
    }

    let as_index = |v: f32| -> Result<i32, CascadeError> {
        if v.fract() == 0.0 && v.abs() < i32::MAX as f32 {
            Ok(v as i32)
        } else {
            Err(CascadeError::InvalidValue("internalNodes", v.to_string()))
        }
    };

    let nodes = raw
        .chunks_exact(4)
        .map(|n| {
            let feature = as_index(n[2])?;
            if feature < 0 {
                return Err(CascadeError::InvalidValue(
                    "internalNodes",
                    feature.to_string(),
                ));
            }
            Ok(TreeNode {
                left: as_index(n[0])?,
                right: as_index(n[1])?,
                feature: feature as usize,
                threshold: n[3],
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WeakClassifier {
        nodes,
        leaves: list(node, "leafValues")?,
    })
}

fn parse_feature(node: Node) -> Result<HaarFeature, CascadeError> {
    let tilted = match node.children().find(|n| n.has_tag_name("tilted")) {
        Some(_) => value::<u8>(node, "tilted")? != 0,
        None => false,
    };

    let rects = items(child(node, "rects")?)
        .map(|r| {
            let text = r.text().unwrap_or_default();
            let fields: Vec<&str> = text.split_whitespace().collect();
            let [x, y, w, h, weight] = fields[..] else {
                return Err(CascadeError::InvalidValue("rects", text.trim().to_string()));
            };
            let coord = |s: &str| {
                s.parse::<usize>()
                    .map_err(|_| CascadeError::InvalidValue("rects", s.to_string()))
            };
            Ok(WeightedRect {
                x: coord(x)?,
                y: coord(y)?,
                width: coord(w)?,
                height: coord(h)?,
                weight: weight
                    .parse()
                    .map_err(|_| CascadeError::InvalidValue("rects", weight.to_string()))?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HaarFeature { rects, tilted })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use swirl_image::{Image, ImageError};

    /// A 6x6 single stage cascade firing on dark-to-bright vertical edges.
    pub(crate) const EDGE_CASCADE: &str = include_str!("../tests/data/edge_cascade.xml");

    fn edge_image(dark_left: bool) -> Result<Image<u8, 1>, ImageError> {
        let (l, r) = if dark_left { (0, 200) } else { (200, 0) };
        let data = (0..36).map(|i| if i % 6 < 3 { l } else { r }).collect();
        Image::new([6, 6].into(), data)
    }

    #[test]
    fn parse_edge_cascade() -> Result<(), CascadeError> {
        let cascade = HaarCascade::from_xml(EDGE_CASCADE)?;

        assert_eq!(cascade.window_size(), [6, 6].into());
        assert_eq!(cascade.stages().len(), 1);
        assert_eq!(cascade.stages()[0].threshold, 0.5);
        assert_eq!(cascade.features().len(), 1);
        assert!(!cascade.has_tilted_features());

        let classifier = &cascade.stages()[0].classifiers[0];
        assert_eq!(
            classifier.nodes,
            vec![TreeNode {
                left: 0,
                right: -1,
                feature: 0,
                threshold: 0.1,
            }]
        );
        assert_eq!(classifier.leaves, vec![-1.0, 1.0]);
        assert_eq!(
            cascade.features()[0].rects[1],
            WeightedRect {
                x: 3,
                y: 0,
                width: 3,
                height: 6,
                weight: 2.0,
            }
        );

        Ok(())
    }

    #[test]
    fn load_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("edge.xml");
        std::fs::write(&path, EDGE_CASCADE)?;

        assert_eq!(HaarCascade::from_file(&path)?, HaarCascade::from_xml(EDGE_CASCADE)?);
        assert!(matches!(
            HaarCascade::from_file(dir.path().join("missing.xml")),
            Err(CascadeError::FileError(_))
        ));

        Ok(())
    }

    #[test]
    fn classify_edge_windows() -> Result<(), Box<dyn std::error::Error>> {
        let cascade = HaarCascade::from_xml(EDGE_CASCADE)?;

        let ii = IntegralImage::new(&edge_image(true)?, false);
        let (norm, stddev) = cascade.window_statistics(&ii, 0, 0);
        // inner 4x4 window is half 0 and half 200
        assert!((stddev - 100.0).abs() < 1e-9);
        assert!((norm - 1600.0).abs() < 1e-9);
        assert_eq!(cascade.classify(&ii, 0, 0, norm), Classification::Object);

        let ii = IntegralImage::new(&edge_image(false)?, false);
        let (norm, _) = cascade.window_statistics(&ii, 0, 0);
        assert_eq!(
            cascade.classify(&ii, 0, 0, norm),
            Classification::Rejected { stage: 0 }
        );

        Ok(())
    }

    #[test]
    fn flat_window_statistics() -> Result<(), Box<dyn std::error::Error>> {
        let cascade = HaarCascade::from_xml(EDGE_CASCADE)?;
        let image = Image::<u8, 1>::from_size_val([6, 6].into(), 90)?;
        let ii = IntegralImage::new(&image, false);
        assert_eq!(cascade.window_statistics(&ii, 0, 0), (1.0, 0.0));
        Ok(())
    }

    #[test]
    fn tree_classifier_walks_nodes() {
        // root splits on feature 0, its right child splits on feature 1
        let classifier = WeakClassifier {
            nodes: vec![
                TreeNode {
                    left: 0,
                    right: 1,
                    feature: 0,
                    threshold: 0.0,
                },
                TreeNode {
                    left: -1,
                    right: -2,
                    feature: 1,
                    threshold: 0.5,
                },
            ],
            leaves: vec![10.0, 20.0, 30.0],
        };

        assert_eq!(classifier.predict(|_| -1.0), 10.0);
        assert_eq!(classifier.predict(|f| if f == 0 { 1.0 } else { 0.0 }), 20.0);
        assert_eq!(classifier.predict(|_| 1.0), 30.0);
    }

    #[test]
    fn reject_unsupported_cascades() {
        let lbp = EDGE_CASCADE.replace(">HAAR<", ">LBP<");
        assert!(matches!(
            HaarCascade::from_xml(&lbp),
            Err(CascadeError::UnsupportedFeatureType(t)) if t == "LBP"
        ));

        let gentle = EDGE_CASCADE.replace(">BOOST<", ">GENTLE<");
        assert!(matches!(
            HaarCascade::from_xml(&gentle),
            Err(CascadeError::UnsupportedStageType(_))
        ));

        let old = "<opencv_storage><haarcascade type_id=\"opencv-haar-classifier\"/></opencv_storage>";
        assert!(matches!(
            HaarCascade::from_xml(old),
            Err(CascadeError::MissingElement("cascade"))
        ));

        assert!(matches!(
            HaarCascade::from_xml("<opencv_storage>"),
            Err(CascadeError::XmlError(_))
        ));
    }

    #[test]
    fn reject_inconsistent_cascades() {
        let bad_feature = EDGE_CASCADE.replace("0 -1 0 1.0000000149011612e-01", "0 -1 3 0.1");
        assert!(matches!(
            HaarCascade::from_xml(&bad_feature),
            Err(CascadeError::InvalidFeatureIndex(3, 1))
        ));

        let bad_leaf = EDGE_CASCADE.replace("0 -1 0 1.0000000149011612e-01", "0 -4 0 0.1");
        assert!(matches!(
            HaarCascade::from_xml(&bad_leaf),
            Err(CascadeError::InvalidLeafIndex(4, 2))
        ));

        let bad_rect = EDGE_CASCADE.replace("3 0 3 6 2.", "4 0 3 6 2.");
        assert!(matches!(
            HaarCascade::from_xml(&bad_rect),
            Err(CascadeError::InvalidRect(0, 6, 6))
        ));

        let bad_number = EDGE_CASCADE.replace("<width>6</width>", "<width>six</width>");
        assert!(matches!(
            HaarCascade::from_xml(&bad_number),
            Err(CascadeError::InvalidValue("width", _))
        ));
    }
}
