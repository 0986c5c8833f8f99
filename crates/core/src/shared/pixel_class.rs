use serde::{Deserialize, Serialize};

/// Correctness class an upstream classifier assigned to a pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelClass {
    TruePositive,
    FalsePositive,
    FalseNegative,
    TrueNegative,
    Background,
}

impl PixelClass {
    pub const ALL: &[PixelClass] = &[
        PixelClass::TruePositive,
        PixelClass::FalsePositive,
        PixelClass::FalseNegative,
        PixelClass::TrueNegative,
        PixelClass::Background,
    ];
}

impl std::fmt::Display for PixelClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PixelClass::TruePositive => write!(f, "true positive"),
            PixelClass::FalsePositive => write!(f, "false positive"),
            PixelClass::FalseNegative => write!(f, "false negative"),
            PixelClass::TrueNegative => write!(f, "true negative"),
            PixelClass::Background => write!(f, "background"),
        }
    }
}

/// Which pixels an accounting pass counts.
///
/// Resolved once from configuration; the accountant never looks colours up
/// by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelSelector {
    Class(PixelClass),
    /// Every pixel that is not the background colour.
    AnyForeground,
}

impl PixelSelector {
    /// Tracker bit reserved for this selector.
    ///
    /// Marks are kept per selector so a pixel counted as foreground can
    /// still be counted once as a matching pixel.
    pub fn track_bit(&self) -> u8 {
        match self {
            PixelSelector::Class(PixelClass::TruePositive) => 1 << 0,
            PixelSelector::Class(PixelClass::FalsePositive) => 1 << 1,
            PixelSelector::Class(PixelClass::FalseNegative) => 1 << 2,
            PixelSelector::Class(PixelClass::TrueNegative) => 1 << 3,
            PixelSelector::Class(PixelClass::Background) => 1 << 4,
            PixelSelector::AnyForeground => 1 << 5,
        }
    }
}

/// RGB colour code for each pixel class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub true_positive: [u8; 3],
    pub false_positive: [u8; 3],
    pub false_negative: [u8; 3],
    pub true_negative: [u8; 3],
    pub background: [u8; 3],
}

impl Palette {
    pub fn color(&self, class: PixelClass) -> [u8; 3] {
        match class {
            PixelClass::TruePositive => self.true_positive,
            PixelClass::FalsePositive => self.false_positive,
            PixelClass::FalseNegative => self.false_negative,
            PixelClass::TrueNegative => self.true_negative,
            PixelClass::Background => self.background,
        }
    }

    pub fn matches(&self, selector: PixelSelector, pixel: [u8; 3]) -> bool {
        match selector {
            PixelSelector::Class(class) => pixel == self.color(class),
            PixelSelector::AnyForeground => pixel != self.background,
        }
    }

    /// Returns the class whose colour equals `pixel`, if any.
    pub fn classify(&self, pixel: [u8; 3]) -> Option<PixelClass> {
        PixelClass::ALL
            .iter()
            .copied()
            .find(|class| self.color(*class) == pixel)
    }

    /// True when two classes share a colour, which makes counts ambiguous.
    pub fn has_duplicate_colors(&self) -> bool {
        let colors: Vec<[u8; 3]> = PixelClass::ALL.iter().map(|c| self.color(*c)).collect();
        colors
            .iter()
            .enumerate()
            .any(|(i, c)| colors[i + 1..].contains(c))
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            true_positive: [255, 0, 0],
            false_positive: [0, 0, 255],
            false_negative: [0, 255, 0],
            true_negative: [255, 165, 0],
            background: [255, 255, 255],
        }
    }
}
