use serde::{Deserialize, Serialize};

use crate::common::CapturedImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotLabel {
    Default,
    Front,
    Left,
    Right,
}

impl SlotLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotLabel::Default => "Default",
            SlotLabel::Front => "Front",
            SlotLabel::Left => "Left",
            SlotLabel::Right => "Right",
        }
    }

    /// Prompt shown over the camera preview while this slot is being captured.
    pub fn guidance(&self) -> &'static str {
        match self {
            SlotLabel::Default | SlotLabel::Front => "Look straight at the camera",
            SlotLabel::Left => "Turn your head to the right to show your left side",
            SlotLabel::Right => "Turn your head to the left to show your right side",
        }
    }
}

impl std::fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which set of photos a session asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotLayout {
    Single,
    ThreeAngle,
}

impl SlotLayout {
    pub fn labels(&self) -> &'static [SlotLabel] {
        match self {
            SlotLayout::Single => &[SlotLabel::Default],
            SlotLayout::ThreeAngle => &[SlotLabel::Front, SlotLabel::Left, SlotLabel::Right],
        }
    }

    pub fn slot_count(&self) -> usize {
        self.labels().len()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotLayout::Single => "single",
            SlotLayout::ThreeAngle => "three_angle",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Slot {
    label: SlotLabel,
    image: Option<CapturedImage>,
}

impl Slot {
    pub fn new(label: SlotLabel) -> Self {
        Self { label, image: None }
    }

    pub fn label(&self) -> SlotLabel {
        self.label
    }

    pub fn image(&self) -> Option<&CapturedImage> {
        self.image.as_ref()
    }

    pub fn is_filled(&self) -> bool {
        self.image.is_some()
    }

    pub(crate) fn fill(&mut self, mut image: CapturedImage) -> Option<CapturedImage> {
        image.assign_label(self.label);
        self.image.replace(image)
    }

    pub(crate) fn clear(&mut self) {
        self.image = None;
    }
}
