use serde::Serialize;
use tracing::debug;

use crate::common::CapturedImage;
use crate::error::SessionError;
use crate::session::review::ReviewNavigator;
use crate::session::slot::{Slot, SlotLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionMode {
    /// The camera preview is authoritative.
    Capturing,
    /// No camera I/O is pending; the carousel is shown.
    Reviewing,
}

/// What a stored capture did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureTransition {
    /// Another empty slot is waiting; the camera stays open on it.
    Advanced { filled: usize, next: usize },
    /// Every slot holds an image and the session moved to review.
    Completed { filled: usize },
}

/// Index of the first empty slot after `current`, scanning cyclically and
/// never returning `current` itself.
pub fn next_empty_slot(slots: &[Slot], current: usize) -> Option<usize> {
    let len = slots.len();
    (1..len)
        .map(|offset| (current + offset) % len)
        .find(|&index| !slots[index].is_filled())
}

/// Ordered photo slots plus the capture/review mode for one session.
#[derive(Debug, Clone)]
pub struct CaptureSession {
    layout: SlotLayout,
    slots: Vec<Slot>,
    active_capture_index: usize,
    mode: SessionMode,
    review: ReviewNavigator,
}

impl CaptureSession {
    pub fn new(layout: SlotLayout) -> Self {
        let slots: Vec<Slot> = layout.labels().iter().copied().map(Slot::new).collect();
        let review = ReviewNavigator::new(slots.len());
        Self {
            layout,
            slots,
            active_capture_index: 0,
            mode: SessionMode::Capturing,
            review,
        }
    }

    pub fn layout(&self) -> SlotLayout {
        self.layout
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn active_capture_index(&self) -> usize {
        self.active_capture_index
    }

    pub fn active_slot(&self) -> &Slot {
        &self.slots[self.active_capture_index]
    }

    pub fn displayed_index(&self) -> usize {
        self.review.displayed_index()
    }

    pub fn displayed_slot(&self) -> &Slot {
        &self.slots[self.review.displayed_index()]
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_filled()).count()
    }

    pub fn all_captured(&self) -> bool {
        self.slots.iter().all(Slot::is_filled)
    }

    /// Human readable capture progress, e.g. `2 / 3`.
    pub fn progress(&self) -> String {
        format!("{} / {}", self.filled_count(), self.len())
    }

    /// Images in slot order, or `None` while any slot is still empty.
    pub fn captured_images(&self) -> Option<Vec<CapturedImage>> {
        self.slots
            .iter()
            .map(|slot| slot.image().cloned())
            .collect()
    }

    pub fn start_capture(&mut self, target_index: usize) -> Result<(), SessionError> {
        self.check_index(target_index)?;
        self.active_capture_index = target_index;
        self.mode = SessionMode::Capturing;
        debug!(
            "Capturing into slot {} ({})",
            target_index,
            self.slots[target_index].label()
        );
        Ok(())
    }

    /// Reopens the camera on one slot from the review screen, leaving the others as they are.
    pub fn request_retake(&mut self, index: usize) -> Result<(), SessionError> {
        self.check_index(index)?;
        debug!("Retake requested for slot {} ({})", index, self.slots[index].label());
        self.start_capture(index)
    }

    pub fn on_image_captured(
        &mut self,
        image: CapturedImage,
    ) -> Result<CaptureTransition, SessionError> {
        if self.mode != SessionMode::Capturing {
            return Err(SessionError::NotCapturing);
        }

        let current = self.active_capture_index;
        if let Some(previous) = self.slots[current].fill(image) {
            debug!("Replaced image {} in slot {}", previous.id(), current);
        }
        let filled = self.filled_count();

        match next_empty_slot(&self.slots, current) {
            Some(next) => {
                self.active_capture_index = next;
                debug!(
                    "Slot {} captured, advancing to slot {} ({})",
                    current,
                    next,
                    self.slots[next].label()
                );
                Ok(CaptureTransition::Advanced { filled, next })
            }
            None => {
                self.review.show(current);
                self.mode = SessionMode::Reviewing;
                debug!("All {} slots captured, reviewing slot {}", filled, current);
                Ok(CaptureTransition::Completed { filled })
            }
        }
    }

    pub fn retake_all(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
        self.active_capture_index = 0;
        self.review.reset();
        self.mode = SessionMode::Capturing;
        debug!("All {} slots cleared", self.slots.len());
    }

    pub fn next(&mut self) -> Result<usize, SessionError> {
        self.check_reviewing()?;
        Ok(self.review.next())
    }

    pub fn previous(&mut self) -> Result<usize, SessionError> {
        self.check_reviewing()?;
        Ok(self.review.previous())
    }

    fn check_index(&self, index: usize) -> Result<(), SessionError> {
        if index < self.slots.len() {
            Ok(())
        } else {
            Err(SessionError::SlotOutOfRange {
                index,
                len: self.slots.len(),
            })
        }
    }

    fn check_reviewing(&self) -> Result<(), SessionError> {
        match self.mode {
            SessionMode::Reviewing => Ok(()),
            SessionMode::Capturing => Err(SessionError::NotReviewing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::slot::SlotLabel;
    use image::{DynamicImage, ImageBuffer, Rgb};

    fn photo(shade: u8) -> CapturedImage {
        CapturedImage::new(DynamicImage::ImageRgb8(
            ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(8, 8, Rgb([shade, shade, shade])),
        ))
    }

    fn filled_session() -> CaptureSession {
        let mut session = CaptureSession::new(SlotLayout::ThreeAngle);
        for shade in 0..3 {
            session.on_image_captured(photo(shade)).unwrap();
        }
        session
    }

    #[test]
    fn new_session_is_empty_and_capturing() {
        for layout in [SlotLayout::Single, SlotLayout::ThreeAngle] {
            let session = CaptureSession::new(layout);
            assert_eq!(session.len(), layout.slot_count());
            assert_eq!(session.mode(), SessionMode::Capturing);
            assert_eq!(session.active_capture_index(), 0);
            assert!(session.slots().iter().all(|slot| !slot.is_filled()));
            assert!(session.captured_images().is_none());
        }
    }

    #[test]
    fn next_empty_slot_wraps_and_skips_filled() {
        let mut slots: Vec<Slot> = SlotLayout::ThreeAngle
            .labels()
            .iter()
            .copied()
            .map(Slot::new)
            .collect();
        assert_eq!(next_empty_slot(&slots, 0), Some(1));
        assert_eq!(next_empty_slot(&slots, 2), Some(0));

        slots[0].fill(photo(1));
        slots[1].fill(photo(2));
        assert_eq!(next_empty_slot(&slots, 0), Some(2));
        assert_eq!(next_empty_slot(&slots, 2), None);
    }

    #[test]
    fn three_angle_capture_advances_then_reviews_last_slot() {
        let mut session = CaptureSession::new(SlotLayout::ThreeAngle);

        let transition = session.on_image_captured(photo(10)).unwrap();
        assert_eq!(transition, CaptureTransition::Advanced { filled: 1, next: 1 });
        assert_eq!(session.active_capture_index(), 1);

        session.on_image_captured(photo(20)).unwrap();
        assert_eq!(session.active_capture_index(), 2);
        assert_eq!(session.mode(), SessionMode::Capturing);

        let transition = session.on_image_captured(photo(30)).unwrap();
        assert_eq!(transition, CaptureTransition::Completed { filled: 3 });
        assert_eq!(session.mode(), SessionMode::Reviewing);
        assert_eq!(session.displayed_index(), 2);
        assert_eq!(session.displayed_slot().label(), SlotLabel::Right);
        assert!(session.all_captured());
    }

    #[test]
    fn single_slot_reviews_immediately() {
        let mut session = CaptureSession::new(SlotLayout::Single);
        let transition = session.on_image_captured(photo(1)).unwrap();
        assert_eq!(transition, CaptureTransition::Completed { filled: 1 });
        assert_eq!(session.mode(), SessionMode::Reviewing);
        assert_eq!(session.displayed_index(), 0);
    }

    #[test]
    fn each_capture_fills_exactly_the_active_slot() {
        let mut session = CaptureSession::new(SlotLayout::ThreeAngle);
        let mut previous_filled = 0;
        while session.mode() == SessionMode::Capturing {
            let active = session.active_capture_index();
            assert!(!session.slots()[active].is_filled());
            session.on_image_captured(photo(active as u8)).unwrap();
            assert!(session.slots()[active].is_filled());
            assert_eq!(session.filled_count(), previous_filled + 1);
            previous_filled += 1;
        }
        assert_eq!(previous_filled, 3);
    }

    #[test]
    fn retake_of_one_slot_returns_to_review_after_one_shot() {
        let mut session = filled_session();
        let original = session.slots()[1].image().unwrap().id();

        session.request_retake(1).unwrap();
        assert_eq!(session.mode(), SessionMode::Capturing);
        assert_eq!(session.active_capture_index(), 1);

        let replacement = photo(99);
        let replacement_id = replacement.id();
        let transition = session.on_image_captured(replacement).unwrap();
        assert_eq!(transition, CaptureTransition::Completed { filled: 3 });
        assert_eq!(session.mode(), SessionMode::Reviewing);
        assert_eq!(session.displayed_index(), 1);
        let stored = session.slots()[1].image().unwrap().id();
        assert_ne!(stored, original);
        assert_eq!(stored, replacement_id);
    }

    #[test]
    fn retake_all_clears_everything() {
        let mut session = filled_session();
        session.next().unwrap();
        session.retake_all();
        assert_eq!(session.filled_count(), 0);
        assert_eq!(session.active_capture_index(), 0);
        assert_eq!(session.displayed_index(), 0);
        assert_eq!(session.mode(), SessionMode::Capturing);
        assert_eq!(session.progress(), "0 / 3");
    }

    #[test]
    fn navigation_only_while_reviewing() {
        let mut session = CaptureSession::new(SlotLayout::ThreeAngle);
        assert_eq!(session.next(), Err(SessionError::NotReviewing));
        assert_eq!(session.previous(), Err(SessionError::NotReviewing));

        let mut session = filled_session();
        assert_eq!(session.next(), Ok(0));
        assert_eq!(session.previous(), Ok(2));
        assert_eq!(session.filled_count(), 3);
    }

    #[test]
    fn capture_rejected_while_reviewing() {
        let mut session = filled_session();
        assert_eq!(
            session.on_image_captured(photo(5)).unwrap_err(),
            SessionError::NotCapturing
        );
        assert_eq!(session.filled_count(), 3);
    }

    #[test]
    fn out_of_range_targets_are_rejected() {
        let mut session = CaptureSession::new(SlotLayout::ThreeAngle);
        assert_eq!(
            session.start_capture(3),
            Err(SessionError::SlotOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(
            session.request_retake(7),
            Err(SessionError::SlotOutOfRange { index: 7, len: 3 })
        );
        assert_eq!(session.active_capture_index(), 0);
    }

    #[test]
    fn start_capture_targets_specific_slot() {
        let mut session = CaptureSession::new(SlotLayout::ThreeAngle);
        session.start_capture(2).unwrap();
        session.on_image_captured(photo(3)).unwrap();
        assert!(session.slots()[2].is_filled());
        assert_eq!(session.active_capture_index(), 0);
    }
}
