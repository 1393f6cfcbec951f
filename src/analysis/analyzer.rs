use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::analysis::report::Report;
use crate::common::CapturedImage;
use crate::error::AnalysisError;

pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_millis(1400);

/// Engine that turns an ordered set of face photos into a report.
#[async_trait]
pub trait SkinAnalyzer: Send + Sync {
    async fn analyze(&self, images: &[CapturedImage]) -> Result<Report, AnalysisError>;
    fn name(&self) -> &'static str;
}

/// Stand-in engine: waits a fixed delay and answers with a canned report.
pub struct MockSkinAnalyzer {
    delay: Duration,
}

impl MockSkinAnalyzer {
    pub fn new() -> Self {
        Self {
            delay: DEFAULT_MOCK_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn canned_report() -> Report {
        Report::new(
            "Combination",
            vec![
                "Mild redness on cheeks".to_string(),
                "Enlarged pores in T-zone".to_string(),
                "Slight dehydration".to_string(),
            ],
            0.86,
            vec![
                "Use a gentle, fragrance-free cleanser".to_string(),
                "Apply a lightweight, non-comedogenic moisturizer".to_string(),
                "Wear broad-spectrum SPF 30+ daily".to_string(),
            ],
        )
    }
}

impl Default for MockSkinAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SkinAnalyzer for MockSkinAnalyzer {
    async fn analyze(&self, images: &[CapturedImage]) -> Result<Report, AnalysisError> {
        if images.is_empty() {
            return Err(AnalysisError::Failure("no images supplied".to_string()));
        }
        debug!("Mock analysis of {} images, waiting {:?}", images.len(), self.delay);
        tokio::time::sleep(self.delay).await;
        Ok(Self::canned_report())
    }

    fn name(&self) -> &'static str {
        "MockSkinAnalyzer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, Rgb};

    #[tokio::test]
    async fn mock_returns_canned_report() {
        let analyzer = MockSkinAnalyzer::new().with_delay(Duration::from_millis(5));
        let image = CapturedImage::new(DynamicImage::ImageRgb8(
            ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(4, 4, Rgb([200, 160, 140])),
        ));
        let report = analyzer.analyze(&[image]).await.unwrap();
        assert_eq!(report.skin_type, "Combination");
        assert_eq!(report.confidence, 0.86);
        assert_eq!(report.concerns.len(), 3);
        assert_eq!(report.recommendations.len(), 3);
    }

    #[tokio::test]
    async fn mock_rejects_empty_input() {
        let analyzer = MockSkinAnalyzer::new().with_delay(Duration::ZERO);
        let result = analyzer.analyze(&[]).await;
        assert!(matches!(result, Err(AnalysisError::Failure(_))));
    }
}
