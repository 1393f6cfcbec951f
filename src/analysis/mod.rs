pub mod analyzer;
pub mod controller;
pub mod instrumented;
pub mod report;
pub mod service;

pub use analyzer::{MockSkinAnalyzer, SkinAnalyzer};
pub use controller::{AnalysisController, AnalysisStatus};
pub use instrumented::InstrumentedLayer;
pub use report::Report;
pub use service::{AnalysisServiceBuilder, AnalyzerService, BoxedAnalysisService};
