//! Run diagnostics: stage timings and the serialisable per-image report.

pub mod report;
pub mod timing;

pub use report::WireframeReport;
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
