//! chartsight — raster screenshot analysis.
//!
//! Given an arbitrary screenshot (a trading-chart capture, a dialog, a
//! photo), the pipeline produces a compact structured description: a
//! thumbnail, a dominant-color palette, an edge/gradient projection
//! profile, a heuristic "is this a chart" verdict, candidate text/number
//! regions, and best-effort digit readings for a handful of those regions.
//!
//! Entry point: [`analyze`] (or [`analyze_with_fetcher`] to control how
//! remote URLs are retrieved).
//!
//! ```no_run
//! use chartsight::{analyze, AnalyzeInput, AnalyzeOptions};
//!
//! let input = AnalyzeInput::File("screenshot.png".into());
//! let result = analyze(&input, &AnalyzeOptions::default())?;
//! println!("{}", result.summary);
//! # Ok::<(), chartsight::AnalyzeError>(())
//! ```

pub mod chart;
pub mod decode;
pub mod digits;
pub mod error;
pub mod gradient;
pub mod options;
pub mod palette;
pub mod pipeline;
pub mod raster;
pub mod regions;

pub use decode::{AnalyzeInput, DecodedImage, Fetcher, HttpFetcher};
pub use error::AnalyzeError;
pub use options::{AnalyzeOptions, Tunables};
pub use pipeline::{AnalysisResult, ImageMetadata, analyze, analyze_with_fetcher};
