//! # Range Analysis
//!
//! Offline accuracy characterization.
//!
//! Responsibilities:
//! - Closed-form range noise model `σ(d) = a + b·d²`
//! - Repeated frame-averaged measurements per true distance
//! - Bias and precision per distance, rendered as a report
//!
//! ## Example
//!
//! ```
//! use range_analysis::{RangeCharacterizer, RangeNoiseModel};
//!
//! let mut characterizer = RangeCharacterizer::from_seed(RangeNoiseModel::default(), 42);
//! let report = characterizer.characterize_all(&[0.5, 1.0, 2.0], 50, 100);
//! println!("{report}");
//! ```

mod characterizer;
mod noise;
mod report;

pub use characterizer::{analyze, characterize_par, RangeCharacterizer};
pub use noise::RangeNoiseModel;
pub use report::CharacterizationReport;
