//! # Demodulator
//!
//! Inverts the four-phase quadrature encoding into amplitude and distance
//! maps. Pixels whose amplitude falls below the gate carry a NaN distance.
//!
//! ```
//! use contracts::RawPacket;
//! use demodulator::PhaseDemodulator;
//!
//! let demod = PhaseDemodulator::new(100.0, 15.0);
//! let frame = demod.process(&RawPacket::new(0, 4, 4)).unwrap();
//! assert_eq!(frame.invalid_pixel_count(), 16);
//! ```

mod processor;

pub use processor::{demodulate_pixel, process, PhaseDemodulator};
