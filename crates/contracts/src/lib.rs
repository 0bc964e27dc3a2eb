//! # Contracts
//!
//! Frozen interface contracts shared by the simulator, the demodulator and
//! the range characterization tooling. Business crates depend only on this
//! crate, reverse dependencies are prohibited.
//!
//! ## Encoding convention
//! - Distances are in meters, phases in radians
//! - `phase = distance / unambiguous_range * 2π`, one period per unambiguous range
//! - Invalid distances are `f32::NAN`, never zero

mod blueprint;
mod error;
mod frame;
mod packet;
mod range;
mod scene;

pub use blueprint::*;
pub use error::*;
pub use frame::*;
pub use packet::*;
pub use range::*;
pub use scene::*;
