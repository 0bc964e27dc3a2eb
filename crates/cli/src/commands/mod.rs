//! Command implementations.

mod characterize;
mod common;
mod demodulate;
mod generate;
mod stream;
mod validate;

pub use characterize::run_characterize;
pub use demodulate::run_demodulate;
pub use generate::run_generate;
pub use stream::run_stream;
pub use validate::run_validate;
