//! NTP header types and their network-endian codec.
//!
//! Every header type implements [`ReadFromBytes`] and [`WriteToBytes`] on top of byteorder, so
//! any `io::Read`/`io::Write` can carry them.
//!
//! Only the fixed 48-byte header is modelled. Extension fields and MACs that follow it in a
//! server reply are ignored by the decoder.

/// NTP service port.
pub const PORT: u16 = 123;

mod io;
mod traits;
mod types;

pub use self::traits::*;
pub use self::types::*;
