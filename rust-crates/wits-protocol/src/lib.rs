//! WITS Level 0 record model and frame codec
//!
//! Defines the canonical, oilfield-unit drilling record and encodes it into
//! the legacy ASCII WITS0 frame format:
//!
//! ```text
//! &&\r\n
//! 0108<bit depth>\r\n
//! 0110<hole depth>\r\n
//! ...                     (18 channel lines, fixed order)
//! !!\r\n
//! ```
//!
//! # Example
//!
//! ```
//! use wits_protocol::{encode_frame, CanonicalRecord};
//!
//! let record = CanonicalRecord {
//!     bit_depth: 10_000.0,
//!     rop: 55.5,
//!     ..Default::default()
//! };
//!
//! let frame = encode_frame(&record);
//! assert!(frame.starts_with(b"&&\r\n010810000.00\r\n"));
//! assert!(frame.ends_with(b"!!\r\n"));
//! ```

pub mod channels;
pub mod frame;
pub mod record;

// Re-exports
pub use channels::{Channel, FRAME_CHANNELS};
pub use frame::{encode_frame, FRAME_END, FRAME_START, LINE_END};
pub use record::CanonicalRecord;
