//! WITS0 frame encoding

use std::fmt::Write;

use crate::channels::FRAME_CHANNELS;
use crate::record::CanonicalRecord;

/// Frame start marker line.
pub const FRAME_START: &str = "&&";

/// Frame end marker line.
pub const FRAME_END: &str = "!!";

/// Line terminator for every frame line.
pub const LINE_END: &str = "\r\n";

/// Encode one record as a complete WITS0 frame.
///
/// Each channel line is `<code><value>` with the value rendered to exactly
/// two decimals. Output is deterministic for a given record.
pub fn encode_frame(record: &CanonicalRecord) -> Vec<u8> {
    // "&&\r\n" + 18 * ("0108" + value + "\r\n") + "!!\r\n"
    let mut frame = String::with_capacity(8 + FRAME_CHANNELS.len() * 20);

    frame.push_str(FRAME_START);
    frame.push_str(LINE_END);

    for channel in FRAME_CHANNELS {
        // Writing into a String cannot fail
        let _ = write!(frame, "{}{:.2}{}", channel.code(), channel.value(record), LINE_END);
    }

    frame.push_str(FRAME_END);
    frame.push_str(LINE_END);

    frame.into_bytes()
}
