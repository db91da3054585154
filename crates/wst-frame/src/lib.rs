//! Length-prefixed message framing for the compositor control channel.
//!
//! Every message is a 4-byte little-endian payload length followed by the
//! payload. Reads wait for readability with a bounded timeout per wait and
//! never hand back a short frame.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_frame, encode_frame, encode_header, FrameConfig, DEFAULT_MAX_PAYLOAD,
    DEFAULT_READ_TIMEOUT, HEADER_SIZE,
};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
