//! Local file storage helpers shared by save/load code.

mod atomic_io;

pub use atomic_io::{remove_file_if_exists, write_bytes_atomic, write_text_atomic};
