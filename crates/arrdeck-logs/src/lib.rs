//! arrdeck-logs: the pure log tail engine for the arrdeck dashboard.
//!
//! Everything here is synchronous and I/O-free: decoding raw server lines
//! into records, holding the ordered display window, pagination math, level
//! scoping, and reversible search highlighting. The async half (fetching,
//! polling, fetch-token bookkeeping) lives in `arrdeck-client` and feeds
//! batches through these types.

pub mod codec;
pub mod filter;
pub mod pagination;
pub mod record;
pub mod search;
pub mod timestamp;
pub mod window;

pub use codec::{decode, DecodeError};
pub use filter::{LevelSelection, ViewFilter};
pub use pagination::{PageOutOfRange, PaginationState, DEFAULT_PAGE_SIZE};
pub use record::{LogLevel, LogRecord, RecordKey, DEFAULT_SOURCE};
pub use search::{DisplayLine, SearchHighlighter, SearchMatches, DEFAULT_HIGHLIGHT_CAP};
pub use timestamp::{parse_timestamp, TIMESTAMP_FORMAT};
pub use window::LogWindowStore;
