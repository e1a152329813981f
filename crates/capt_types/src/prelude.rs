//! Prelude module for `capt_types`.
//!
//! # Examples
//!
//! ```no_run
//! use capt_types::prelude::*;
//!
//! let stream = Stream::new(std::fs::File::open("job.capt").unwrap()).unwrap();
//! ```

#[doc(inline)]
pub use crate::container::{CaptVersion, PageFormat, PageInfo, Stream};

#[doc(inline)]
pub use crate::scoa::Decoder as ScoaDecoder;

#[doc(inline)]
pub use crate::error::CaptError;
