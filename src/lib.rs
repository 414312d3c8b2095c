//! WHATWG-style readable and writable streams with a backpressure-aware pipe.
//!
//! ```no_run
//! use streams_pipe::{ReadableStream, StreamPipeOptions, WritableStream};
//! # use streams_pipe::{StreamResult, WritableSink, WritableStreamDefaultController};
//! # struct Stdout;
//! # impl WritableSink<String> for Stdout {
//! #     async fn write(&mut self, chunk: String, _: &mut WritableStreamDefaultController) -> StreamResult<()> {
//! #         println!("{chunk}");
//! #         Ok(())
//! #     }
//! # }
//! # async fn run() -> StreamResult<()> {
//! let source = ReadableStream::from_vec(vec!["a".to_string(), "b".to_string()]).spawn(tokio::spawn);
//! let destination = WritableStream::builder(Stdout).spawn(tokio::spawn);
//!
//! source
//!     .pipe_to(&destination, Some(StreamPipeOptions::new().with_prevent_close(true)))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod platform;
pub mod streams;

pub use streams::*;
