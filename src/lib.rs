//! POSIX-convention command-line option parsing with typed, validated
//! options.
//!
//! Options are declared up front as [`Opt<T>`] descriptors: a set of
//! aliases, an [`Arity`], a description, and optionally a default value, a
//! validation predicate, and a bound storage slot. A [`Parser`] borrows
//! the descriptors and drives a single left-to-right scan of the argument
//! vector, following the POSIX argument-syntax conventions:
//!
//! - `-x` — short option, `-x VALUE` when the option takes a value
//! - `-xyz` — clustered value-less short options (`-x -y -z`)
//! - `-nVALUE` — short option with its value attached
//! - `--name`, `--name VALUE`, `--name=VALUE` — long options
//! - `--` — end of options; later tokens are left untouched
//!
//! ```
//! use optparse::{Arity, Opt, Parser};
//!
//! # fn main() -> Result<(), optparse::Error> {
//! let level = Opt::<i32>::new(["x", "level"], Arity::Required, "compression level")?
//!     .check(|v| (0..=12).contains(v));
//! let verbose = Opt::<bool>::new(["v", "verbose"], Arity::None, "chatty output")?;
//!
//! let mut parser = Parser::new();
//! parser.add(&level);
//! parser.add(&verbose);
//! parser.parse(&["prog", "-v", "--level=9"])?;
//!
//! assert_eq!(level.value(), Some(9));
//! assert!(verbose.is_set());
//! # Ok(())
//! # }
//! ```
//!
//! Values are read back after the scan through [`Opt::value`],
//! [`Opt::is_set`], or a slot registered with [`Opt::bind`]. The scan is
//! fail-fast: the first unknown option, missing value, conversion failure,
//! or validator rejection aborts it with an [`Error`], and options matched
//! earlier keep their newly parsed values.
//!
//! Out of scope by design: positional-argument collection, repeated-option
//! accumulation, sub-commands, help-text rendering, and environment
//! fallback. Descriptors are single-threaded (`RefCell`/`Rc` inside), so
//! concurrent parsing over shared descriptors is rejected by the type
//! system rather than left to data races.

pub mod error;
pub mod opt;
pub mod parser;
pub mod value;

pub use error::Error;
pub use opt::{AnyOpt, Arity, Opt};
pub use parser::Parser;
pub use value::{FromArg, ValueError};
