//! The option registry and the argument-vector scanner.
//!
//! A [`Parser`] borrows caller-owned [`AnyOpt`](crate::AnyOpt) descriptors
//! and scans the argument vector once, left to right, routing each
//! recognized token to its descriptor:
//!
//! - `-x` — single short option (`-x VALUE` when it takes a value)
//! - `-xyz` — clustered value-less short options, same as `-x -y -z`
//! - `-nVALUE` — short option with its value attached
//! - `--name`, `--name VALUE`, `--name=VALUE` — long options
//! - `--` — end of options; every later token is left untouched
//!
//! A bare `-`, an empty token, or a token that does not start with `-` is
//! skipped: positional collection is out of scope. The scan is fail-fast —
//! the first unknown option, missing value, conversion failure, or
//! validator rejection aborts the call, and options matched earlier keep
//! their new values.

use log::debug;

use crate::error::{Error, Result};
use crate::opt::{AnyOpt, Arity};

/// Option registry and dispatcher.
///
/// Holds non-owning borrows, so every registered descriptor must outlive
/// the parser. Alias uniqueness is deliberately not enforced: lookup
/// returns the first descriptor, in registration order, that declares the
/// alias.
#[derive(Default)]
pub struct Parser<'a> {
    opts: Vec<&'a dyn AnyOpt>,
}

impl<'a> Parser<'a> {
    /// An empty registry.
    pub fn new() -> Self {
        Self { opts: Vec::new() }
    }

    /// Register a descriptor. Registration order decides lookup priority
    /// when two descriptors share an alias.
    pub fn add(&mut self, opt: &'a dyn AnyOpt) {
        self.opts.push(opt);
    }

    /// Parse the process argument list (`std::env::args()`).
    ///
    /// Delegates to [`parse`](Parser::parse) after collecting the
    /// iterator, so tests can exercise the same code path with an explicit
    /// slice.
    pub fn parse_env(&self) -> Result<()> {
        let argv: Vec<String> = std::env::args().collect();
        self.parse(&argv)
    }

    /// Scan `argv` once, left to right.
    ///
    /// `argv[0]` is the program name and is skipped, matching the shape of
    /// a process argument list. Calling `parse` again simply re-scans and
    /// may re-mutate options that are already set.
    pub fn parse<S: AsRef<str>>(&self, argv: &[S]) -> Result<()> {
        let mut idx = 1usize; // argv[0] is the program name
        while idx < argv.len() {
            let token = argv[idx].as_ref();

            // A bare `-` is a malformed option; empty tokens mean nothing.
            if token.is_empty() || token == "-" {
                debug!("skipping malformed token {token:?}");
                idx += 1;
                continue;
            }

            // End-of-options terminator.
            if token == "--" {
                break;
            }

            if let Some(body) = token.strip_prefix("--") {
                idx = self.scan_long(body, argv, idx)?;
            } else if let Some(body) = token.strip_prefix('-') {
                idx = self.scan_short(body, argv, idx)?;
            } else {
                // Positional arguments are out of scope; leave them alone.
                debug!("ignoring non-option token {token:?}");
                idx += 1;
            }
        }
        Ok(())
    }

    /// Resolve an alias to the first registered descriptor declaring it.
    fn lookup(&self, name: &str) -> Result<&'a dyn AnyOpt> {
        self.opts
            .iter()
            .find(|opt| opt.aliases().iter().any(|alias| alias == name))
            .copied()
            .ok_or_else(|| Error::UnknownOption(name.to_owned()))
    }

    /// Handle `--name`, `--name=value` and `--name value` forms.
    ///
    /// `body` is the token with the leading `--` stripped, `idx` its
    /// position. Returns the position the scan resumes at.
    fn scan_long<S: AsRef<str>>(&self, body: &str, argv: &[S], idx: usize) -> Result<usize> {
        // Split `name=value` at the first `=`.
        if let Some((name, inline)) = body.split_once('=') {
            let opt = self.lookup(name)?;
            match opt.arity() {
                // An inline value on a value-less option is ignored; the
                // flag still fires.
                Arity::None => opt.parse_value("")?,
                Arity::Optional | Arity::Required => opt.parse_value(inline)?,
            }
            return Ok(idx + 1);
        }

        let opt = self.lookup(body)?;
        if opt.arity() == Arity::None {
            opt.parse_value("")?;
            return Ok(idx + 1);
        }
        self.consume_value(opt, argv, idx)
    }

    /// Handle single short options (`-x`), clustered flags (`-xyz`), and
    /// attached values (`-nVALUE`).
    fn scan_short<S: AsRef<str>>(&self, body: &str, argv: &[S], idx: usize) -> Result<usize> {
        let mut chars = body.chars();
        let Some(first) = chars.next() else {
            // Unreachable: the caller already filtered bare `-`.
            return Ok(idx + 1);
        };
        let attached = chars.as_str();

        if attached.is_empty() {
            // Single one-letter option.
            let opt = self.lookup(&first.to_string())?;
            if opt.arity() == Arity::None {
                opt.parse_value("")?;
                return Ok(idx + 1);
            }
            return self.consume_value(opt, argv, idx);
        }

        let opt = self.lookup(&first.to_string())?;
        if opt.arity() == Arity::Required {
            // `-nVALUE`: the rest of the token is the attached value.
            opt.parse_value(attached)?;
        } else {
            // `-xyz`: every character is an independent flag. A later
            // character that turns out to require a value parses empty
            // text and fails there; that failure is reported, not
            // suppressed.
            for c in body.chars() {
                self.lookup(&c.to_string())?.parse_value("")?;
            }
        }
        Ok(idx + 1)
    }

    /// Consume the token after `idx` as `opt`'s value.
    ///
    /// Without a following token, `Required` arity fails with
    /// [`Error::MissingValue`] and `Optional` arity parses empty text.
    fn consume_value<S: AsRef<str>>(
        &self,
        opt: &dyn AnyOpt,
        argv: &[S],
        idx: usize,
    ) -> Result<usize> {
        match argv.get(idx + 1) {
            Some(value) => {
                opt.parse_value(value.as_ref())?;
                Ok(idx + 2)
            }
            None if opt.arity() == Arity::Required => {
                Err(Error::MissingValue(opt.display_name().to_owned()))
            }
            None => {
                opt.parse_value("")?;
                Ok(idx + 1)
            }
        }
    }
}
