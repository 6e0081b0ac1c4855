//! Typed option descriptors.
//!
//! An [`Opt<T>`] owns everything the scanner needs to know about one
//! option: its aliases, its [`Arity`], a description, and the current
//! value. Configuration is fluent (declare, then chain
//! [`default_value`](Opt::default_value), [`check`](Opt::check),
//! [`bind`](Opt::bind)) and must finish before the descriptor is
//! registered; aliases are immutable from construction on.
//!
//! The parser only ever sees descriptors through the type-erased
//! [`AnyOpt`] trait, so options of different value types can share one
//! registry. Parse-time state lives behind a `RefCell`, which lets the
//! scanner drive descriptors through shared borrows while the caller keeps
//! ownership and reads the results afterwards.

use std::cell::RefCell;
use std::rc::Rc;

use log::trace;

use crate::error::{Error, Result};
use crate::value::{FromArg, ValueError};

/// Whether an option takes no value, an optional value, or a required one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// A bare flag; a value token never follows it.
    None,
    /// A value token may follow; without one the option parses empty text.
    Optional,
    /// A value must follow, inline (`--name=v`), attached (`-nv`) or as the
    /// next token.
    Required,
}

/// Parse-time state, mutated only by a successful [`AnyOpt::parse_value`].
#[derive(Debug)]
struct State<T> {
    value: Option<T>,
    is_set: bool,
}

/// A declared option with values of type `T`.
pub struct Opt<T> {
    aliases: Vec<String>,
    arity: Arity,
    description: String,
    check: Option<Box<dyn Fn(&T) -> bool>>,
    slot: Option<Rc<RefCell<T>>>,
    state: RefCell<State<T>>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Opt<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Opt")
            .field("aliases", &self.aliases)
            .field("arity", &self.arity)
            .field("description", &self.description)
            .field("check", &self.check.as_ref().map(|_| "..."))
            .field("slot", &self.slot)
            .field("state", &self.state)
            .finish()
    }
}

impl<T: FromArg + Clone> Opt<T> {
    /// Declare an option.
    ///
    /// The aliases are the option's identity: lookup during scanning is by
    /// exact, case-sensitive match. Each alias must consist of
    /// `[A-Za-z0-9-]` with at least one alphanumeric character, and the set
    /// must be non-empty; violations are [`Error::Configuration`].
    pub fn new<I, S>(aliases: I, arity: Arity, description: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let aliases: Vec<String> = aliases.into_iter().map(Into::into).collect();
        if aliases.is_empty() {
            return Err(Error::Configuration {
                option: String::new(),
                reason: "an option must have at least one alias".to_owned(),
            });
        }
        if let Some(bad) = aliases.iter().find(|a| !is_valid_alias(a)) {
            return Err(Error::Configuration {
                option: bad.clone(),
                reason: format!(
                    "invalid alias {bad:?}: aliases match [A-Za-z0-9-]+ and contain \
                     at least one alphanumeric character"
                ),
            });
        }
        Ok(Self {
            aliases,
            arity,
            description: description.to_owned(),
            check: None,
            slot: None,
            state: RefCell::new(State {
                value: None,
                is_set: false,
            }),
        })
    }

    /// Give the option a static default, reported by [`value`](Opt::value)
    /// until a successful parse overwrites it.
    ///
    /// Only [`Arity::Optional`] options may carry one: a `Required` option
    /// always receives an explicit value and a `None` option never carries
    /// any, so a default on either is a declaration bug and fails with
    /// [`Error::Configuration`] before any parse call happens.
    pub fn default_value(self, value: T) -> Result<Self> {
        let reason = match self.arity {
            Arity::Required => "an option that requires a value cannot have a default",
            Arity::None => "an option that takes no value cannot have a default",
            Arity::Optional => {
                self.state.borrow_mut().value = Some(value);
                return Ok(self);
            }
        };
        Err(Error::Configuration {
            option: longest_alias(&self.aliases).to_owned(),
            reason: reason.to_owned(),
        })
    }

    /// Register a validation predicate, run once per successfully converted
    /// value. Returning `false` rejects the value with
    /// [`Error::Validation`] and leaves the option untouched.
    pub fn check(mut self, predicate: impl Fn(&T) -> bool + 'static) -> Self {
        self.check = Some(Box::new(predicate));
        self
    }

    /// Register caller-owned storage that receives a copy of the value on
    /// every successful parse.
    ///
    /// The current value is not copied immediately; the slot only changes
    /// when a later parse succeeds.
    pub fn bind(mut self, slot: Rc<RefCell<T>>) -> Self {
        self.slot = Some(slot);
        self
    }

    /// The current value: the last successfully parsed value, else the
    /// default, else `None`.
    pub fn value(&self) -> Option<T> {
        self.state.borrow().value.clone()
    }

    /// Whether a successful parse has stored a value.
    pub fn is_set(&self) -> bool {
        self.state.borrow().is_set
    }

    /// The aliases this option answers to, as declared.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Arity class of this option.
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// The display string supplied at declaration. Not interpreted by the
    /// engine.
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Capability surface the parser needs from a registered option,
/// independent of its value type.
pub trait AnyOpt {
    /// Aliases this option answers to.
    fn aliases(&self) -> &[String];

    /// Arity class.
    fn arity(&self) -> Arity;

    /// Name used for this option in error and log messages: the longest
    /// alias.
    fn display_name(&self) -> &str;

    /// Whether a successful parse has stored a value.
    fn is_set(&self) -> bool;

    /// Convert `raw` into the option's value type and store the result.
    ///
    /// Empty text on a `Required`-arity option fails with [`Error::Parse`]
    /// before conversion is attempted. A conversion failure is
    /// [`Error::Parse`]; a validator rejection is [`Error::Validation`];
    /// both leave the stored value and `is_set` untouched. On success the
    /// value is stored, `is_set` becomes `true`, and the bound slot (if
    /// any) receives a copy. This is the only mutator of descriptor state.
    fn parse_value(&self, raw: &str) -> Result<()>;
}

impl<T: FromArg + Clone> AnyOpt for Opt<T> {
    fn aliases(&self) -> &[String] {
        &self.aliases
    }

    fn arity(&self) -> Arity {
        self.arity
    }

    fn display_name(&self) -> &str {
        longest_alias(&self.aliases)
    }

    fn is_set(&self) -> bool {
        self.state.borrow().is_set
    }

    fn parse_value(&self, raw: &str) -> Result<()> {
        if raw.is_empty() && self.arity == Arity::Required {
            return Err(Error::Parse {
                option: self.display_name().to_owned(),
                raw: String::new(),
                source: ValueError::Empty,
            });
        }

        let value = T::from_arg(raw).map_err(|source| Error::Parse {
            option: self.display_name().to_owned(),
            raw: raw.to_owned(),
            source,
        })?;

        if let Some(check) = &self.check {
            if !check(&value) {
                return Err(Error::Validation {
                    option: self.display_name().to_owned(),
                    raw: raw.to_owned(),
                });
            }
        }

        if let Some(slot) = &self.slot {
            *slot.borrow_mut() = value.clone();
        }

        let mut state = self.state.borrow_mut();
        state.value = Some(value);
        state.is_set = true;
        trace!("option `{}` set from {:?}", self.display_name(), raw);
        Ok(())
    }
}

/// An alias is `[A-Za-z0-9-]+` with at least one non-hyphen character, so
/// `dry-run` is fine while `--`, spaces, or punctuation are not.
fn is_valid_alias(alias: &str) -> bool {
    !alias.is_empty()
        && alias.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && alias.chars().any(|c| c.is_ascii_alphanumeric())
}

/// Longest alias wins as the display name (`--verbose` reads better in an
/// error message than `-v`).
fn longest_alias(aliases: &[String]) -> &str {
    aliases
        .iter()
        .max_by_key(|a| a.len())
        .map(String::as_str)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_alias_set_rejected() {
        let err = Opt::<i32>::new(Vec::<String>::new(), Arity::None, "desc").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_alias_with_illegal_characters_rejected() {
        let err = Opt::<i32>::new(["valid", "[(*)]invalid"], Arity::None, "desc").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_alias_of_only_hyphens_rejected() {
        let err = Opt::<i32>::new(["--"], Arity::None, "desc").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_hyphenated_alias_accepted() {
        assert!(Opt::<i32>::new(["dry-run"], Arity::None, "desc").is_ok());
    }

    #[test]
    fn test_default_on_required_rejected() {
        let err = Opt::<i32>::new(["x"], Arity::Required, "desc")
            .unwrap()
            .default_value(10)
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_default_on_none_rejected() {
        let err = Opt::<bool>::new(["v"], Arity::None, "desc")
            .unwrap()
            .default_value(true)
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_default_on_optional_visible_before_parse() {
        let opt = Opt::<i32>::new(["n"], Arity::Optional, "desc")
            .unwrap()
            .default_value(7)
            .unwrap();
        assert_eq!(opt.value(), Some(7));
        assert!(!opt.is_set());
    }

    #[test]
    fn test_parse_value_stores_and_sets() {
        let opt = Opt::<i32>::new(["x"], Arity::Required, "desc").unwrap();
        opt.parse_value("42").unwrap();
        assert_eq!(opt.value(), Some(42));
        assert!(opt.is_set());
    }

    #[test]
    fn test_empty_text_on_required_is_parse_error() {
        let opt = Opt::<String>::new(["name"], Arity::Required, "desc").unwrap();
        let err = opt.parse_value("").unwrap_err();
        assert!(matches!(
            err,
            Error::Parse {
                source: ValueError::Empty,
                ..
            }
        ));
    }

    #[test]
    fn test_failed_check_leaves_state_untouched() {
        let opt = Opt::<i32>::new(["x"], Arity::Optional, "desc")
            .unwrap()
            .default_value(1)
            .unwrap()
            .check(|v| *v > 0);
        let err = opt.parse_value("-5").unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(opt.value(), Some(1));
        assert!(!opt.is_set());
    }

    #[test]
    fn test_bind_does_not_copy_immediately() {
        let slot = Rc::new(RefCell::new(0));
        let opt = Opt::<i32>::new(["n"], Arity::Optional, "desc")
            .unwrap()
            .default_value(9)
            .unwrap()
            .bind(Rc::clone(&slot));
        assert_eq!(*slot.borrow(), 0);
        opt.parse_value("3").unwrap();
        assert_eq!(*slot.borrow(), 3);
    }

    #[test]
    fn test_display_name_is_longest_alias() {
        let opt = Opt::<bool>::new(["v", "verbose"], Arity::None, "desc").unwrap();
        assert_eq!(opt.display_name(), "verbose");
    }
}
