//! Member keys.
//!
//! A [`Key`] names the slot a value was found in: a sequence index, a record
//! property name, or a symbol token. The mapper hands the key to the
//! transformation callback together with the original parent container.

use std::fmt;
use std::rc::Rc;

use crate::value::Symbol;

/// The identifier under which a value lives in its parent container.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Position in a sequence.
    Index(usize),
    /// Plain property name of a record.
    Name(Rc<str>),
    /// Symbol-keyed property of a record.
    Symbol(Symbol),
}

impl Key {
    /// The key passed to the callback when the root itself is a leaf.
    pub fn root() -> Self {
        Key::Name(Rc::from(""))
    }

    /// Create a name key.
    pub fn name(name: impl AsRef<str>) -> Self {
        Key::Name(Rc::from(name.as_ref()))
    }

    /// True for the empty name used for a leaf root.
    pub fn is_root(&self) -> bool {
        matches!(self, Key::Name(name) if name.is_empty())
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Index(index) => Some(*index),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(name) => Some(name.as_ref()),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Key::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(index) => write!(f, "{}", index),
            Key::Name(name) => write!(f, "{}", name),
            Key::Symbol(symbol) => write!(f, "{}", symbol),
        }
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::name(name)
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(Rc::from(name))
    }
}

impl From<Symbol> for Key {
    fn from(symbol: Symbol) -> Self {
        Key::Symbol(symbol)
    }
}

impl PartialEq<str> for Key {
    fn eq(&self, other: &str) -> bool {
        self.as_name() == Some(other)
    }
}

impl PartialEq<&str> for Key {
    fn eq(&self, other: &&str) -> bool {
        self.as_name() == Some(*other)
    }
}

impl PartialEq<usize> for Key {
    fn eq(&self, other: &usize) -> bool {
        self.as_index() == Some(*other)
    }
}
