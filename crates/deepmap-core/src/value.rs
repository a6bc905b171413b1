//! Host value model.
//!
//! A [`Value`] is either a leaf or a container. Containers ([`Seq`] and
//! [`Record`]) are shared, interior-mutable handles: cloning a container
//! value yields another handle to the same container, so graphs can alias
//! substructure and contain cycles. Identity is the `Rc` allocation, exposed
//! as a [`ContainerId`].
//!
//! ## Equality
//!
//! `PartialEq` on [`Value`] is strict equality: primitives compare by value
//! (NaN is never equal to itself), everything else compares by identity.
//! There is no structural comparison in this crate.
//!
//! ## Dropping
//!
//! Dropping a container releases nested containers with an explicit work
//! list, so arbitrarily deep graphs drop without growing the call stack.
//! `Rc` cycles are never released on their own; call [`Record::clear`] or
//! [`Seq::clear`] to break them.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::rc::Rc;

use crate::key::Key;
use crate::opaque::Opaque;

// ============================================================================
// Value
// ============================================================================

/// Any value in the host data model.
#[derive(Clone, Default)]
pub enum Value {
    /// Absence marker.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Text(Rc<str>),
    Symbol(Symbol),
    Callable(Callable),
    Opaque(Opaque),
    Seq(Seq),
    Record(Record),
}

impl Value {
    /// Build a dense sequence value.
    pub fn seq(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Seq(Seq::from_values(items))
    }

    /// Build a record value from named entries.
    pub fn record<K: AsRef<str>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Record(Record::from_entries(entries))
    }

    pub fn text(text: impl AsRef<str>) -> Self {
        Value::Text(Rc::from(text.as_ref()))
    }

    /// Short type name, used in logs and statistics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Symbol(_) => "symbol",
            Value::Callable(_) => "callable",
            Value::Opaque(opaque) => opaque.kind().name(),
            Value::Seq(_) => "sequence",
            Value::Record(_) => "record",
        }
    }

    /// True for sequences and records.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Seq(_) | Value::Record(_))
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text.as_ref()),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&Seq> {
        match self {
            Value::Seq(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&Opaque> {
        match self {
            Value::Opaque(opaque) => Some(opaque),
            _ => None,
        }
    }

    /// Identity of a container, `None` for every other value.
    pub fn container_id(&self) -> Option<ContainerId> {
        match self {
            Value::Seq(seq) => Some(seq.id()),
            Value::Record(record) => Some(record.id()),
            _ => None,
        }
    }

    /// True when both values are handles to the same reference-typed value.
    ///
    /// Primitives are never pointer-equal, even to themselves.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
            (Value::Opaque(a), Value::Opaque(b)) => a.ptr_eq(b),
            (Value::Seq(a), Value::Seq(b)) => a.ptr_eq(b),
            (Value::Record(a), Value::Record(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Read a member by key. Records fall back to their prototype chain.
    pub fn get(&self, key: &Key) -> Option<Value> {
        match (self, key) {
            (Value::Seq(seq), Key::Index(index)) => seq.get(*index),
            (Value::Record(record), key) => record.get_key(key),
            _ => None,
        }
    }

    /// Own enumerable members in enumeration order.
    ///
    /// Sequences yield populated indices only. Records yield enumerable
    /// names, then enumerable symbol keys. Leaves yield nothing.
    pub fn own_enumerable(&self) -> Vec<(Key, Value)> {
        match self {
            Value::Seq(seq) => seq
                .entries()
                .into_iter()
                .map(|(index, value)| (Key::Index(index), value))
                .collect(),
            Value::Record(record) => record.own_enumerable(),
            _ => Vec::new(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => self.ptr_eq(other),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("Undefined"),
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Number(n) => write!(f, "Number({})", n),
            Value::Text(text) => write!(f, "Text({:?})", text),
            Value::Symbol(symbol) => write!(f, "{:?}", symbol),
            Value::Callable(callable) => write!(f, "{:?}", callable),
            Value::Opaque(opaque) => write!(f, "{:?}", opaque),
            Value::Seq(seq) => write!(f, "{:?}", seq),
            Value::Record(record) => write!(f, "{:?}", record),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::text(text)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(Rc::from(text))
    }
}

impl From<Symbol> for Value {
    fn from(symbol: Symbol) -> Self {
        Value::Symbol(symbol)
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Value::Callable(callable)
    }
}

impl From<Opaque> for Value {
    fn from(opaque: Opaque) -> Self {
        Value::Opaque(opaque)
    }
}

impl From<Seq> for Value {
    fn from(seq: Seq) -> Self {
        Value::Seq(seq)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

// ============================================================================
// Identity
// ============================================================================

/// Identity of a container allocation.
///
/// Only meaningful while the container is alive; holders that outlive a
/// borrow must keep a handle to the container as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(usize);

impl ContainerId {
    fn of<T>(rc: &Rc<T>) -> Self {
        ContainerId(Rc::as_ptr(rc) as *const () as usize)
    }
}

// ============================================================================
// Symbol
// ============================================================================

/// Unique token usable as a record key or as a leaf value.
///
/// Two symbols are equal only if they are the same token, regardless of
/// description.
#[derive(Clone)]
pub struct Symbol(Rc<Option<String>>);

impl Symbol {
    pub fn new(description: impl Into<String>) -> Self {
        Symbol(Rc::new(Some(description.into())))
    }

    pub fn anonymous() -> Self {
        Symbol(Rc::new(None))
    }

    pub fn description(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Symbol) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as *const () as usize).hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or(""))
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

// ============================================================================
// Callable
// ============================================================================

type NativeFn = dyn Fn(&[Value]) -> Value;

/// A callable value. Always a leaf.
#[derive(Clone)]
pub struct Callable {
    name: Rc<str>,
    func: Rc<NativeFn>,
}

impl Callable {
    pub fn new(name: impl AsRef<str>, func: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Callable {
            name: Rc::from(name.as_ref()),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }

    pub fn ptr_eq(&self, other: &Callable) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({})", self.name)
    }
}

// ============================================================================
// Seq
// ============================================================================

#[derive(Default)]
struct SeqData {
    /// `None` marks a hole.
    slots: Vec<Option<Value>>,
}

impl Drop for SeqData {
    fn drop(&mut self) {
        release_nested(mem::take(&mut self.slots).into_iter().flatten());
    }
}

/// Ordered sequence handle. Slots may be holes.
#[derive(Clone, Default)]
pub struct Seq(Rc<RefCell<SeqData>>);

impl Seq {
    pub fn new() -> Self {
        Seq::default()
    }

    /// A sequence of `len` holes.
    pub fn with_len(len: usize) -> Self {
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || None);
        Seq(Rc::new(RefCell::new(SeqData { slots })))
    }

    /// A dense sequence.
    pub fn from_values(items: impl IntoIterator<Item = Value>) -> Self {
        let slots = items.into_iter().map(Some).collect();
        Seq(Rc::new(RefCell::new(SeqData { slots })))
    }

    pub fn id(&self) -> ContainerId {
        ContainerId::of(&self.0)
    }

    pub fn ptr_eq(&self, other: &Seq) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Length, counting holes.
    pub fn len(&self) -> usize {
        self.0.borrow().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when `index` holds a value (not a hole, not out of range).
    pub fn has(&self, index: usize) -> bool {
        matches!(self.0.borrow().slots.get(index), Some(Some(_)))
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().slots.get(index).cloned().flatten()
    }

    /// Store `value` at `index`, growing the sequence with holes if needed.
    pub fn set(&self, index: usize, value: Value) {
        let mut data = self.0.borrow_mut();
        if index >= data.slots.len() {
            data.slots.resize_with(index + 1, || None);
        }
        data.slots[index] = Some(value);
    }

    pub fn push(&self, value: Value) {
        self.0.borrow_mut().slots.push(Some(value));
    }

    /// Turn `index` back into a hole.
    pub fn remove(&self, index: usize) -> Option<Value> {
        self.0
            .borrow_mut()
            .slots
            .get_mut(index)
            .and_then(Option::take)
    }

    /// Truncate, or extend with holes.
    pub fn set_len(&self, len: usize) {
        let dropped: Vec<Option<Value>> = {
            let mut data = self.0.borrow_mut();
            if len < data.slots.len() {
                data.slots.drain(len..).collect()
            } else {
                data.slots.resize_with(len, || None);
                Vec::new()
            }
        };
        release_nested(dropped.into_iter().flatten());
    }

    /// Populated slots in index order.
    pub fn entries(&self) -> Vec<(usize, Value)> {
        self.0
            .borrow()
            .slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.clone().map(|value| (index, value)))
            .collect()
    }

    /// Populated values in index order.
    pub fn values(&self) -> Vec<Value> {
        self.0.borrow().slots.iter().flatten().cloned().collect()
    }

    /// Drop every element, breaking any cycle through this sequence.
    pub fn clear(&self) {
        let slots = mem::take(&mut self.0.borrow_mut().slots);
        release_nested(slots.into_iter().flatten());
    }
}

impl fmt::Debug for Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(data) => {
                let populated = data.slots.iter().filter(|slot| slot.is_some()).count();
                write!(
                    f,
                    "Seq@{:x}(len={}, populated={})",
                    self.id().0,
                    data.slots.len(),
                    populated
                )
            }
            Err(_) => write!(f, "Seq@{:x}(borrowed)", self.id().0),
        }
    }
}

// ============================================================================
// Record
// ============================================================================

#[derive(Debug, Clone)]
struct Slot {
    value: Value,
    enumerable: bool,
}

#[derive(Default)]
struct RecordData {
    names: Vec<(Rc<str>, Slot)>,
    index: HashMap<Rc<str>, usize>,
    symbols: Vec<(Symbol, Slot)>,
    prototype: Option<Record>,
}

impl RecordData {
    fn own(&self, key: &Key) -> Option<&Slot> {
        match key {
            Key::Name(name) => self.index.get(name).map(|&i| &self.names[i].1),
            Key::Symbol(symbol) => self
                .symbols
                .iter()
                .find(|(s, _)| s == symbol)
                .map(|(_, slot)| slot),
            Key::Index(index) => {
                let name: Rc<str> = Rc::from(index.to_string());
                self.index.get(&name).map(|&i| &self.names[i].1)
            }
        }
    }

    fn define(&mut self, key: Key, slot: Slot) -> Option<Value> {
        match key {
            Key::Name(name) => self.define_name(name, slot),
            Key::Index(index) => self.define_name(Rc::from(index.to_string()), slot),
            Key::Symbol(symbol) => {
                match self.symbols.iter_mut().find(|(s, _)| *s == symbol) {
                    Some((_, existing)) => Some(mem::replace(existing, slot).value),
                    None => {
                        self.symbols.push((symbol, slot));
                        None
                    }
                }
            }
        }
    }

    fn define_name(&mut self, name: Rc<str>, slot: Slot) -> Option<Value> {
        match self.index.get(&name) {
            Some(&i) => Some(mem::replace(&mut self.names[i].1, slot).value),
            None => {
                self.index.insert(name.clone(), self.names.len());
                self.names.push((name, slot));
                None
            }
        }
    }

    fn take_all(&mut self) -> impl Iterator<Item = Value> {
        self.index.clear();
        let names = mem::take(&mut self.names).into_iter().map(|(_, s)| s.value);
        let symbols = mem::take(&mut self.symbols)
            .into_iter()
            .map(|(_, s)| s.value);
        let prototype = self.prototype.take().map(Value::Record);
        names.chain(symbols).chain(prototype)
    }
}

impl Drop for RecordData {
    fn drop(&mut self) {
        let members: Vec<Value> = self.take_all().collect();
        release_nested(members);
    }
}

/// Keyed container handle.
///
/// Own properties are enumerated as names in insertion order, then symbol
/// keys in insertion order. Properties defined as non-enumerable are
/// readable but never enumerated. Members of the prototype chain are
/// readable through [`Record::get`] but are not own members.
#[derive(Clone, Default)]
pub struct Record(Rc<RefCell<RecordData>>);

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    /// An empty record inheriting from `prototype`.
    pub fn with_prototype(prototype: Record) -> Self {
        let record = Record::new();
        record.0.borrow_mut().prototype = Some(prototype);
        record
    }

    pub fn from_entries<K: AsRef<str>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        let record = Record::new();
        for (name, value) in entries {
            record.set(name, value);
        }
        record
    }

    pub fn id(&self) -> ContainerId {
        ContainerId::of(&self.0)
    }

    pub fn ptr_eq(&self, other: &Record) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn prototype(&self) -> Option<Record> {
        self.0.borrow().prototype.clone()
    }

    /// Set an enumerable named property, returning the previous own value.
    pub fn set(&self, name: impl AsRef<str>, value: Value) -> Option<Value> {
        self.insert(Key::name(name), value)
    }

    /// Set an enumerable symbol-keyed property.
    pub fn set_symbol(&self, symbol: Symbol, value: Value) -> Option<Value> {
        self.insert(Key::Symbol(symbol), value)
    }

    /// Set an enumerable property under any key. Index keys become names.
    pub fn insert(&self, key: Key, value: Value) -> Option<Value> {
        self.define(key, value, true)
    }

    /// Define an own property with explicit enumerability.
    pub fn define(&self, key: Key, value: Value, enumerable: bool) -> Option<Value> {
        self.0.borrow_mut().define(key, Slot { value, enumerable })
    }

    /// Own property lookup, enumerable or not.
    pub fn get_own(&self, key: &Key) -> Option<Value> {
        self.0.borrow().own(key).map(|slot| slot.value.clone())
    }

    pub fn has_own(&self, key: &Key) -> bool {
        self.0.borrow().own(key).is_some()
    }

    /// Lookup through the prototype chain.
    pub fn get_key(&self, key: &Key) -> Option<Value> {
        let mut current = Some(self.clone());
        while let Some(record) = current {
            let data = record.0.borrow();
            if let Some(slot) = data.own(key) {
                return Some(slot.value.clone());
            }
            current = data.prototype.clone();
        }
        None
    }

    pub fn get(&self, name: impl AsRef<str>) -> Option<Value> {
        self.get_key(&Key::name(name))
    }

    pub fn get_symbol(&self, symbol: &Symbol) -> Option<Value> {
        self.get_key(&Key::Symbol(symbol.clone()))
    }

    /// Remove an own property.
    pub fn remove(&self, key: &Key) -> Option<Value> {
        let removed = {
            let mut data = self.0.borrow_mut();
            match key {
                Key::Symbol(symbol) => {
                    let position = data.symbols.iter().position(|(s, _)| s == symbol)?;
                    data.symbols.remove(position).1.value
                }
                _ => {
                    let name: Rc<str> = match key {
                        Key::Index(index) => Rc::from(index.to_string()),
                        Key::Name(name) => name.clone(),
                        Key::Symbol(_) => return None,
                    };
                    let position = data.index.remove(&name)?;
                    let (_, slot) = data.names.remove(position);
                    for i in data.index.values_mut() {
                        if *i > position {
                            *i -= 1;
                        }
                    }
                    slot.value
                }
            }
        };
        Some(removed)
    }

    /// Number of own properties, enumerable or not.
    pub fn len(&self) -> usize {
        let data = self.0.borrow();
        data.names.len() + data.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Own enumerable keys in enumeration order.
    pub fn keys(&self) -> Vec<Key> {
        self.own_enumerable().into_iter().map(|(key, _)| key).collect()
    }

    /// Own enumerable members: names first, then symbol keys.
    pub fn own_enumerable(&self) -> Vec<(Key, Value)> {
        let data = self.0.borrow();
        let names = data
            .names
            .iter()
            .filter(|(_, slot)| slot.enumerable)
            .map(|(name, slot)| (Key::Name(name.clone()), slot.value.clone()));
        let symbols = data
            .symbols
            .iter()
            .filter(|(_, slot)| slot.enumerable)
            .map(|(symbol, slot)| (Key::Symbol(symbol.clone()), slot.value.clone()));
        names.chain(symbols).collect()
    }

    /// Drop every own property and the prototype link, breaking any cycle
    /// through this record.
    pub fn clear(&self) {
        let members: Vec<Value> = self.0.borrow_mut().take_all().collect();
        release_nested(members);
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(data) => write!(
                f,
                "Record@{:x}(names={}, symbols={})",
                self.id().0,
                data.names.len(),
                data.symbols.len()
            ),
            Err(_) => write!(f, "Record@{:x}(borrowed)", self.id().0),
        }
    }
}

// ============================================================================
// Iterative release
// ============================================================================

/// Drop values without recursing through nested containers.
///
/// A container whose last handle is in `values` is unwrapped and its members
/// queued here, so its own `Drop` runs on an already-empty payload.
fn release_nested(values: impl IntoIterator<Item = Value>) {
    let mut pending: Vec<Value> = values.into_iter().filter(Value::is_container).collect();
    while let Some(value) = pending.pop() {
        match value {
            Value::Seq(Seq(rc)) => {
                if let Ok(cell) = Rc::try_unwrap(rc) {
                    let mut data = cell.into_inner();
                    pending.extend(
                        mem::take(&mut data.slots)
                            .into_iter()
                            .flatten()
                            .filter(Value::is_container),
                    );
                }
            }
            Value::Record(Record(rc)) => {
                if let Ok(cell) = Rc::try_unwrap(rc) {
                    let mut data = cell.into_inner();
                    pending.extend(data.take_all().filter(Value::is_container));
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod equality {
        use super::*;

        #[test]
        fn primitives_compare_by_value() {
            assert_eq!(Value::from(1), Value::from(1.0));
            assert_eq!(Value::from("a"), Value::text("a"));
            assert_eq!(Value::Null, Value::Null);
            assert_ne!(Value::Null, Value::Undefined);
            assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
        }

        #[test]
        fn containers_compare_by_identity() {
            let a = Value::seq([Value::from(1)]);
            let b = Value::seq([Value::from(1)]);
            assert_eq!(a, a.clone());
            assert_ne!(a, b);
            assert_eq!(a.container_id(), a.clone().container_id());
            assert_ne!(a.container_id(), b.container_id());
        }

        #[test]
        fn primitives_are_never_ptr_eq() {
            let n = Value::from(1);
            assert!(!n.ptr_eq(&n));
            let r = Value::Record(Record::new());
            assert!(r.ptr_eq(&r.clone()));
        }
    }

    mod seq {
        use super::*;

        #[test]
        fn holes_are_not_entries() {
            let seq = Seq::with_len(5);
            seq.set(0, Value::from(1));
            seq.set(3, Value::from(4));
            assert_eq!(seq.len(), 5);
            assert!(seq.has(0));
            assert!(!seq.has(1));
            assert_eq!(seq.get(1), None);
            let indices: Vec<usize> = seq.entries().into_iter().map(|(i, _)| i).collect();
            assert_eq!(indices, vec![0, 3]);
        }

        #[test]
        fn set_past_end_grows_with_holes() {
            let seq = Seq::new();
            seq.set(2, Value::from("x"));
            assert_eq!(seq.len(), 3);
            assert!(!seq.has(0));
            assert_eq!(seq.get(2), Some(Value::from("x")));
        }

        #[test]
        fn set_len_truncates_and_extends() {
            let seq = Seq::from_values([Value::from(1), Value::from(2), Value::from(3)]);
            seq.set_len(1);
            assert_eq!(seq.values(), vec![Value::from(1)]);
            seq.set_len(4);
            assert_eq!(seq.len(), 4);
            assert_eq!(seq.entries().len(), 1);
        }

        #[test]
        fn remove_leaves_a_hole() {
            let seq = Seq::from_values([Value::from(1), Value::from(2)]);
            assert_eq!(seq.remove(0), Some(Value::from(1)));
            assert_eq!(seq.len(), 2);
            assert!(!seq.has(0));
        }
    }

    mod record {
        use super::*;

        #[test]
        fn names_enumerate_before_symbols() {
            let tag = Symbol::new("tag");
            let record = Record::new();
            record.set_symbol(tag.clone(), Value::from(1));
            record.set("b", Value::from(2));
            record.set("a", Value::from(3));
            let keys = record.keys();
            assert_eq!(keys, vec![Key::name("b"), Key::name("a"), Key::Symbol(tag)]);
        }

        #[test]
        fn overwrite_keeps_position() {
            let record = Record::from_entries([("a", Value::from(1)), ("b", Value::from(2))]);
            let previous = record.set("a", Value::from(10));
            assert_eq!(previous, Some(Value::from(1)));
            assert_eq!(record.keys(), vec![Key::name("a"), Key::name("b")]);
            assert_eq!(record.get("a"), Some(Value::from(10)));
        }

        #[test]
        fn hidden_properties_are_readable_but_not_enumerated() {
            let record = Record::new();
            record.set("shown", Value::from(1));
            record.define(Key::name("hidden"), Value::from(2), false);
            assert_eq!(record.get("hidden"), Some(Value::from(2)));
            assert_eq!(record.len(), 2);
            assert_eq!(record.keys(), vec![Key::name("shown")]);
        }

        #[test]
        fn prototype_members_are_inherited_not_owned() {
            let proto = Record::from_entries([("inherited", Value::from(5))]);
            let record = Record::with_prototype(proto.clone());
            record.set("own", Value::from(10));
            assert_eq!(record.get("inherited"), Some(Value::from(5)));
            assert!(!record.has_own(&Key::name("inherited")));
            assert_eq!(record.keys(), vec![Key::name("own")]);
            assert!(record.prototype().is_some_and(|p| p.ptr_eq(&proto)));
        }

        #[test]
        fn index_keys_are_stored_as_names() {
            let record = Record::new();
            record.insert(Key::Index(0), Value::from("zero"));
            assert_eq!(record.get("0"), Some(Value::from("zero")));
            assert_eq!(record.get_own(&Key::Index(0)), Some(Value::from("zero")));
        }

        #[test]
        fn remove_reindexes_later_names() {
            let record = Record::from_entries([
                ("a", Value::from(1)),
                ("b", Value::from(2)),
                ("c", Value::from(3)),
            ]);
            assert_eq!(record.remove(&Key::name("a")), Some(Value::from(1)));
            assert_eq!(record.get("c"), Some(Value::from(3)));
            record.set("c", Value::from(30));
            assert_eq!(record.keys(), vec![Key::name("b"), Key::name("c")]);
        }

        #[test]
        fn clear_breaks_self_cycle() {
            let record = Record::new();
            record.set("self", Value::Record(record.clone()));
            assert_eq!(Rc::strong_count(&record.0), 2);
            record.clear();
            assert_eq!(Rc::strong_count(&record.0), 1);
            assert!(record.is_empty());
        }
    }

    mod release {
        use super::*;

        #[test]
        fn deeply_nested_sequences_drop_without_recursion() {
            let root = Seq::new();
            let mut current = root.clone();
            for i in 0..200_000 {
                let next = Seq::new();
                current.push(Value::Seq(next.clone()));
                current.push(Value::from(i));
                current = next;
            }
            drop(current);
            drop(root);
        }

        #[test]
        fn deeply_nested_records_drop_without_recursion() {
            let root = Record::new();
            let mut current = root.clone();
            for _ in 0..200_000 {
                let next = Record::new();
                current.set("next", Value::Record(next.clone()));
                current = next;
            }
            drop(current);
            drop(root);
        }
    }

    #[test]
    fn callable_identity_and_call() {
        let twice = Callable::new("twice", |args: &[Value]| {
            Value::from(args[0].as_number().unwrap_or(0.0) * 2.0)
        });
        assert_eq!(twice.call(&[Value::from(4)]), Value::from(8));
        assert_eq!(twice.name(), "twice");
        let value = Value::from(twice.clone());
        assert!(value.ptr_eq(&Value::Callable(twice)));
    }

    #[test]
    fn get_dispatches_on_container_kind() {
        let seq = Value::seq([Value::from("a")]);
        assert_eq!(seq.get(&Key::Index(0)), Some(Value::from("a")));
        assert_eq!(seq.get(&Key::name("0")), None);
        let record = Value::record([("k", Value::from(1))]);
        assert_eq!(record.get(&Key::name("k")), Some(Value::from(1)));
        assert_eq!(Value::from(1).get(&Key::Index(0)), None);
    }
}
