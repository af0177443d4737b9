//! Record: one key/value entry of a bucket chain.
//!
//! Records live in a `SlotMap` arena owned by the table. A chain is the
//! sequence reached by following `next` keys from a bucket head; the arena
//! owns every record, the links only order them. Releasing a chain walks it
//! in a loop, so chain length never turns into stack depth.

use crate::error::{try_copy_str, Result};
use crate::value::Value;
use core::fmt;
use slotmap::SlotMap;
use std::io;

slotmap::new_key_type! {
    /// Generational index of a record in its table's arena.
    pub struct RecordKey;
}

pub(crate) type Arena = SlotMap<RecordKey, Record>;

#[derive(Debug)]
pub struct Record {
    key: Box<str>,
    value: Value,
    pub(crate) next: Option<RecordKey>,
}

impl Record {
    /// Build a record owning a fresh copy of `key` and taking `value`,
    /// linked to `next`.
    pub fn create(key: &str, value: Value, next: Option<RecordKey>) -> Result<Self> {
        let key = try_copy_str(key)?.into_boxed_str();
        Ok(Self { key, value, next })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub(crate) fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    /// Replace the stored value, returning the old one.
    ///
    /// The old text buffer, if any, moves out to the caller and is freed
    /// exactly once when it is dropped.
    pub fn update(&mut self, value: Value) -> Value {
        core::mem::replace(&mut self.value, value)
    }

    /// Write `key<TAB>value<NEWLINE>` to `out`.
    pub fn format<W: io::Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{self}")
    }

    /// Bytes this record owns on the heap besides its arena slot.
    pub(crate) fn heap_len(&self) -> usize {
        self.key.len() + self.value.heap_len()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.key, self.value)
    }
}

/// Release the record at `at` from `arena`.
///
/// With `recursive`, every record reachable through `next` is released as
/// well and `None` is returned. Without it only `at` goes; its link is
/// handed back and the caller relinks the chain.
pub(crate) fn destroy(arena: &mut Arena, at: RecordKey, recursive: bool) -> Option<RecordKey> {
    let mut cursor = Some(at);
    while let Some(k) = cursor {
        let rec = arena.remove(k)?;
        if !recursive {
            return rec.next;
        }
        cursor = rec.next;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(arena: &mut Arena, keys: &[&str]) -> Option<RecordKey> {
        let mut head = None;
        for k in keys.iter().rev() {
            let rec = Record::create(k, Value::from(*k), head).unwrap();
            head = Some(arena.insert(rec));
        }
        head
    }

    #[test]
    fn create_copies_key_and_value() {
        let key = String::from("abc123");
        let value = Value::from("/a/file.txt");
        let rec = Record::create(&key, value.clone(), None).unwrap();
        drop(key);
        assert_eq!(rec.key(), "abc123");
        assert_eq!(rec.value(), &value);
        assert!(rec.next.is_none());
    }

    #[test]
    fn update_switches_variant_and_returns_old() {
        let mut rec = Record::create("k", Value::from("old"), None).unwrap();
        let old = rec.update(Value::Number(5));
        assert_eq!(old, Value::from("old"));
        assert_eq!(rec.value(), &Value::Number(5));

        let old = rec.update(Value::from("new"));
        assert_eq!(old, Value::Number(5));
        assert_eq!(rec.value().as_text(), Some("new"));
    }

    #[test]
    fn format_writes_tab_separated_line() {
        let mut out = Vec::new();
        Record::create("abc", Value::from("/x"), None)
            .unwrap()
            .format(&mut out)
            .unwrap();
        Record::create("n", Value::Number(-3), None)
            .unwrap()
            .format(&mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "abc\t/x\nn\t-3\n");
    }

    #[test]
    fn destroy_single_returns_abandoned_link() {
        let mut arena = Arena::with_key();
        let head = chain(&mut arena, &["a", "b", "c"]).unwrap();
        let second = arena[head].next;

        let next = destroy(&mut arena, head, false);
        assert_eq!(next, second);
        assert_eq!(arena.len(), 2);
        assert!(!arena.contains_key(head));
    }

    #[test]
    fn destroy_recursive_releases_whole_chain() {
        let mut arena = Arena::with_key();
        let head = chain(&mut arena, &["a", "b", "c"]).unwrap();
        let other = chain(&mut arena, &["z"]).unwrap();

        assert_eq!(destroy(&mut arena, head, true), None);
        assert_eq!(arena.len(), 1);
        assert!(arena.contains_key(other));
    }

    #[test]
    fn destroy_recursive_handles_long_chains() {
        let mut arena = Arena::with_key();
        let keys: Vec<String> = (0..200_000).map(|i| format!("k{i}")).collect();
        let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        let head = chain(&mut arena, &refs).unwrap();
        destroy(&mut arena, head, true);
        assert!(arena.is_empty());
    }
}
