use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use indexmap::IndexMap;
use parking_lot::{RwLock, RwLockReadGuard};

use super::value::Value;

/// A value the encoder accepts.
///
/// This is wider than [`Value`]: booleans, floats, typed views, and absent
/// entries all have an encoding (or are skipped). Lists and dictionaries are
/// shared handles, so one container may be reachable from several places in
/// a tree, or even from inside itself.
///
/// Variants are listed in the order the encoder checks them.
#[derive(Debug, Clone)]
pub enum Encodable {
    /// Raw bytes, encoded as a byte string.
    Bytes(Bytes),
    List(SharedList),
    /// Fixed-width numeric elements, encoded as their little-endian bytes.
    View(View),
    /// Encoded as `i1e` or `i0e`.
    Bool(bool),
    Integer(i64),
    /// Truncated toward zero; non-finite values cannot be encoded.
    Float(f64),
    /// Encoded as the bytes of the string under the configured encoding
    /// (UTF-8 by default).
    Text(String),
    Dict(SharedDict),
    /// Skipped inside lists and dictionaries.
    Absent,
}

/// A typed view over fixed-width elements.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    U32(Vec<u32>),
    I32(Vec<i32>),
    U64(Vec<u64>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

macro_rules! le_bytes {
    ($v:expr) => {
        $v.iter().flat_map(|x| x.to_le_bytes()).collect()
    };
}

impl View {
    /// The memory behind the view, element by element in little-endian order.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            View::I8(v) => le_bytes!(v),
            View::U16(v) => le_bytes!(v),
            View::I16(v) => le_bytes!(v),
            View::U32(v) => le_bytes!(v),
            View::I32(v) => le_bytes!(v),
            View::U64(v) => le_bytes!(v),
            View::I64(v) => le_bytes!(v),
            View::F32(v) => le_bytes!(v),
            View::F64(v) => le_bytes!(v),
        }
    }
}

/// A shareable, growable list of [`Encodable`]s.
///
/// Clones share the same storage.
///
/// ```
/// use rbencode::bencode::SharedList;
///
/// let list = SharedList::new();
/// list.push(1i64);
/// let alias = list.clone();
/// alias.push("two");
/// assert_eq!(list.len(), 2);
/// assert!(list.ptr_eq(&alias));
/// ```
#[derive(Clone, Default)]
pub struct SharedList(Arc<RwLock<Vec<Encodable>>>);

impl SharedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, item: impl Into<Encodable>) {
        self.0.write().push(item.into());
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Whether both handles point at the same list.
    pub fn ptr_eq(&self, other: &SharedList) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Vec<Encodable>> {
        self.0.read()
    }

    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for SharedList {
    // Contents are not printed: a list may contain itself.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedList")
            .field("id", &format_args!("{:#x}", self.id()))
            .field("len", &self.len())
            .finish()
    }
}

impl From<Vec<Encodable>> for SharedList {
    fn from(items: Vec<Encodable>) -> Self {
        Self(Arc::new(RwLock::new(items)))
    }
}

impl<T: Into<Encodable>> FromIterator<T> for SharedList {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter()
            .map(Into::into)
            .collect::<Vec<Encodable>>()
            .into()
    }
}

/// A shareable dictionary of [`Encodable`]s keyed by text.
///
/// Insertion order is kept but has no effect on the encoding, which always
/// sorts keys.
#[derive(Clone, Default)]
pub struct SharedDict(Arc<RwLock<IndexMap<String, Encodable>>>);

impl SharedDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the entry for `key`.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Encodable>) {
        self.0.write().insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    pub fn ptr_eq(&self, other: &SharedDict) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, Encodable>> {
        self.0.read()
    }

    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for SharedDict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedDict")
            .field("id", &format_args!("{:#x}", self.id()))
            .field("len", &self.len())
            .finish()
    }
}

impl<K: Into<String>, V: Into<Encodable>> FromIterator<(K, V)> for SharedDict {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<IndexMap<_, _>>();
        Self(Arc::new(RwLock::new(map)))
    }
}

impl From<bool> for Encodable {
    fn from(b: bool) -> Self {
        Encodable::Bool(b)
    }
}

impl From<i64> for Encodable {
    fn from(i: i64) -> Self {
        Encodable::Integer(i)
    }
}

impl From<i32> for Encodable {
    fn from(i: i32) -> Self {
        Encodable::Integer(i.into())
    }
}

impl From<u32> for Encodable {
    fn from(i: u32) -> Self {
        Encodable::Integer(i.into())
    }
}

impl From<f64> for Encodable {
    fn from(f: f64) -> Self {
        Encodable::Float(f)
    }
}

impl From<&str> for Encodable {
    fn from(s: &str) -> Self {
        Encodable::Text(s.to_owned())
    }
}

impl From<String> for Encodable {
    fn from(s: String) -> Self {
        Encodable::Text(s)
    }
}

impl From<Bytes> for Encodable {
    fn from(b: Bytes) -> Self {
        Encodable::Bytes(b)
    }
}

impl From<Vec<u8>> for Encodable {
    fn from(b: Vec<u8>) -> Self {
        Encodable::Bytes(b.into())
    }
}

impl From<&[u8]> for Encodable {
    fn from(b: &[u8]) -> Self {
        Encodable::Bytes(Bytes::copy_from_slice(b))
    }
}

impl From<View> for Encodable {
    fn from(v: View) -> Self {
        Encodable::View(v)
    }
}

impl From<SharedList> for Encodable {
    fn from(l: SharedList) -> Self {
        Encodable::List(l)
    }
}

impl From<Vec<Encodable>> for Encodable {
    fn from(items: Vec<Encodable>) -> Self {
        Encodable::List(items.into())
    }
}

impl From<SharedDict> for Encodable {
    fn from(d: SharedDict) -> Self {
        Encodable::Dict(d)
    }
}

impl<T: Into<Encodable>> From<Option<T>> for Encodable {
    fn from(v: Option<T>) -> Self {
        v.map_or(Encodable::Absent, Into::into)
    }
}

impl From<Value> for Encodable {
    fn from(v: Value) -> Self {
        match v {
            Value::Integer(i) => Encodable::Integer(i),
            Value::Bytes(b) => Encodable::Bytes(b),
            Value::Text(s) => Encodable::Text(s),
            Value::List(l) => Encodable::List(l.into_iter().collect()),
            Value::Dict(d) => Encodable::Dict(d.into_iter().collect()),
        }
    }
}
