//! The keyed store: an in-memory map from keys to values of exactly one kind.
//!
//! Kind consistency is enforced by the typed accessors: asking for a list at a
//! key that holds a scalar yields [`StoreError::TypeMismatch`] and leaves the
//! value untouched. Containers emptied by a structural operation are removed
//! from the keyspace (see [`KeyValueStore::remove_if_empty`]). Keys may carry
//! an expiration deadline; expired keys are purged lazily on access.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use ordered_float::OrderedFloat;
use tokio::time::Instant;

use crate::commands::StoreError;

#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    String(String),
    List(VecDeque<String>),
    Set(HashSet<String>),
    SortedSet(SortedSet),
    Hash(HashMap<String, String>),
}

impl DataType {
    /// Name reported by the TYPE command.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::String(_) => "string",
            DataType::List(_) => "list",
            DataType::Set(_) => "set",
            DataType::SortedSet(_) => "zset",
            DataType::Hash(_) => "hash",
        }
    }

    fn is_empty_container(&self) -> bool {
        match self {
            DataType::String(_) => false,
            DataType::List(list) => list.is_empty(),
            DataType::Set(set) => set.is_empty(),
            DataType::SortedSet(zset) => zset.is_empty(),
            DataType::Hash(hash) => hash.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub data: DataType,
    pub expiration: Option<Instant>,
}

impl Value {
    pub fn new(data: DataType) -> Self {
        Self {
            data,
            expiration: None,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expiration.is_some_and(|deadline| now >= deadline)
    }
}

/// Members ordered by (score, member), with O(1) score lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortedSet {
    scores: HashMap<String, OrderedFloat<f64>>,
    ordered: BTreeSet<(OrderedFloat<f64>, String)>,
}

impl SortedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or updates `member`. Returns `true` when the member is new.
    pub fn insert(&mut self, member: &str, score: f64) -> bool {
        let score = OrderedFloat(score);

        match self.scores.insert(member.to_string(), score) {
            Some(previous) => {
                self.ordered.remove(&(previous, member.to_string()));
                self.ordered.insert((score, member.to_string()));
                false
            }
            None => {
                self.ordered.insert((score, member.to_string()));
                true
            }
        }
    }

    pub fn remove(&mut self, member: &str) -> bool {
        match self.scores.remove(member) {
            Some(score) => {
                self.ordered.remove(&(score, member.to_string()));
                true
            }
            None => false,
        }
    }

    pub fn score(&self, member: &str) -> Option<f64> {
        self.scores.get(member).map(|score| score.into_inner())
    }

    pub fn rank(&self, member: &str) -> Option<usize> {
        let score = self.scores.get(member)?;
        self.ordered
            .iter()
            .position(|(s, m)| s == score && m == member)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Members in ascending score order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, f64)> + '_ {
        self.ordered
            .iter()
            .map(|(score, member)| (member.as_str(), score.into_inner()))
    }
}

#[derive(Debug, Default)]
pub struct KeyValueStore {
    entries: HashMap<String, Value>,
}

impl KeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn purge_if_expired(&mut self, key: &str) {
        let now = Instant::now();

        if self
            .entries
            .get(key)
            .is_some_and(|value| value.is_expired(now))
        {
            self.entries.remove(key);
        }
    }

    pub fn get(&mut self, key: &str) -> Option<&Value> {
        self.purge_if_expired(key);
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.purge_if_expired(key);
        self.entries.get_mut(key)
    }

    pub fn contains_key(&mut self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn insert(&mut self, key: String, value: Value) {
        self.entries.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.purge_if_expired(key);
        self.entries.remove(key)
    }

    /// Drops `key` when it holds a container with no elements left.
    pub fn remove_if_empty(&mut self, key: &str) {
        if self
            .entries
            .get(key)
            .is_some_and(|value| value.data.is_empty_container())
        {
            self.entries.remove(key);
        }
    }

    /// Live keys, in no particular order.
    pub fn keys(&mut self) -> Vec<String> {
        self.purge_expired();
        self.entries.keys().cloned().collect()
    }

    pub fn len(&mut self) -> usize {
        self.purge_expired();
        self.entries.len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn purge_expired(&mut self) {
        let now = Instant::now();
        self.entries.retain(|_, value| !value.is_expired(now));
    }

    pub fn string(&mut self, key: &str) -> Result<Option<&String>, StoreError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value {
                data: DataType::String(s),
                ..
            }) => Ok(Some(s)),
            Some(_) => Err(StoreError::TypeMismatch),
        }
    }

    pub fn list(&mut self, key: &str) -> Result<Option<&VecDeque<String>>, StoreError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value {
                data: DataType::List(list),
                ..
            }) => Ok(Some(list)),
            Some(_) => Err(StoreError::TypeMismatch),
        }
    }

    pub fn set(&mut self, key: &str) -> Result<Option<&HashSet<String>>, StoreError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value {
                data: DataType::Set(set),
                ..
            }) => Ok(Some(set)),
            Some(_) => Err(StoreError::TypeMismatch),
        }
    }

    pub fn sorted_set(&mut self, key: &str) -> Result<Option<&SortedSet>, StoreError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value {
                data: DataType::SortedSet(zset),
                ..
            }) => Ok(Some(zset)),
            Some(_) => Err(StoreError::TypeMismatch),
        }
    }

    pub fn hash(&mut self, key: &str) -> Result<Option<&HashMap<String, String>>, StoreError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value {
                data: DataType::Hash(hash),
                ..
            }) => Ok(Some(hash)),
            Some(_) => Err(StoreError::TypeMismatch),
        }
    }

    /// Mutable access to the value at `key`, creating it from `default` when
    /// absent and `create` is set. The kind check is left to the caller.
    fn data_mut(
        &mut self,
        key: &str,
        create: bool,
        default: fn() -> DataType,
    ) -> Option<&mut DataType> {
        self.purge_if_expired(key);

        if !self.entries.contains_key(key) {
            if !create {
                return None;
            }
            self.entries.insert(key.to_string(), Value::new(default()));
        }

        self.entries.get_mut(key).map(|value| &mut value.data)
    }

    pub fn string_mut(
        &mut self,
        key: &str,
        create: bool,
    ) -> Result<Option<&mut String>, StoreError> {
        match self.data_mut(key, create, || DataType::String(String::new())) {
            None => Ok(None),
            Some(DataType::String(s)) => Ok(Some(s)),
            Some(_) => Err(StoreError::TypeMismatch),
        }
    }

    pub fn list_mut(
        &mut self,
        key: &str,
        create: bool,
    ) -> Result<Option<&mut VecDeque<String>>, StoreError> {
        match self.data_mut(key, create, || DataType::List(VecDeque::new())) {
            None => Ok(None),
            Some(DataType::List(list)) => Ok(Some(list)),
            Some(_) => Err(StoreError::TypeMismatch),
        }
    }

    pub fn set_mut(
        &mut self,
        key: &str,
        create: bool,
    ) -> Result<Option<&mut HashSet<String>>, StoreError> {
        match self.data_mut(key, create, || DataType::Set(HashSet::new())) {
            None => Ok(None),
            Some(DataType::Set(set)) => Ok(Some(set)),
            Some(_) => Err(StoreError::TypeMismatch),
        }
    }

    pub fn sorted_set_mut(
        &mut self,
        key: &str,
        create: bool,
    ) -> Result<Option<&mut SortedSet>, StoreError> {
        match self.data_mut(key, create, || DataType::SortedSet(SortedSet::new())) {
            None => Ok(None),
            Some(DataType::SortedSet(zset)) => Ok(Some(zset)),
            Some(_) => Err(StoreError::TypeMismatch),
        }
    }

    pub fn hash_mut(
        &mut self,
        key: &str,
        create: bool,
    ) -> Result<Option<&mut HashMap<String, String>>, StoreError> {
        match self.data_mut(key, create, || DataType::Hash(HashMap::new())) {
            None => Ok(None),
            Some(DataType::Hash(hash)) => Ok(Some(hash)),
            Some(_) => Err(StoreError::TypeMismatch),
        }
    }
}
