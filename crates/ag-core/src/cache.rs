/// Single-entry cache keyed by the exact value used to store it.
///
/// Storing under a new key replaces the previous entry. A lookup only hits if the key compares
/// equal; there is no tolerance window.
#[derive(Debug, Clone)]
pub struct Cache<K, V> {
    entry: Option<(K, V)>,
}

impl<K, V> Default for Cache<K, V> {
    fn default() -> Self {
        Self { entry: None }
    }
}

impl<K, V> Cache<K, V>
where
    K: PartialEq,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        match &self.entry {
            Some((cached_key, value)) if cached_key == key => Some(value),
            _ => None,
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.entry = Some((key, value));
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}
