use std::collections::BTreeMap;

use serde::{Serialize, de::DeserializeOwned};

use crate::{Backend, BackendError};

/// Volatile backend keeping serialized values in memory.
#[derive(Debug, Default, Clone)]
pub struct Memory {
    entries: BTreeMap<String, String>,
}

impl Memory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for Memory {
    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, BackendError> {
        self.entries
            .get(key)
            .map(|value| serde_json::from_str(value))
            .transpose()
            .map_err(BackendError::from)
    }

    fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), BackendError> {
        self.entries
            .insert(key.to_string(), serde_json::to_string(value)?);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), BackendError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_read_missing_key() {
        assert_eq!(Memory::new().read::<Vec<u32>>("a").unwrap(), None);
    }

    #[test]
    fn test_write_read_remove() {
        let mut memory = Memory::new();

        memory.write("a", &vec![1, 2, 3]).unwrap();
        assert_eq!(memory.read::<Vec<u32>>("a").unwrap(), Some(vec![1, 2, 3]));

        memory.remove("a").unwrap();
        assert_eq!(memory.read::<Vec<u32>>("a").unwrap(), None);
    }

    #[test]
    fn test_read_invalid_type() {
        let mut memory = Memory::new();

        memory.write("a", &"text").unwrap();

        assert!(matches!(
            memory.read::<Vec<u32>>("a"),
            Err(BackendError::Serialization(_))
        ));
    }
}
