use anyhow::Result;

/// Durable key/value slots holding serialized journal state.
pub trait SlotStorage {
    fn read_slot(&self, slot: &str) -> Result<Option<String>>;
    fn write_slot(&mut self, slot: &str, value: &str) -> Result<()>;
    fn remove_slot(&mut self, slot: &str) -> Result<()>;
}

#[cfg(test)]
pub mod memory {
    use super::SlotStorage;
    use anyhow::{Result, bail};
    use std::collections::HashMap;

    #[derive(Debug, Default)]
    pub struct MemoryStorage {
        pub slots: HashMap<String, String>,
        pub fail_writes: bool,
    }

    impl MemoryStorage {
        pub fn with_slot(slot: &str, value: &str) -> Self {
            Self {
                slots: HashMap::from([(slot.to_string(), value.to_string())]),
                fail_writes: false,
            }
        }
    }

    impl SlotStorage for MemoryStorage {
        fn read_slot(&self, slot: &str) -> Result<Option<String>> {
            Ok(self.slots.get(slot).cloned())
        }

        fn write_slot(&mut self, slot: &str, value: &str) -> Result<()> {
            if self.fail_writes {
                bail!("storage quota exceeded");
            }
            self.slots.insert(slot.to_string(), value.to_string());
            Ok(())
        }

        fn remove_slot(&mut self, slot: &str) -> Result<()> {
            self.slots.remove(slot);
            Ok(())
        }
    }
}
