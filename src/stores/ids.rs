//! Collision-free transaction identifiers.

use dashmap::DashSet;
use uuid::Uuid;

#[derive(Default)]
pub struct IdGenerator {
    /// Every identifier this generator has handed out or been told about.
    /// Identifiers are never removed, so deleted records cannot have their
    /// IDs reissued.
    issued: DashSet<String>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            issued: DashSet::new(),
        }
    }

    /// Draws random v4 UUIDs until one is neither issued before nor
    /// reported as taken by `is_taken`, then records it as issued.
    ///
    /// The insert into the issued set is the atomic claim: two concurrent
    /// callers that draw the same value cannot both win it.
    pub fn generate(&self, is_taken: impl Fn(&str) -> bool) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if is_taken(&id) {
                continue;
            }
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }

    /// Records an identifier chosen by a caller so it is never generated.
    pub fn reserve(&self, id: &str) {
        self.issued.insert(id.to_owned());
    }

    #[cfg(test)]
    fn is_issued(&self, id: &str) -> bool {
        self.issued.contains(id)
    }
}
