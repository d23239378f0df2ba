use std::collections::HashMap;

use decorum_model::PropertyStore;

/// What a member name of a produced instance resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member {
    /// A declared property, by its slot in the store.
    Property(usize),
    AnnotationType,
    HashCode,
    ToString,
    /// Takes an argument, so only reachable as a method.
    Equals,
    /// Returns cells rather than a value, so only reachable as a method.
    Describe,
}

const WELL_KNOWN: [(&str, Member); 5] = [
    ("annotationType", Member::AnnotationType),
    ("describe", Member::Describe),
    ("equals", Member::Equals),
    ("hashCode", Member::HashCode),
    ("toString", Member::ToString),
];

/// Name → member table, built once per instance.
///
/// Schema validation keeps property names from shadowing the well-known
/// members.
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    members: HashMap<String, Member>,
}

impl DispatchTable {
    pub fn for_store(store: &PropertyStore) -> Self {
        let mut members: HashMap<String, Member> = WELL_KNOWN
            .iter()
            .map(|(name, member)| ((*name).to_string(), *member))
            .collect();
        for (slot, property) in store.iter().enumerate() {
            members.insert(property.name().to_string(), Member::Property(slot));
        }
        Self { members }
    }

    pub fn resolve(&self, name: &str) -> Option<Member> {
        self.members.get(name).copied()
    }

    /// Slot of a declared property; `None` for well-known members and
    /// unknown names.
    pub fn property_slot(&self, name: &str) -> Option<usize> {
        match self.resolve(name)? {
            Member::Property(slot) => Some(slot),
            _ => None,
        }
    }
}
