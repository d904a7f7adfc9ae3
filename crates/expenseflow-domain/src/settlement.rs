//! Derived results of the settlement engine.

use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

/// Net position of one member; positive means the group owes them.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberBalance {
    pub name: String,
    pub amount: f64,
}

/// Member balances in member insertion order.
///
/// Serializes as a JSON object keyed by member name, preserving that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Balances {
    entries: Vec<MemberBalance>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` with a zero balance; duplicates are ignored.
    pub fn insert_member(&mut self, name: &str) {
        if self.get(name).is_none() {
            self.entries.push(MemberBalance {
                name: name.to_string(),
                amount: 0.0,
            });
        }
    }

    /// Adds `delta` to a known member. Returns `false` for unknown names.
    pub fn adjust(&mut self, name: &str, delta: f64) -> bool {
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => {
                entry.amount += delta;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemberBalance> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|entry| entry.amount).sum()
    }
}

impl FromIterator<(String, f64)> for Balances {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut balances = Balances::new();
        for (name, amount) in iter {
            balances.insert_member(&name);
            balances.adjust(&name, amount);
        }
        balances
    }
}

impl Serialize for Balances {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.name, &entry.amount)?;
        }
        map.end()
    }
}

/// A single peer-to-peer transfer that moves `amount` from debtor to creditor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

impl Settlement {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balances_serialize_in_member_order() {
        let balances: Balances = vec![("Zoe".to_string(), 10.0), ("Adam".to_string(), -10.0)]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&balances).unwrap();
        assert_eq!(json, r#"{"Zoe":10.0,"Adam":-10.0}"#);
    }

    #[test]
    fn adjust_ignores_unknown_members() {
        let mut balances = Balances::new();
        balances.insert_member("A");
        assert!(!balances.adjust("ghost", 5.0));
        assert_eq!(balances.get("A"), Some(0.0));
        assert_eq!(balances.len(), 1);
    }
}
