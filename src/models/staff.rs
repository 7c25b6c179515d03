use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: String,
    pub name: String,
    pub specialties: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStaff {
    pub name: String,
    #[serde(default)]
    pub specialties: Vec<String>,
}

/// Identity of a staff pool. Schedules and bookings without a staff member
/// form their own `Unassigned` pool; they never collide with a specific one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StaffKey {
    Unassigned,
    Specific(String),
}

impl StaffKey {
    pub fn from_option(id: Option<&str>) -> Self {
        match id {
            Some(id) => StaffKey::Specific(id.to_string()),
            None => StaffKey::Unassigned,
        }
    }

    pub fn staff_id(&self) -> Option<&str> {
        match self {
            StaffKey::Specific(id) => Some(id),
            StaffKey::Unassigned => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_key_roundtrip() {
        assert_eq!(StaffKey::from_option(None), StaffKey::Unassigned);
        assert_eq!(StaffKey::from_option(None).staff_id(), None);

        let key = StaffKey::from_option(Some("st-1"));
        assert_eq!(key, StaffKey::Specific("st-1".to_string()));
        assert_eq!(key.staff_id(), Some("st-1"));
    }

    #[test]
    fn test_unassigned_orders_first() {
        let mut keys = vec![
            StaffKey::Specific("b".to_string()),
            StaffKey::Unassigned,
            StaffKey::Specific("a".to_string()),
        ];
        keys.sort();
        assert_eq!(keys[0], StaffKey::Unassigned);
        assert_eq!(keys[1], StaffKey::Specific("a".to_string()));
    }
}
