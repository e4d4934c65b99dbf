use serde::{Deserialize, Serialize};

/// A single phonebook record. The telephone number is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub surname: String,
    pub tel: String,
}

impl Entry {
    pub fn new(name: &str, surname: &str, tel: &str) -> Self {
        Self {
            name: name.to_string(),
            surname: surname.to_string(),
            tel: tel.to_string(),
        }
    }

    /// Tab-separated line used by store listings.
    pub fn list_line(&self) -> String {
        format!("{}\t{}\t{}\n", self.name, self.surname, self.tel)
    }
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.name, self.surname, self.tel)
    }
}

/// Strip every `-` from a raw telephone operand.
pub fn normalize_tel(raw: &str) -> String {
    raw.replace('-', "")
}
