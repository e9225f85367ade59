use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Membership role enum. Governs visibility of other company members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")] // Serialize as lowercase string
#[strum(serialize_all = "lowercase")] // Display/FromStr as lowercase string
pub enum CompanyRole {
    Manager,
    Hr,
    Employee,
}

impl CompanyRole {
    /// Parse a role, falling back to `Employee` on unknown input. Linking
    /// accepts caller-supplied role strings and must not fail on bad ones.
    pub fn parse_or_employee(s: &str) -> Self {
        s.parse().unwrap_or(CompanyRole::Employee)
    }

    /// Manager and HR can see every member; everyone else only themselves.
    pub fn sees_all_members(&self) -> bool {
        matches!(self, CompanyRole::Manager | CompanyRole::Hr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lowercase() {
        assert_eq!("manager".parse::<CompanyRole>().unwrap(), CompanyRole::Manager);
        assert_eq!("hr".parse::<CompanyRole>().unwrap(), CompanyRole::Hr);
    }

    #[test]
    fn unknown_role_defaults_to_employee() {
        assert_eq!(CompanyRole::parse_or_employee("root"), CompanyRole::Employee);
    }

    #[test]
    fn visibility() {
        assert!(CompanyRole::Manager.sees_all_members());
        assert!(CompanyRole::Hr.sees_all_members());
        assert!(!CompanyRole::Employee.sees_all_members());
    }
}
