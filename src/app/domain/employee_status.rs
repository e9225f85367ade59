use strum_macros::{Display, EnumString};

/// Employee lifecycle status. Stored as four mutually-exclusive boolean
/// columns; a status update overwrites all four, so it is idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum EmployeeStatus {
    Active,
    Suspended,
    Archived,
    Deleted,
}

impl EmployeeStatus {
    /// The (is_active, is_suspended, is_archived, is_deleted) flag row for
    /// this status. Exactly one flag is set.
    pub fn flags(&self) -> (i64, i64, i64, i64) {
        match self {
            EmployeeStatus::Active => (1, 0, 0, 0),
            EmployeeStatus::Suspended => (0, 1, 0, 0),
            EmployeeStatus::Archived => (0, 0, 1, 0),
            EmployeeStatus::Deleted => (0, 0, 0, 1),
        }
    }
}

/// Department / job position lifecycle status. These use an archived flag
/// plus hard delete, unlike Employee's soft-delete flag. The asymmetry
/// matches the data the application has always written and is kept on
/// purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum CatalogStatus {
    Active,
    Archived,
    Deleted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_flag_set() {
        for status in [
            EmployeeStatus::Active,
            EmployeeStatus::Suspended,
            EmployeeStatus::Archived,
            EmployeeStatus::Deleted,
        ] {
            let (a, s, r, d) = status.flags();
            assert_eq!(a + s + r + d, 1, "{status} must set exactly one flag");
        }
    }

    #[test]
    fn parses_lowercase() {
        assert_eq!("deleted".parse::<EmployeeStatus>().unwrap(), EmployeeStatus::Deleted);
        assert_eq!("archived".parse::<CatalogStatus>().unwrap(), CatalogStatus::Archived);
        assert!("gone".parse::<EmployeeStatus>().is_err());
    }
}
