pub mod employee_code;
pub mod employee_status;
pub mod ids;
pub mod invite_status;
pub mod password;
pub mod role;

pub use employee_status::{CatalogStatus, EmployeeStatus};
pub use ids::{CompanyId, UserId};
pub use invite_status::InviteStatus;
pub use password::{HashedPassword, Password};
pub use role::CompanyRole;
