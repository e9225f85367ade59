pub mod auth;
pub mod companies;
pub mod departments;
pub mod employees;
pub mod invites;
pub mod job_positions;
pub mod preferences;
