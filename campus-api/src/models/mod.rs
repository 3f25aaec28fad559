pub mod academic_year;
pub mod department;
pub mod internship;
pub mod lecturer;
pub mod menu;
pub mod partner;
pub mod permission;
pub mod role;
pub mod role_menu;
pub mod role_permission;
pub mod semester;
pub mod student;
pub mod thesis;
pub mod user;
pub mod user_role;

// Re-export models for easier access
pub use academic_year::*;
pub use department::*;
pub use internship::*;
pub use lecturer::*;
pub use menu::*;
pub use partner::*;
pub use permission::*;
pub use role::*;
pub use role_menu::*;
pub use role_permission::*;
pub use semester::*;
pub use student::*;
pub use thesis::*;
pub use user::*;
pub use user_role::*;
