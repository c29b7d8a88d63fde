pub mod account;
pub mod course;

pub use account::{Account, AccountSummary, NewAccount};
pub use course::{Course, CourseDetail, CourseFields, CourseInput, CourseListing, CourseWithOwner};
