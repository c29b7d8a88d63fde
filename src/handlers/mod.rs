// handlers/mod.rs
//
// Public:    GET /, GET /health, POST /api/users, GET /api/courses[/:id]
// Protected: GET /api/users, POST /api/courses, PUT|DELETE /api/courses/:id
//
// Protected handlers take a `Principal` argument; see middleware::auth.

pub mod courses;
pub mod root;
pub mod users;

pub use courses::{course_delete, course_get, course_post, course_put, courses_list};
pub use root::{health, not_found, root};
pub use users::{users_get, users_post};
