// Job store administration: the store seam, its PostgreSQL backend,
// request validation and the CRUD handlers.

pub mod handlers;
pub mod store;
pub mod validation;
