// Seeker profiles: persistence with create/upsert dispatch, and the HTTP surface.

pub mod handlers;
pub mod store;
