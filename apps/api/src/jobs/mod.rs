// Job postings: plain filtered CRUD, no normalization.

pub mod handlers;
pub mod store;
