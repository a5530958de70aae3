// Role catalog: append-only role templates with filtered listing.

pub mod catalog;
pub mod handlers;
