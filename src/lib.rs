//! Blog listing pagination.
//!
//! A collection of documents holds a listing template and the items to list.
//! [`paginate::paginate`] patches the template as page 1 and adds one copy
//! per further page, keyed `{item_directory}/{n}.md`.

pub mod cli;
pub mod config;
pub mod document;
pub mod logger;
pub mod paginate;
pub mod site;
