//! liber Application Library
//!
//! Server-rendered local-library catalog: four entity modules (author,
//! book, genre, book instance) over shared form validation, document
//! collections, and HTML views.

pub mod catalog;
pub mod forms;
pub mod modules;
pub mod views;
