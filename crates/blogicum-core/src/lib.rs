//! # Blogicum Core
//!
//! The domain layer of the Blogicum blogging service.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, visibility rules, pagination, the authorship policy and form validation.

pub mod constants;
pub mod domain;
pub mod error;
pub mod forms;
pub mod pagination;
pub mod policy;
pub mod ports;
pub mod visibility;

pub use error::{DomainError, RepoError};
