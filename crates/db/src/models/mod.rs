//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` struct matching the
//! database row, plus whatever input DTOs its repository accepts.

pub mod contact_inquiry;
pub mod inline_content;
pub mod service;
pub mod team_member;
