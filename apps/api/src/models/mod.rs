// Typed rows and storage enums for the Futora schema (see migrations/).
// Every read and write goes through these types; no untyped JSON rows.

pub mod application;
pub mod catalog;
pub mod posting;
pub mod profile;
pub mod skill;
