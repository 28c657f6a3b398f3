//! Command definitions and the group tree built from them
//!
//! Commands are stored as a flat list in the settings file. Each one carries an optional
//! slash separated group path; the tree in [`group`] is rebuilt from that list on every read
//! and is never persisted.

pub mod command;
pub mod group;
