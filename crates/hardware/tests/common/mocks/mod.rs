//! Backing store doubles.
