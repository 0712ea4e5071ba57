//! Root-level routes that sit outside the feature modules.

pub mod health;
