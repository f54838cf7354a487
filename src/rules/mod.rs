//! Built-in checks, one module per object family.

pub mod apps;
pub mod cronjob;
pub mod disruptionbudget;
pub mod hpa;
pub mod ingress;
pub mod meta;
pub mod networkpolicy;
pub mod security;
pub mod service;
pub mod stable;
