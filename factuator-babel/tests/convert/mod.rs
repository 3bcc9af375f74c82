//! Page conversion tests

mod links;
mod properties;
mod scenarios;
mod snapshot;
