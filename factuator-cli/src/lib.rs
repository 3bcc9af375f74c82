//! Library half of the factuator binary, exposed so the views can be tested
//! without spawning a process.

pub mod inspect;
