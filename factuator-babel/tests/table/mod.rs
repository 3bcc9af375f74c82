//! Table conversion tests

mod cells;
