//! Driver and re-linking tests against an in-memory document service

mod pages;
mod relink;
