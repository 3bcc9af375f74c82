//! Wiki markup to positional document edits
//!
//!     This crate converts wiki pages into the batch of edit requests that rebuilds them in a
//!     destination document service: headings, links, bullet lists, tables, images and inline
//!     formatting, with internal links rewritten to the converted documents.
//!
//!     This is a pure lib, that is, it powers factuator-cli but is shell agnostic. No code here
//!     prints, reads env vars or talks to the network: the wiki client and the document service
//!     client are collaborators behind traits (see ./driver.rs and ./assets.rs).
//!
//! Architecture
//!
//!     raw markup -> markup::parse -> [Node] -> Translator (fold over ConversionState)
//!         -> OperationList (document order) -> backward -> flatten -> [Request]
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── options.rs              # ConvertOptions
//!     ├── markup                  # wikitext scanner, produces ir::nodes
//!     ├── ir                      # nodes, operations, primitive requests, fetched documents
//!     ├── common                  # state, text cleanup, links, table layout, assembly
//!     ├── translate.rs            # node -> operation dispatch
//!     ├── convert.rs              # whole page conversion
//!     ├── mappings.rs             # title / file / backlink tables
//!     ├── assets.rs               # publishing files for inline images
//!     ├── driver.rs               # DocumentService, clearing and submitting pages
//!     └── relink.rs               # repairing placeholder links later
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── common                  # in-memory DocumentService
//!     ├── convert / table / driver
//!     └── fixtures
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Core Algorithms
//!
//!     The destination addresses everything by offset, and inserting text shifts every offset after
//!     it. Pages are therefore built backwards: every top-level operation targets index 1 and the
//!     list is replayed last-to-first. The translator is written as if emitting in natural order;
//!     the one reversal lives in ./common/assemble.rs.
//!
//!     Tables are the exception. A table is inserted empty, and its cell offsets are computed from
//!     the grid (./common/table.rs). Cell content is translated separately at each cell's offset and
//!     the whole table travels as one indivisible group that the top-level reversal never reorders.
//!
//!     Cross-node state (an armed bullet, bold and italic) is a small Copy value threaded through
//!     the fold, never shared between pages or cells.
//!
pub mod assets;
pub mod convert;
pub mod driver;
pub mod error;
pub mod mappings;
pub mod markup;
pub mod options;
pub mod relink;
pub mod translate;

pub mod common;
pub mod ir;

pub use convert::{convert_page, PageConversion};
pub use error::ConvertError;
pub use mappings::Mappings;
pub use options::ConvertOptions;
pub use translate::Translator;
