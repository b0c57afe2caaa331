//! Blockfall (workspace facade crate).
//!
//! Re-exports the member crates under one name so the binary, the
//! integration tests and the benches can reach every layer as
//! `blockfall::{core, anim, engine, input, term, types}`.

pub use blockfall_anim as anim;
pub use blockfall_core as core;
pub use blockfall_engine as engine;
pub use blockfall_input as input;
pub use blockfall_term as term;
pub use blockfall_types as types;
