//! # utter - utterance generation for screen readers
//!
//! Turns accessible objects into ordered lists of speech or braille
//! fragments. What is said for each role, in each presentation mode, lives
//! in declarative format tables; the small functions that compute each
//! fragment are generators looked up by name.
//!
//! - Format expressions are parsed once with a PEG grammar and checked at
//!   load time by an exhaustive dry run against the generator table.
//! - Evaluation is demand-driven: only generators an expression actually
//!   reaches are called, and at most once each.
//! - Objects are reached through a cached facade that tolerates objects
//!   disappearing mid-generation.
//!
//! ## Quick Start
//!
//! ```
//! use utter::runner::api::Presenter;
//! use utter::runner::ds::accessible::Snapshot;
//! use utter::runner::ds::cache::ObjectCache;
//! use utter::runner::ds::context::{FormatMode, OutputChannel};
//! use utter::runner::ds::memory::MemoryTree;
//! use utter::runner::ds::role::Role;
//! use utter::runner::ds::state::StateSet;
//!
//! let tree = MemoryTree::new();
//! let window = tree.add(None, Snapshot::new(Role::Frame).with_name("Preferences"));
//! let checkbox = tree.add(
//!     Some(&window),
//!     Snapshot::new(Role::CheckBox)
//!         .with_name("Wrap long lines")
//!         .add_states(StateSet::CHECKABLE | StateSet::CHECKED),
//! );
//!
//! let cache = ObjectCache::new(Box::new(tree.clone()));
//! let obj = cache.get(&checkbox).unwrap();
//!
//! let presenter = Presenter::with_defaults(OutputChannel::Speech);
//! let spoken = presenter.generate(&obj, FormatMode::Unfocused, None);
//! assert_eq!(spoken.texts(), vec!["Wrap long lines", "check box", "checked"]);
//! ```
//!
//! ## Architecture
//!
//! - **[`parser`]** - format-expression grammar and AST
//! - **[`runner`]** - everything that runs at generation time
//!   - **[`runner::ds`]** - object facade, roles, states, context
//!   - **[`runner::format`]** - format tables and the compiled registry
//!   - **[`runner::eval`]** - the demand-driven evaluator
//!   - **[`runner::plugin`]** - generator table and application profiles
//!   - **[`runner::std_lib`]** - the core generator set

#[macro_use]
extern crate lazy_static;

pub mod parser;
pub mod runner;
