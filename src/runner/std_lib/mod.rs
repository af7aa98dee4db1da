//! The core generator set.
//!
//! Every generator has the [`NativeGenerator`](crate::runner::plugin::types::NativeGenerator)
//! signature and returns an empty list when it has nothing to say. Missing
//! capabilities are not errors here; a stale object is, and the evaluator
//! contains it.

pub mod core;
pub mod hierarchy;
pub mod naming;
pub mod state;
pub mod table;

use std::fmt::Display;

use crate::runner::api::Presenter;
use crate::runner::ds::context::OutputChannel;
use crate::runner::ds::element::{ElementList, VoiceId};

pub use self::core::register_core_generators;

/// Substitute `args` for successive `{}` placeholders in `template`.
pub(crate) fn fill(template: &str, args: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut args = args.iter();
    while let Some(at) = rest.find("{}") {
        out.push_str(&rest[..at]);
        if let Some(arg) = args.next() {
            out.push_str(&arg.to_string());
        }
        rest = &rest[at + 2..];
    }
    out.push_str(rest);
    out
}

/// The channel string `key[index]` as an element list. Speech indicators
/// are followed by the system voice.
pub(crate) fn indicator(presenter: &Presenter, key: &str, index: usize) -> ElementList {
    match presenter.formats().string(key, index) {
        Some(text) => {
            let mut out = ElementList::text(text);
            if presenter.channel() == OutputChannel::Speech {
                out.push_voice(VoiceId::System);
            }
            out
        }
        None => ElementList::new(),
    }
}

/// `key[0]` with `args` filled in, or nothing when the channel has no such
/// string.
pub(crate) fn formatted(presenter: &Presenter, key: &str, args: &[&dyn Display]) -> ElementList {
    match presenter.formats().string(key, 0) {
        Some(template) => ElementList::text(fill(template, args)),
        None => ElementList::new(),
    }
}

pub(crate) fn optional_text(text: Option<String>) -> ElementList {
    text.map(ElementList::text).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill() {
        assert_eq!(fill("{} of {}", &[&3, &7]), "3 of 7");
        assert_eq!(fill("tree level {}", &[&2]), "tree level 2");
        assert_eq!(fill("no placeholder", &[&1]), "no placeholder");
        assert_eq!(fill("{} and {}", &[&1]), "1 and ");
    }
}
